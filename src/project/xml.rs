//! Minimal lossless XML tree over `quick-xml` events.
//!
//! Every event the reader produces is kept as-is, so a document that is parsed
//! and written back without edits serialises to the same text.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{GitVerError, Result};

const BOM: char = '\u{feff}';

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Text, comments, declarations and anything else kept verbatim
    Other(Event<'static>),
}

impl Node {
    fn whitespace(&self) -> Option<&str> {
        match self {
            Node::Other(Event::Text(text)) => std::str::from_utf8(&**text)
                .ok()
                .filter(|s| s.trim().is_empty()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    end: Option<BytesEnd<'static>>,
    children: Vec<Node>,
}

impl Element {
    /// New element with no attributes and no content
    pub fn new(name: &str) -> Self {
        Element {
            start: BytesStart::new(name.to_string()),
            end: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &[u8] {
        self.start.name().into_inner()
    }

    pub fn is(&self, name: &str) -> bool {
        self.name() == name.as_bytes()
    }

    /// Unescaped value of attribute `key`
    pub fn attribute(&self, key: &str) -> Result<Option<String>> {
        let attr = self
            .start
            .try_get_attribute(key)
            .map_err(|e| GitVerError::descriptor(e.to_string()))?;

        match attr {
            Some(attr) => {
                let raw = String::from_utf8_lossy(&attr.value);
                let value = quick_xml::escape::unescape(&raw)
                    .map_err(|e| GitVerError::descriptor(e.to_string()))?;
                Ok(Some(value.into_owned()))
            }
            None => Ok(None),
        }
    }

    /// Direct child elements named `name`, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(e) if e.is(name) => Some(e),
            _ => None,
        })
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children_named(name).next().is_some()
    }

    /// Concatenated unescaped text of the direct text children
    pub fn text(&self) -> Result<String> {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Other(Event::Text(text)) => {
                    let raw = String::from_utf8_lossy(&**text);
                    let value = quick_xml::escape::unescape(&raw)
                        .map_err(|e| GitVerError::descriptor(e.to_string()))?;
                    out.push_str(&value);
                }
                Node::Other(Event::CData(data)) => out.push_str(&String::from_utf8_lossy(&**data)),
                _ => {}
            }
        }
        Ok(out)
    }

    /// Replace all content with a single text node
    pub fn set_text(&mut self, value: &str) {
        self.children = vec![Node::Other(Event::Text(BytesText::new(value).into_owned()))];
        if self.end.is_none() {
            self.end = Some(self.start.to_end().into_owned());
        }
    }

    /// Index of the last direct child element named `name`
    pub fn last_child_index(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .rposition(|node| matches!(node, Node::Element(e) if e.is(name)))
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Element> {
        match self.children.get_mut(index) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// Append `child` after the last child element, reusing its indentation.
    pub fn append_child(&mut self, child: Element) {
        let last_element = self
            .children
            .iter()
            .rposition(|node| matches!(node, Node::Element(_)));

        let indent = match last_element {
            Some(i) if i > 0 => self.children[i - 1].whitespace().map(str::to_string),
            Some(_) => None,
            None => self
                .children
                .last()
                .and_then(Node::whitespace)
                .map(|closing| format!("{}  ", closing)),
        };

        let at = last_element.map_or(0, |i| i + 1);
        let mut nodes = Vec::with_capacity(2);
        if let Some(indent) = indent {
            nodes.push(Node::Other(Event::Text(BytesText::from_escaped(indent))));
        }
        nodes.push(Node::Element(child));
        self.children.splice(at..at, nodes);

        if self.end.is_none() {
            self.end = Some(self.start.to_end().into_owned());
        }
    }

    /// Index paths (from this element) of all descendants named `name`, pre-order
    pub fn descendant_paths(&self, name: &str) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        self.collect_paths(name, &mut prefix, &mut paths);
        paths
    }

    fn collect_paths(&self, name: &str, prefix: &mut Vec<usize>, paths: &mut Vec<Vec<usize>>) {
        for (i, node) in self.children.iter().enumerate() {
            if let Node::Element(e) = node {
                prefix.push(i);
                if e.is(name) {
                    paths.push(prefix.clone());
                }
                e.collect_paths(name, prefix, paths);
                prefix.pop();
            }
        }
    }

    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => match self.children.get(*i) {
                Some(Node::Element(e)) => e.at_path(rest),
                _ => None,
            },
        }
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => match self.children.get_mut(*i) {
                Some(Node::Element(e)) => e.at_path_mut(rest),
                _ => None,
            },
        }
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        match &self.end {
            None => write_event(writer, Event::Empty(self.start.borrow())),
            Some(end) => {
                write_event(writer, Event::Start(self.start.borrow()))?;
                for node in &self.children {
                    write_node(writer, node)?;
                }
                write_event(writer, Event::End(end.borrow()))
            }
        }
    }
}

/// A parsed document: the root element plus whatever surrounds it.
#[derive(Debug, Clone)]
pub struct Document {
    bom: bool,
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(content: &str) -> Result<Self> {
        let (bom, body) = match content.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, content),
        };

        let mut reader = Reader::from_str(body);
        // `</Project >` must come back as written; end names are matched below
        reader.config_mut().trim_markup_names_in_closing_tags = false;
        reader.config_mut().check_end_names = false;
        let mut open: Vec<Element> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| GitVerError::descriptor(format!("malformed XML: {}", e)))?;

            let node = match event {
                Event::Start(start) => {
                    open.push(Element {
                        start: start.into_owned(),
                        end: None,
                        children: Vec::new(),
                    });
                    continue;
                }
                Event::End(end) => {
                    let mut element = open
                        .pop()
                        .ok_or_else(|| GitVerError::descriptor("unexpected closing tag"))?;
                    let closing = end.name().into_inner().trim_ascii_end();
                    if closing != element.name() {
                        return Err(GitVerError::descriptor(format!(
                            "malformed XML: expected </{}>, found </{}>",
                            String::from_utf8_lossy(element.name()),
                            String::from_utf8_lossy(closing)
                        )));
                    }
                    element.end = Some(end.into_owned());
                    Node::Element(element)
                }
                Event::Empty(start) => Node::Element(Element {
                    start: start.into_owned(),
                    end: None,
                    children: Vec::new(),
                }),
                Event::Eof => break,
                other => Node::Other(other.into_owned()),
            };

            match open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => nodes.push(node),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(GitVerError::descriptor(format!(
                "malformed XML: unclosed element <{}>",
                String::from_utf8_lossy(unclosed.name())
            )));
        }

        let document = Document { bom, nodes };
        if document.root().is_none() {
            return Err(GitVerError::descriptor("malformed XML: no root element"));
        }
        Ok(document)
    }

    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }

        let body = String::from_utf8(writer.into_inner())
            .map_err(|e| GitVerError::descriptor(e.to_string()))?;
        Ok(if self.bom {
            format!("{}{}", BOM, body)
        } else {
            body
        })
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(e) => e.write(writer),
        Node::Other(event) => write_event(writer, event.borrow()),
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| GitVerError::descriptor(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- app -->
<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Description>Fish &amp; Chips</Description>
    <Empty />
  </PropertyGroup>

</Project>
"#;

    #[test]
    fn test_roundtrip_is_lossless() {
        let doc = Document::parse(PROJECT).unwrap();
        assert_eq!(doc.to_xml().unwrap(), PROJECT);
    }

    #[test]
    fn test_roundtrip_keeps_closing_tag_whitespace() {
        let content = "<Project Sdk=\"Microsoft.NET.Sdk\"><PropertyGroup ></PropertyGroup ></Project >";
        let doc = Document::parse(content).unwrap();
        assert_eq!(doc.to_xml().unwrap(), content);
    }

    #[test]
    fn test_edit_keeps_closing_tag_whitespace() {
        let mut doc = Document::parse("<Project><Version>1</Version ></Project\n>").unwrap();
        let root = doc.root_mut().unwrap();
        let index = root.last_child_index("Version").unwrap();
        root.child_mut(index).unwrap().set_text("2");
        assert_eq!(doc.to_xml().unwrap(), "<Project><Version>2</Version ></Project\n>");
    }

    #[test]
    fn test_roundtrip_keeps_bom() {
        let content = format!("{}<Project a='1'/>", BOM);
        let doc = Document::parse(&content).unwrap();
        assert_eq!(doc.to_xml().unwrap(), content);
    }

    #[test]
    fn test_root_and_attribute() {
        let doc = Document::parse(PROJECT).unwrap();
        let root = doc.root().unwrap();
        assert!(root.is("Project"));
        assert_eq!(root.attribute("Sdk").unwrap().as_deref(), Some("Microsoft.NET.Sdk"));
        assert_eq!(root.attribute("Missing").unwrap(), None);
    }

    #[test]
    fn test_text_is_unescaped() {
        let doc = Document::parse(PROJECT).unwrap();
        let root = doc.root().unwrap();
        let path = &root.descendant_paths("Description")[0];
        assert_eq!(root.at_path(path).unwrap().text().unwrap(), "Fish & Chips");
    }

    #[test]
    fn test_set_text_on_empty_element() {
        let mut doc = Document::parse(PROJECT).unwrap();
        let root = doc.root_mut().unwrap();
        let path = root.descendant_paths("Empty").remove(0);
        root.at_path_mut(&path).unwrap().set_text("a<b");

        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("<Empty >a&lt;b</Empty>") || xml.contains("<Empty>a&lt;b</Empty>"));
    }

    #[test]
    fn test_append_child_uses_sibling_indent() {
        let mut doc = Document::parse(PROJECT).unwrap();
        let root = doc.root_mut().unwrap();
        let path = root.descendant_paths("PropertyGroup").remove(0);
        let mut version = Element::new("Version");
        version.set_text("1.2.3");
        root.at_path_mut(&path).unwrap().append_child(version);

        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("    <Empty />\n    <Version>1.2.3</Version>\n  </PropertyGroup>"));
    }

    #[test]
    fn test_append_child_to_self_closing_group() {
        let mut doc = Document::parse("<Project><PropertyGroup/></Project>").unwrap();
        let root = doc.root_mut().unwrap();
        let mut version = Element::new("Version");
        version.set_text("1.0.0");
        root.child_mut(0).unwrap().append_child(version);

        assert_eq!(
            doc.to_xml().unwrap(),
            "<Project><PropertyGroup><Version>1.0.0</Version></PropertyGroup></Project>"
        );
    }

    #[test]
    fn test_descendant_paths_are_preorder() {
        let doc = Document::parse(
            "<Project><PropertyGroup/><Choose><When><PropertyGroup/></When></Choose><PropertyGroup/></Project>",
        )
        .unwrap();
        let paths = doc.root().unwrap().descendant_paths("PropertyGroup");
        assert_eq!(paths, vec![vec![0], vec![1, 0, 0], vec![2]]);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(Document::parse("<Project><PropertyGroup></Project>").is_err());
        assert!(Document::parse("<Project></Projects >").is_err());
        assert!(Document::parse("<Project>").is_err());
        assert!(Document::parse("just text").is_err());
        assert!(Document::parse("").is_err());
    }
}

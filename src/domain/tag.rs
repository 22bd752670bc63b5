use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

/// A git tag together with the author time of the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    /// `None` when the tag does not peel to a commit
    pub target_commit_timestamp: Option<DateTime<FixedOffset>>,
}

impl TagRef {
    /// Create a new tag reference
    pub fn new(
        name: impl Into<String>,
        target_commit_timestamp: Option<DateTime<FixedOffset>>,
    ) -> Self {
        TagRef {
            name: name.into(),
            target_commit_timestamp,
        }
    }

    /// Lenient numeric reading of the tag name, `None` when unusable
    pub fn parsed(&self) -> Option<ParsedTag> {
        ParsedTag::parse(&self.name)
    }
}

/// Numeric components read out of a tag name such as `v1.2.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTag {
    pub major: u32,
    pub minor: u32,
    /// Third dot segment, 0 when missing or unreadable
    pub end_segment: u32,
}

impl ParsedTag {
    /// Parse a tag name leniently.
    ///
    /// Every leading `v`/`V` is stripped and the rest is split on `.`. The first two
    /// segments must be plain non-negative integers or the tag is unusable. Segments
    /// past the third are ignored.
    ///
    /// # Example
    /// ```ignore
    /// assert_eq!(ParsedTag::parse("v2.5").unwrap().minor, 5);
    /// assert_eq!(ParsedTag::parse("v2.5.3").unwrap().end_segment, 3);
    /// assert_eq!(ParsedTag::parse("release"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let clean = strip_prefix(name);
        let mut parts = clean.split('.');

        let major = parts.next()?.parse::<u32>().ok()?;
        let minor = parts.next()?.parse::<u32>().ok()?;
        let end_segment = parts.next().map(parse_end_segment).unwrap_or(0);

        Some(ParsedTag {
            major,
            minor,
            end_segment,
        })
    }
}

fn strip_prefix(name: &str) -> &str {
    name.trim_start_matches(|c| c == 'v' || c == 'V')
}

/// The third segment is read as the decimal `"<segment>.0"` and truncated.
fn parse_end_segment(segment: &str) -> u32 {
    match format!("{}.0", segment).parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 => {
            value.trunc() as u32
        }
        _ => 0,
    }
}

/// Orders tags by the semantic version in their name.
///
/// Names that read as a version (after stripping `v`/`V` and padding `1` or `1.2`
/// to three components) rank above names that don't. Equal versions and
/// non-version names fall back to ordinal name order.
pub fn compare_version_aware(a: &TagRef, b: &TagRef) -> Ordering {
    match (semantic_version(&a.name), semantic_version(&b.name)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.name.cmp(&b.name),
    }
}

/// Picks the greatest tag under `compare`, i.e. the first one in descending order.
pub fn latest_tag<F>(tags: Vec<TagRef>, compare: F) -> Option<TagRef>
where
    F: Fn(&TagRef, &TagRef) -> Ordering,
{
    tags.into_iter().max_by(|a, b| compare(a, b))
}

fn semantic_version(name: &str) -> Option<semver::Version> {
    let clean = strip_prefix(name);
    if let Ok(version) = semver::Version::parse(clean) {
        return Some(version);
    }

    let split_at = clean.find(['-', '+']).unwrap_or(clean.len());
    let (core, suffix) = clean.split_at(split_at);
    let padded = match core.matches('.').count() {
        0 => format!("{}.0.0{}", core, suffix),
        1 => format!("{}.0{}", core, suffix),
        _ => return None,
    };

    semver::Version::parse(&padded).ok()
}

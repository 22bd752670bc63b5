use std::fmt;

use crate::config::ProjectConfig;
use crate::error::Result;
use crate::project::xml::Element;
use crate::project::{GENERATE_ASSEMBLY_INFO, PROPERTY_GROUP};

/// Why a project file was left untouched.
/// These are non-fatal and reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Root element is not the configured project element
    InvalidRoot { found: String, expected: String },
    /// `Sdk` attribute missing or not starting with the configured prefix
    UnsupportedSdk { sdk: Option<String>, prefix: String },
    /// No `<PropertyGroup>` anywhere in the file
    NoPropertyGroups,
    /// `<GenerateAssemblyInfo>false</GenerateAssemblyInfo>`
    AssemblyInfoDisabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidRoot { found, expected } => write!(
                f,
                "Invalid project file, root element must be <{}> but is <{}>",
                expected, found
            ),
            SkipReason::UnsupportedSdk { sdk, prefix } => write!(
                f,
                "Project Sdk ({}) is not supported, please ensure the project sdk starts with '{}'",
                sdk.as_deref().unwrap_or(""),
                prefix
            ),
            SkipReason::NoPropertyGroups => write!(
                f,
                "Unable to locate any <PropertyGroup> elements in the project file"
            ),
            SkipReason::AssemblyInfoDisabled => write!(
                f,
                "Project file specifies <GenerateAssemblyInfo>false</GenerateAssemblyInfo>: \
                 versions set in this project file will not affect the output artifacts"
            ),
        }
    }
}

/// Check whether a project root may receive version fields.
///
/// Checks run in order and the first failure wins: root element name, `Sdk`
/// prefix, presence of a property group, then the last `GenerateAssemblyInfo`
/// across all property groups. Only `false` (or `0`) there opts the file out.
///
/// # Returns
/// * `Ok(None)` - The project can be updated
/// * `Ok(Some(reason))` - The project must be skipped
/// * `Err` - An attribute or text value is not valid XML content
pub fn check(root: &Element, rules: &ProjectConfig) -> Result<Option<SkipReason>> {
    if !root.is(&rules.root_element) {
        return Ok(Some(SkipReason::InvalidRoot {
            found: String::from_utf8_lossy(root.name()).into_owned(),
            expected: rules.root_element.clone(),
        }));
    }

    let sdk = root.attribute("Sdk")?;
    if !sdk.as_deref().is_some_and(|s| s.starts_with(&rules.sdk_prefix)) {
        return Ok(Some(SkipReason::UnsupportedSdk {
            sdk,
            prefix: rules.sdk_prefix.clone(),
        }));
    }

    let groups = root.descendant_paths(PROPERTY_GROUP);
    if groups.is_empty() {
        return Ok(Some(SkipReason::NoPropertyGroups));
    }

    let last_setting = groups
        .iter()
        .filter_map(|path| root.at_path(path))
        .flat_map(|group| group.children_named(GENERATE_ASSEMBLY_INFO))
        .last();

    if let Some(setting) = last_setting {
        if is_false(&setting.text()?) {
            return Ok(Some(SkipReason::AssemblyInfoDisabled));
        }
    }

    Ok(None)
}

/// `false` or `0`, ignoring case and surrounding whitespace
fn is_false(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("false") || value == "0"
}

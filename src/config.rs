use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::VersionMode;
use crate::error::{GitVerError, Result};

/// File name looked up in the current directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "gitver.toml";

/// Represents the complete configuration for gitver.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub mode: VersionMode,

    #[serde(default)]
    pub project: ProjectConfig,
}

/// Which files count as project files and which of them may be edited.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_root_element")]
    pub root_element: String,

    #[serde(default = "default_sdk_prefix")]
    pub sdk_prefix: String,
}

fn default_extension() -> String {
    "csproj".to_string()
}

fn default_root_element() -> String {
    "Project".to_string()
}

fn default_sdk_prefix() -> String {
    "Microsoft.NET.Sdk".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            extension: default_extension(),
            root_element: default_root_element(),
            sdk_prefix: default_sdk_prefix(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitver.toml` in the working directory of the run
/// 3. `gitver.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `directory` - Directory the run operates in (`-C`, or `.`)
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, directory: &Path) -> Result<Config> {
    let local = directory.join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join(CONFIG_FILE_NAME);
        if user.exists() {
            user
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        GitVerError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
        .map_err(|e| GitVerError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(config_str: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(config_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mode, VersionMode::CommitsFromRepoStart);
        assert_eq!(config.project.extension, "csproj");
        assert_eq!(config.project.root_element, "Project");
        assert_eq!(config.project.sdk_prefix, "Microsoft.NET.Sdk");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_project_section() {
        let config = parse_config(
            r#"
mode = "tag-third-segment"

[project]
extension = "fsproj"
"#,
        )
        .unwrap();
        assert_eq!(config.mode, VersionMode::TagThirdSegment);
        assert_eq!(config.project.extension, "fsproj");
        assert_eq!(config.project.sdk_prefix, "Microsoft.NET.Sdk");
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(parse_config(r#"mode = "latest""#).is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert!(text.contains("mode = \"commits-from-repo-start\""));
        assert_eq!(parse_config(&text).unwrap(), Config::default());
    }
}

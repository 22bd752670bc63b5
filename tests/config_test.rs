// tests/config_test.rs
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

use gitver::config::{load_config, Config, CONFIG_FILE_NAME};
use gitver::domain::VersionMode;
use serial_test::serial;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
mode = "patch-from-tag-date"

[project]
extension = "fsproj"
sdk_prefix = "Microsoft.NET.Sdk.Web"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), Path::new(".")).unwrap();
    assert_eq!(config.mode, VersionMode::PatchFromTagDate);
    assert_eq!(config.project.extension, "fsproj");
    assert_eq!(config.project.root_element, "Project");
    assert_eq!(config.project.sdk_prefix, "Microsoft.NET.Sdk.Web");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = load_config(Some(&dir.path().join("absent.toml")), dir.path());
    assert!(result.is_err());
}

#[test]
fn test_invalid_toml_names_the_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"mode = [").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path()), Path::new(".")).unwrap_err();
    assert!(err
        .to_string()
        .contains(&temp_file.path().display().to_string()));
}

#[test]
#[serial]
fn test_local_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "mode = \"tag-third-segment\"\n").unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None, Path::new("."));
    env::set_current_dir(previous).unwrap();

    assert_eq!(result.unwrap().mode, VersionMode::TagThirdSegment);
}

#[test]
#[serial]
fn test_explicit_path_beats_local_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "mode = \"tag-third-segment\"\n").unwrap();
    let explicit = dir.path().join("other.toml");
    fs::write(&explicit, "mode = \"patch-from-tag-date\"\n").unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(Some(&explicit), Path::new("."));
    env::set_current_dir(previous).unwrap();

    assert_eq!(result.unwrap().mode, VersionMode::PatchFromTagDate);
}

#[test]
#[serial]
fn test_local_file_follows_run_directory() {
    let run_dir = TempDir::new().unwrap();
    fs::write(run_dir.path().join(CONFIG_FILE_NAME), "mode = \"tag-third-segment\"\n").unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join(CONFIG_FILE_NAME), "mode = \"patch-from-tag-date\"\n").unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(cwd.path()).unwrap();
    let result = load_config(None, run_dir.path());
    env::set_current_dir(previous).unwrap();

    assert_eq!(result.unwrap().mode, VersionMode::TagThirdSegment);
}

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.mode, VersionMode::CommitsFromRepoStart);
    assert_eq!(config.project.extension, "csproj");
}

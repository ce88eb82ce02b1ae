use super::*;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
struct Section {
    name: Option<String>,
    count: u32,
}

#[test]
fn config_dir_is_under_home() {
    let dir = config_dir_with_home(Some(PathBuf::from("/home/test"))).unwrap();
    assert_eq!(dir, PathBuf::from("/home/test/.config/dmboard"));
}

#[test]
fn config_dir_without_home_is_none() {
    assert!(config_dir_with_home(None).is_none());
}

#[test]
fn settings_path_ends_with_settings_toml() {
    let path = settings_path().unwrap();
    assert!(path.to_string_lossy().contains("dmboard"));
    assert!(path.to_string_lossy().ends_with("settings.toml"));
}

#[test]
fn expand_tilde() {
    let home = dirs::home_dir().unwrap();
    assert_eq!(expand_path("~/foo"), home.join("foo"));
    assert_eq!(expand_path("~"), home);
}

#[test]
fn expand_absolute_and_relative() {
    assert_eq!(expand_path("/usr/bin"), PathBuf::from("/usr/bin"));
    assert_eq!(expand_path("foo/bar"), PathBuf::from("foo/bar"));
}

#[test]
fn parse_section_present() {
    let toml = "[demo]\nname = \"x\"\ncount = 3\n";
    let section: Section = parse_section(toml, "demo").unwrap();
    assert_eq!(section.name.as_deref(), Some("x"));
    assert_eq!(section.count, 3);
}

#[test]
fn parse_section_missing_uses_default() {
    let toml = "[other]\nkey = 1\n";
    let section: Section = parse_section(toml, "demo").unwrap();
    assert_eq!(section, Section::default());
}

#[test]
fn parse_section_partial_fields() {
    let toml = "[demo]\ncount = 9\n";
    let section: Section = parse_section(toml, "demo").unwrap();
    assert!(section.name.is_none());
    assert_eq!(section.count, 9);
}

#[test]
fn parse_section_wrong_type_fails() {
    let toml = "[demo]\ncount = \"nine\"\n";
    let result: Result<Section> = parse_section(toml, "demo");
    assert!(result.is_err());
}

#[test]
fn load_section_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let section: Section = load_section_from(&dir.path().join("nope.toml"), "demo").unwrap();
    assert_eq!(section, Section::default());
}

#[test]
fn load_section_from_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "not [valid toml").unwrap();
    let result: Result<Section> = load_section_from(&path, "demo");
    assert!(result.is_err());
}

#[test]
fn set_value_creates_file_and_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    set_value(&path, "demo", "name", toml::Value::String("abc".into())).unwrap();

    let section: Section = load_section_from(&path, "demo").unwrap();
    assert_eq!(section.name.as_deref(), Some("abc"));
}

#[test]
fn set_value_preserves_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[demo]\ncount = 4\n\n[other]\nkeep = true\n").unwrap();

    set_value(&path, "demo", "name", toml::Value::String("abc".into())).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("keep = true"));
    let section: Section = load_section_from(&path, "demo").unwrap();
    assert_eq!(section.count, 4);
    assert_eq!(section.name.as_deref(), Some("abc"));
}

#[test]
fn set_value_keeps_unparsable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[demo\nname = ").unwrap();

    let result = set_value(&path, "demo", "name", toml::Value::String("abc".into()));

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[demo\nname = ");
}

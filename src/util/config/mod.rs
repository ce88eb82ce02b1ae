use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests;

/// Returns the config directory path
pub fn config_dir() -> Result<PathBuf> {
    config_dir_with_home(dirs::home_dir()).context("Could not determine config directory")
}

fn config_dir_with_home(home: Option<PathBuf>) -> Option<PathBuf> {
    home.map(|h| h.join(".config").join("dmboard"))
}

/// Returns the path to settings.toml
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Load one `[section]` of settings.toml, falling back to defaults
pub fn load_section<T: DeserializeOwned + Default>(section: &str) -> Result<T> {
    let path = settings_path()?;
    load_section_from(&path, section)
}

/// Load one `[section]` from a specific file (testable)
pub fn load_section_from<T: DeserializeOwned + Default>(path: &Path, section: &str) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    parse_section(&contents, section)
        .with_context(|| format!("Failed to parse [{}] in {}", section, path.display()))
}

/// Parse one `[section]` out of a TOML document
pub fn parse_section<T: DeserializeOwned + Default>(contents: &str, section: &str) -> Result<T> {
    let doc: toml::Table = toml::from_str(contents)?;
    match doc.get(section) {
        Some(value) => Ok(value.clone().try_into()?),
        None => Ok(T::default()),
    }
}

/// Set `section.key = value` in settings.toml, keeping everything else
pub fn set_value(path: &Path, section: &str, key: &str, value: toml::Value) -> Result<()> {
    let contents = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        String::new()
    };

    let mut doc: toml::Value = if contents.trim().is_empty() {
        toml::Value::Table(toml::map::Map::new())
    } else {
        toml::from_str(&contents)
            .with_context(|| format!("Refusing to rewrite unparsable {}", path.display()))?
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| anyhow!("Config is not a table"))?;

    if !table.contains_key(section) {
        table.insert(
            section.to_string(),
            toml::Value::Table(toml::map::Map::new()),
        );
    }

    let target = table
        .get_mut(section)
        .and_then(|v| v.as_table_mut())
        .ok_or_else(|| anyhow!("{} section is not a table", section))?;

    target.insert(key.to_string(), value);

    let output = toml::to_string_pretty(&doc).context("Failed to serialize settings")?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    fs::write(path, output).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

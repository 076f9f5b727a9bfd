use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Commented starting point written on the first `config set`. Its
/// values match the serde defaults exactly.
const DEFAULT_CONFIG: &str = include_str!("../templates/config.toml");

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("unknown config key \"{0}\"")]
    UnknownKey(String),
    #[error("invalid value \"{value}\" for {key}")]
    InvalidValue { key: String, value: String },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub fn config_path(store_dir: &Path) -> PathBuf {
    store_dir.join("config.toml")
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file
/// yields defaults, with the bundled template as the document so the
/// first edit writes a commented file.
pub fn read_config(store_dir: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let path = config_path(store_dir);
    if !path.exists() {
        let doc = DEFAULT_CONFIG.parse().unwrap_or_default();
        return Ok((Config::default(), doc));
    }

    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let doc: toml_edit::DocumentMut =
        text.parse()
            .map_err(|e: toml_edit::TomlError| ConfigError::ParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(store_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    fs::create_dir_all(store_dir)?;
    let path = config_path(store_dir);
    fs::write(&path, doc.to_string()).map_err(|e| ConfigError::ReadError { path, source: e })?;
    Ok(())
}

/// Set a dotted config key in the document. Knows every key the config
/// defines and validates the value where the type demands it.
pub fn set_config_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match key {
        "fetch.api_url" => {
            ensure_table(doc, "fetch");
            doc["fetch"]["api_url"] = toml_edit::value(value);
        }
        "fetch.timeout_secs" => {
            let secs: i64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            })?;
            ensure_table(doc, "fetch");
            doc["fetch"]["timeout_secs"] = toml_edit::value(secs);
        }
        "ui.display_label" => {
            if value != "name" && value != "key" {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            ensure_table(doc, "ui");
            doc["ui"]["display_label"] = toml_edit::value(value);
        }
        _ => {
            if let Some(status) = key.strip_prefix("ui.colors.") {
                ensure_table(doc, "ui");
                if !doc["ui"].as_table().is_some_and(|t| t.contains_key("colors")) {
                    doc["ui"]["colors"] = toml_edit::Item::Table(toml_edit::Table::new());
                }
                doc["ui"]["colors"][status] = toml_edit::value(value);
            } else {
                return Err(ConfigError::UnknownKey(key.to_string()));
            }
        }
    }
    Ok(())
}

fn ensure_table(doc: &mut toml_edit::DocumentMut, name: &str) {
    if !doc.contains_key(name) {
        doc[name] = toml_edit::Item::Table(toml_edit::Table::new());
    }
}

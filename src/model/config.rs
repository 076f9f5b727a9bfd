use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the store directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL for remote models; `cn load model X` falls back to
    /// `<api_url>/configs/X.json`. Empty disables remote lookup.
    #[serde(default)]
    pub api_url: String,
    /// Default: see src/templates/config.toml
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            api_url: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// What the panel prints on each row: "name" or "key"
    #[serde(default = "default_display_label")]
    pub display_label: String,
    /// Hex overrides for theme slots (e.g. `selection = "#44475A"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            display_label: default_display_label(),
            colors: HashMap::new(),
        }
    }
}

/// Default: see src/templates/config.toml
fn default_timeout_secs() -> u64 {
    10
}

/// Default: see src/templates/config.toml
fn default_display_label() -> String {
    "name".to_string()
}

impl UiConfig {
    /// True when rows should show keys instead of names
    pub fn label_is_key(&self) -> bool {
        self.display_label == "key"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gets_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.fetch.api_url, "");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.ui.display_label, "name");
        assert!(!config.ui.label_is_key());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fetch]
            api_url = "https://example.com"

            [ui]
            display_label = "key"
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.api_url, "https://example.com");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.ui.label_is_key());
    }
}

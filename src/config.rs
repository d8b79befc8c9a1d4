use log::{warn, Level};
use serde::Deserialize;

use crate::dom::{self, DomError};

/// Id of the optional `<script type="application/json">` block with overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Page-level settings. Every field falls back to the built-in default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub typing_phrases: Vec<String>,
    pub download_store: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            typing_phrases: vec![
                "منصة ذكية للاستشارات والدعم للأشخاص ذوي الإعاقة والمتخصصين".to_string(),
                "تطبيق متطور يجمع الذكاء الاصطناعي والرعاية الصحية".to_string(),
                "دعم شامل من متخصصي العلاج الطبيعي والأطراف الاصطناعية".to_string(),
                "منصة ذكية لتحسين جودة الحياة للأشخاص ذوي الإعاقة".to_string(),
            ],
            download_store: "Google Play".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the config block from the page. A missing block or bad JSON
    /// gives the defaults.
    pub fn load() -> Self {
        match Self::read_page() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                warn!("ignoring site config: {}", err);
                Self::default()
            }
        }
    }

    fn read_page() -> Result<Option<Self>, ConfigError> {
        let Some(element) = dom::document()?.get_element_by_id(CONFIG_ELEMENT_ID) else {
            return Ok(None);
        };
        let raw = element.text_content().unwrap_or_default();
        Ok(Some(Self::from_json(&raw)?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn fields_override_independently() {
        let config = SiteConfig::from_json(r#"{"typing_phrases": ["one", "two"]}"#).unwrap();
        assert_eq!(config.typing_phrases, vec!["one", "two"]);
        assert_eq!(config.download_store, "Google Play");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SiteConfig::from_json("{typing_phrases").is_err());
        assert!(SiteConfig::from_json(r#"{"typing_phrases": 3}"#).is_err());
    }

    #[test]
    fn default_phrases_are_present() {
        assert_eq!(SiteConfig::default().typing_phrases.len(), 4);
    }
}

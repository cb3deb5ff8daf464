//! Parser and export configuration.
//!
//! [`Configuration`] holds the knobs that are fixed for the lifetime of a
//! [`Document`](crate::org::document::Document): inline scanner limits, the
//! org writer's tag column and the default settings that `#+KEY:` lines
//! override. It deserializes from YAML; missing fields take their defaults.

use crate::org::error::OrgError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Settings every document starts with before its own `#+KEY:` lines apply.
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("TODO", "TODO | DONE"),
    ("EXCLUDE_TAGS", "noexport"),
    ("OPTIONS", "toc:t e:t f:t pri:t todo:t tags:t"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Newlines an emphasis span may cross before it is rejected.
    pub max_emphasis_new_lines: usize,
    /// Recognize bare `https://...` style links.
    pub auto_link: bool,
    /// Column the org writer right-aligns headline tags to.
    pub tags_column: usize,
    pub default_settings: BTreeMap<String, String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            max_emphasis_new_lines: 1,
            auto_link: true,
            tags_column: 77,
            default_settings: DEFAULT_SETTINGS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Configuration {
    /// Decode a YAML document. Keys that are absent keep their defaults;
    /// `default_settings` entries are layered over the built-in ones.
    pub fn from_yaml(source: &str) -> Result<Self, OrgError> {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Overrides {
            max_emphasis_new_lines: Option<usize>,
            auto_link: Option<bool>,
            tags_column: Option<usize>,
            default_settings: BTreeMap<String, String>,
        }

        let overrides: Overrides = if source.trim().is_empty() {
            Overrides::default()
        } else {
            serde_yaml::from_str(source)?
        };
        let mut config = Configuration::default();
        if let Some(n) = overrides.max_emphasis_new_lines {
            config.max_emphasis_new_lines = n;
        }
        if let Some(auto_link) = overrides.auto_link {
            config.auto_link = auto_link;
        }
        if let Some(column) = overrides.tags_column {
            config.tags_column = column;
        }
        config.default_settings.extend(overrides.default_settings);
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OrgError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    pub fn to_yaml(&self) -> Result<String, OrgError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

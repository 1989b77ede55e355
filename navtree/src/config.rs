//! Navigation configuration.
//!
//! A [`NavConfig`] is loaded once (usually at process start) and shared as an
//! `Arc<NavConfig>` by every tree built from it. Replace the whole value to
//! change it; trees never observe a half-updated config.
//!
//! # Configuration File Format
//!
//! ```toml
//! selected_class = "active"
//! autogenerate_item_ids = true
//! default_current_key = "home"
//!
//! [[current_navigation]]
//! level = 2
//! key = "invoices"
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{NavError, Result};

/// Class appended to the `class` option of selected items by default.
pub const DEFAULT_SELECTED_CLASS: &str = "selected";

/// Tree-wide settings read during construction and resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavConfig {
    /// Class name appended to selected items.
    pub selected_class: String,
    /// Whether items get an `id` option derived from their key.
    pub autogenerate_item_ids: bool,
    /// Key treated as current on every level without its own entry.
    pub default_current_key: Option<String>,
    /// Explicit current keys for individual levels.
    pub current_navigation: Vec<CurrentKey>,
}

/// Explicitly active key for one tree depth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentKey {
    /// Depth the override applies to (root = 1).
    pub level: usize,
    /// Key of the item to mark as selected.
    pub key: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            selected_class: DEFAULT_SELECTED_CLASS.to_string(),
            autogenerate_item_ids: true,
            default_current_key: None,
            current_navigation: Vec::new(),
        }
    }
}

impl NavConfig {
    /// Load a config file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_by_extension(path.as_ref())
    }

    /// Set the class appended to selected items.
    pub fn with_selected_class(mut self, class: impl Into<String>) -> Self {
        self.selected_class = class.into();
        self
    }

    /// Enable or disable `id` generation from item keys.
    pub fn with_autogenerate_item_ids(mut self, enabled: bool) -> Self {
        self.autogenerate_item_ids = enabled;
        self
    }

    /// Set the key used on levels without an explicit entry.
    pub fn with_default_current_key(mut self, key: impl Into<String>) -> Self {
        self.default_current_key = Some(key.into());
        self
    }

    /// Mark `key` as current for `level`, replacing any earlier entry.
    pub fn with_current_key(mut self, level: usize, key: impl Into<String>) -> Self {
        self.current_navigation.retain(|c| c.level != level);
        self.current_navigation.push(CurrentKey {
            level,
            key: key.into(),
        });
        self
    }

    pub fn autogenerate_item_ids(&self) -> bool {
        self.autogenerate_item_ids
    }

    pub fn selected_class(&self) -> &str {
        &self.selected_class
    }

    /// Current key configured for `level`, falling back to the tree-wide default.
    pub fn current_key_for(&self, level: usize) -> Option<&str> {
        self.current_navigation
            .iter()
            .find(|c| c.level == level)
            .map(|c| c.key.as_str())
            .or(self.default_current_key.as_deref())
    }
}

/// Deserialize a `.toml` or `.json` file into `T`.
pub(crate) fn read_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();

    let content = fs::read_to_string(path).map_err(|source| NavError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_by_extension(&content, &ext)
}

/// Deserialize `content` according to a file extension.
pub(crate) fn parse_by_extension<T: DeserializeOwned>(content: &str, ext: &str) -> Result<T> {
    let value = match ext {
        "toml" | "tml" => toml::from_str(content)?,
        "json" => serde_json::from_str(content)?,
        _ => return Err(NavError::UnsupportedFormat(ext.to_string())),
    };
    Ok(value)
}

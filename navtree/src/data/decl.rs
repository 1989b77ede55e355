use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    config::{parse_by_extension, read_by_extension},
    context::Method,
    data::item::{CLASS_OPTION, HtmlOptions},
    error::Result,
};

/// Declarative description of one item and its children.
///
/// ```toml
/// [[items]]
/// key = "products"
/// name = "Products"
/// url = "/products"
/// options = { class = "wide" }
///
/// [[items.items]]
/// key = "new"
/// name = "New product"
/// url = "/products/new"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSpec {
    pub key: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    #[serde(default, skip_serializing_if = "HtmlOptions::is_empty")]
    pub options: HtmlOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemSpec>,
}

impl ItemSpec {
    pub fn new(key: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            url: url.into(),
            method: None,
            options: HtmlOptions::new(),
            items: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_option(CLASS_OPTION, class)
    }

    /// Append a child item.
    pub fn with_item(mut self, item: ItemSpec) -> Self {
        self.items.push(item);
        self
    }
}

/// A whole navigation declared as data, loadable from TOML or JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NavigationSpec {
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

impl NavigationSpec {
    /// Load a navigation file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_by_extension(path.as_ref())
    }

    /// Parse navigation content in the format named by `ext` (`toml` or `json`).
    pub fn parse(content: &str, ext: &str) -> Result<Self> {
        parse_by_extension(content, ext)
    }
}

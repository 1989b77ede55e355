use indexmap::IndexMap;

use crate::{config::NavConfig, context::Method, data::container::ItemContainer};

/// Ordered rendering hints handed to the markup layer.
pub type HtmlOptions = IndexMap<String, String>;

/// Option key holding the space separated class list.
pub const CLASS_OPTION: &str = "class";
/// Option key holding the element id.
pub const ID_OPTION: &str = "id";
/// Option key consumed at construction to set the item's method.
pub const METHOD_OPTION: &str = "method";

/// A single navigation entry.
///
/// Items are created through [`ItemContainer::add`] and owned by their
/// container. Whether an item is selected depends on the request, so it is
/// answered by a [`Resolution`](crate::Resolution) rather than by the item.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationItem {
    pub(crate) key: String,
    pub(crate) name: String,
    pub(crate) url: String,
    pub(crate) method: Option<Method>,
    pub(crate) options: HtmlOptions,
    pub(crate) sub_navigation: Option<ItemContainer>,
    /// Depth of the owning container.
    pub(crate) level: usize,
    /// Dense index into a resolution's memo, assigned by the tree.
    pub(crate) slot: usize,
}

impl NavigationItem {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// Options exactly as declared, without generated id or selected class.
    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    pub fn sub_navigation(&self) -> Option<&ItemContainer> {
        self.sub_navigation.as_ref()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Options to render for this item given its selection state.
    ///
    /// Starts from `{id: key}` when id generation is enabled, overlays the
    /// declared options and appends the selected class. An empty class list
    /// is dropped instead of rendered as `class=""`.
    pub fn render_options(&self, config: &NavConfig, selected: bool) -> HtmlOptions {
        let mut options = HtmlOptions::new();
        if config.autogenerate_item_ids() {
            options.insert(ID_OPTION.to_string(), self.key.clone());
        }
        for (k, v) in &self.options {
            options.insert(k.clone(), v.clone());
        }

        let selected_class = selected.then(|| config.selected_class());
        let class = self
            .options
            .get(CLASS_OPTION)
            .map(String::as_str)
            .into_iter()
            .chain(selected_class)
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");

        if class.is_empty() {
            options.shift_remove(CLASS_OPTION);
        } else {
            options.insert(CLASS_OPTION.to_string(), class);
        }
        options
    }
}

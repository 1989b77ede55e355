//! The navigation tree and its construction entry points.

use std::{path::Path, sync::Arc};

use crate::{
    config::NavConfig,
    context::RequestContext,
    data::{ItemContainer, NavigationItem, NavigationSpec},
    error::Result,
    resolve::Resolution,
};

/// A complete navigation: the primary container plus its configuration.
///
/// The tree is immutable once built and holds no request state, so a tree
/// built from static configuration can be shared between requests. Each
/// request gets its own [`Resolution`] through [`NavigationTree::resolve`].
#[derive(Debug, Clone)]
pub struct NavigationTree {
    config: Arc<NavConfig>,
    root: ItemContainer,
    item_count: usize,
}

impl NavigationTree {
    /// Assemble a tree from an already built primary container.
    pub fn new(config: impl Into<Arc<NavConfig>>, mut root: ItemContainer) -> Self {
        let mut item_count = 0;
        root.index(1, &mut item_count);
        debug!("navigation tree assembled with {item_count} items");
        Self {
            config: config.into(),
            root,
            item_count,
        }
    }

    /// Build a tree by declaring the primary items in `build`.
    ///
    /// ```rust
    /// use navtree::{ItemSpec, NavConfig, NavigationTree};
    ///
    /// let tree = NavigationTree::build(NavConfig::default(), |primary| {
    ///     primary.item("home", "Home", "/")?;
    ///     primary.add_with(ItemSpec::new("products", "Products", "/products"), |sub| {
    ///         sub.item("new", "New product", "/products/new")?;
    ///         Ok(())
    ///     })?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(tree.item_count(), 3);
    /// ```
    pub fn build<F>(config: impl Into<Arc<NavConfig>>, build: F) -> Result<Self>
    where
        F: FnOnce(&mut ItemContainer) -> Result<()>,
    {
        let mut root = ItemContainer::root();
        build(&mut root)?;
        Ok(Self::new(config, root))
    }

    /// Build a tree from a declarative description.
    pub fn from_spec(config: impl Into<Arc<NavConfig>>, spec: NavigationSpec) -> Result<Self> {
        Self::build(config, |root| {
            for item in spec.items {
                root.add(item)?;
            }
            Ok(())
        })
    }

    /// Load a `.toml` or `.json` navigation file.
    pub fn load(path: impl AsRef<Path>, config: impl Into<Arc<NavConfig>>) -> Result<Self> {
        let spec = NavigationSpec::load(path)?;
        Self::from_spec(config, spec)
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// The primary (level 1) container.
    pub fn root(&self) -> &ItemContainer {
        &self.root
    }

    /// Number of items at all levels.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Look up an item by its chain of keys from the root.
    pub fn get_by_path(&self, keys: &[&str]) -> Option<&NavigationItem> {
        let (last, parents) = keys.split_last()?;
        let mut container = &self.root;
        for key in parents {
            container = container.get(key)?.sub_navigation()?;
        }
        container.get(last)
    }

    /// Look up an item by a dot-separated key path, e.g. `products.new`.
    pub fn get_by_key(&self, key: &str) -> Option<&NavigationItem> {
        if key.is_empty() {
            return None;
        }
        let keys = key.split('.').collect::<Vec<_>>();
        self.get_by_path(&keys)
    }

    /// Start a selection pass for one request.
    pub fn resolve<'a>(&'a self, ctx: &'a dyn RequestContext) -> Resolution<'a> {
        Resolution::new(self, ctx)
    }
}

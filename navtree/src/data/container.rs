use crate::{
    context::Method,
    data::{
        item::{METHOD_OPTION, NavigationItem},
        decl::ItemSpec,
    },
    error::{NavError, Result},
};

/// Ordered items sharing one depth of the tree.
///
/// Keys are unique within a container and insertion order is render order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemContainer {
    level: usize,
    items: Vec<NavigationItem>,
}

impl ItemContainer {
    /// An empty top-level container.
    pub fn root() -> Self {
        Self::new(1)
    }

    pub(crate) fn new(level: usize) -> Self {
        Self {
            level,
            items: Vec::new(),
        }
    }

    /// Depth of this container, the root being level 1.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&NavigationItem> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Shorthand for adding a plain item.
    pub fn item(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<&mut NavigationItem> {
        self.add(ItemSpec::new(key, name, url))
    }

    /// Append an item described by `spec`, including its declared children.
    ///
    /// # Errors
    ///
    /// Fails with [`NavError::DuplicateKey`] if the key (or a child key within
    /// its own container) is already taken, and with
    /// [`NavError::InvalidMethod`] for an unknown `method` option. The
    /// container is left unchanged on error.
    pub fn add(&mut self, spec: ItemSpec) -> Result<&mut NavigationItem> {
        self.insert(spec, false, |_| Ok(()))
    }

    /// Append an item and declare further children through `build`.
    ///
    /// `build` runs immediately with the new item's child container, after
    /// any children listed in `spec`. The item is only added if `build`
    /// succeeds.
    pub fn add_with<F>(&mut self, spec: ItemSpec, build: F) -> Result<&mut NavigationItem>
    where
        F: FnOnce(&mut ItemContainer) -> Result<()>,
    {
        self.insert(spec, true, build)
    }

    fn insert<F>(&mut self, spec: ItemSpec, keep_sub: bool, build: F) -> Result<&mut NavigationItem>
    where
        F: FnOnce(&mut ItemContainer) -> Result<()>,
    {
        if self.contains_key(&spec.key) {
            debug!("rejecting duplicate key `{}` at level {}", spec.key, self.level);
            return Err(NavError::DuplicateKey {
                key: spec.key,
                level: self.level,
            });
        }

        let ItemSpec {
            key,
            name,
            url,
            method,
            mut options,
            items,
        } = spec;

        let method_option = options
            .shift_remove(METHOD_OPTION)
            .map(|m| m.parse::<Method>())
            .transpose()?;
        let method = method.or(method_option);

        let mut sub = ItemContainer::new(self.level + 1);
        for child in items {
            sub.add(child)?;
        }
        build(&mut sub)?;

        let sub_navigation = (keep_sub || !sub.is_empty()).then_some(sub);

        self.items.push(NavigationItem {
            key,
            name,
            url,
            method,
            options,
            sub_navigation,
            level: self.level,
            slot: 0,
        });
        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }

    /// Re-level this subtree and number its items in pre-order.
    pub(crate) fn index(&mut self, level: usize, next_slot: &mut usize) {
        self.level = level;
        for item in &mut self.items {
            item.level = level;
            item.slot = *next_slot;
            *next_slot += 1;
            if let Some(sub) = &mut item.sub_navigation {
                sub.index(level + 1, next_slot);
            }
        }
    }
}

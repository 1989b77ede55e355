//! Per-request selection.
//!
//! A [`Resolution`] answers "is this item selected?" for every item of one
//! tree against one request. Answers are computed on first use and cached
//! for the lifetime of the pass; a new request needs a new pass.
//!
//! An item is selected when, in this order:
//!
//! 1. its key is the current key configured for its level,
//! 2. any item in its sub navigation is selected,
//! 3. its URL is `/` and the request path is `/`, or the request context
//!    reports the URL as the current page.

use std::{cell::OnceCell, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::{
    context::{Method, RequestContext},
    data::{HtmlOptions, ItemContainer, NavigationItem},
    tree::NavigationTree,
};

const ROOT_PATH: &str = "/";

/// Which level of the active path a helper refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A specific depth, the root being 1.
    Nth(usize),
    /// The deepest active level.
    Deepest,
}

/// One selection pass over a tree for a single request.
pub struct Resolution<'a> {
    tree: &'a NavigationTree,
    ctx: &'a dyn RequestContext,
    current_keys: BTreeMap<usize, String>,
    memo: Vec<OnceCell<bool>>,
    active: OnceCell<ActiveChain<'a>>,
}

/// Active path of a pass plus the levels where siblings competed.
struct ActiveChain<'a> {
    items: Vec<&'a NavigationItem>,
    ambiguous_levels: Vec<usize>,
}

impl<'a> Resolution<'a> {
    pub(crate) fn new(tree: &'a NavigationTree, ctx: &'a dyn RequestContext) -> Self {
        Self {
            tree,
            ctx,
            current_keys: BTreeMap::new(),
            memo: fresh_memo(tree),
            active: OnceCell::new(),
        }
    }

    /// Mark `key` as current for `level` in this pass only.
    ///
    /// Takes precedence over the tree's configuration. Answers cached so far
    /// are discarded.
    pub fn with_current_key(mut self, level: usize, key: impl Into<String>) -> Self {
        self.current_keys.insert(level, key.into());
        self.memo = fresh_memo(self.tree);
        self.active = OnceCell::new();
        self
    }

    pub fn tree(&self) -> &'a NavigationTree {
        self.tree
    }

    pub fn context(&self) -> &'a dyn RequestContext {
        self.ctx
    }

    /// Key explicitly designated as current for `level`, if any.
    pub fn current_key(&self, level: usize) -> Option<&str> {
        self.current_keys
            .get(&level)
            .map(String::as_str)
            .or_else(|| self.tree.config().current_key_for(level))
    }

    /// Whether `item` is selected for this request.
    ///
    /// `item` must belong to the tree this pass was created from.
    pub fn item_selected(&self, item: &NavigationItem) -> bool {
        debug_assert!(
            self.owns(item),
            "item `{}` does not belong to this navigation tree",
            item.key()
        );
        match self.memo.get(item.slot) {
            Some(cell) => *cell.get_or_init(|| self.evaluate(item)),
            None => self.evaluate(item),
        }
    }

    /// Whether any item of `container` is selected.
    ///
    /// Every item is evaluated so each one's result is cached for rendering.
    pub fn container_selected(&self, container: &ItemContainer) -> bool {
        let mut selected = false;
        for item in container.items() {
            selected |= self.item_selected(item);
        }
        selected
    }

    /// Options to hand to the renderer for `item`.
    pub fn render_options(&self, item: &NavigationItem) -> HtmlOptions {
        item.render_options(self.tree.config(), self.item_selected(item))
    }

    /// Renderer views over the items of `container`.
    pub fn items<'r>(&'r self, container: &'a ItemContainer) -> Vec<ResolvedItem<'r, 'a>> {
        container
            .items()
            .iter()
            .map(|item| ResolvedItem { pass: self, item })
            .collect()
    }

    /// Renderer views over the primary items.
    pub fn root_items<'r>(&'r self) -> Vec<ResolvedItem<'r, 'a>> {
        self.items(self.tree.root())
    }

    /// Selected items from the root down to the deepest selected level.
    ///
    /// When several siblings are selected the first in insertion order is
    /// followed and a warning is logged once per pass.
    pub fn active_path(&self) -> Vec<&'a NavigationItem> {
        self.active_chain().items.clone()
    }

    /// Levels where more than one sibling was selected.
    pub fn ambiguous_levels(&self) -> Vec<usize> {
        self.active_chain().ambiguous_levels.clone()
    }

    fn active_chain(&self) -> &ActiveChain<'a> {
        self.active.get_or_init(|| {
            let mut chain = ActiveChain {
                items: Vec::new(),
                ambiguous_levels: Vec::new(),
            };
            let mut container = Some(self.tree.root());
            while let Some(current) = container {
                let selected = self.selected_in(current);
                let Some(&item) = selected.first() else {
                    break;
                };
                if selected.len() > 1 {
                    chain.ambiguous_levels.push(current.level());
                }
                chain.items.push(item);
                container = item.sub_navigation();
            }
            chain
        })
    }

    /// The active item at `level`.
    pub fn active_item(&self, level: Level) -> Option<&'a NavigationItem> {
        let path = self.active_path();
        match level {
            Level::Nth(0) => None,
            Level::Nth(n) => path.get(n - 1).copied(),
            Level::Deepest => path.last().copied(),
        }
    }

    pub fn active_item_key(&self, level: Level) -> Option<&'a str> {
        self.active_item(level).map(NavigationItem::key)
    }

    pub fn active_item_name(&self, level: Level) -> Option<&'a str> {
        self.active_item(level).map(NavigationItem::name)
    }

    /// The container rendered at `level` for this request.
    ///
    /// Level 1 is always the root. Deeper levels exist only below an active
    /// item. [`Level::Deepest`] is the container holding the deepest active
    /// item.
    pub fn active_item_container(&self, level: Level) -> Option<&'a ItemContainer> {
        match level {
            Level::Nth(0) => None,
            Level::Nth(1) => Some(self.tree.root()),
            Level::Nth(n) => self.active_path().get(n - 2).copied()?.sub_navigation(),
            Level::Deepest => {
                let path = self.active_path();
                match path.len() {
                    0 => None,
                    1 => Some(self.tree.root()),
                    len => path[len - 2].sub_navigation(),
                }
            }
        }
    }

    /// Owned copy of the active path, detached from the tree.
    pub fn snapshot(&self) -> ActivePath {
        let chain = self.active_chain();
        ActivePath {
            ambiguous_levels: chain.ambiguous_levels.clone(),
            entries: chain
                .items
                .iter()
                .map(|item| ActiveEntry {
                    level: item.level(),
                    key: item.key().to_string(),
                    name: item.name().to_string(),
                    url: item.url().to_string(),
                })
                .collect(),
        }
    }

    fn selected_in(&self, container: &'a ItemContainer) -> Vec<&'a NavigationItem> {
        let selected = container
            .items()
            .iter()
            .filter(|item| self.item_selected(item))
            .collect::<Vec<_>>();

        if selected.len() > 1 {
            let keys = selected.iter().map(|i| i.key()).collect::<Vec<_>>();
            warn!(
                "{} items selected at level {}: {:?}, following `{}`",
                selected.len(),
                container.level(),
                keys,
                keys[0]
            );
        }
        selected
    }

    fn owns(&self, item: &NavigationItem) -> bool {
        fn walk(container: &ItemContainer, item: &NavigationItem) -> bool {
            container.items().iter().any(|candidate| {
                std::ptr::eq(candidate, item)
                    || candidate.sub_navigation().is_some_and(|sub| walk(sub, item))
            })
        }
        walk(self.tree.root(), item)
    }

    fn evaluate(&self, item: &NavigationItem) -> bool {
        let selected = self.selected_by_config(item)
            || self.selected_by_sub_navigation(item)
            || self.selected_by_url(item);
        trace!("item `{}` (level {}) selected: {selected}", item.key(), item.level());
        selected
    }

    fn selected_by_config(&self, item: &NavigationItem) -> bool {
        self.current_key(item.level()) == Some(item.key())
    }

    fn selected_by_sub_navigation(&self, item: &NavigationItem) -> bool {
        item.sub_navigation()
            .is_some_and(|sub| self.container_selected(sub))
    }

    fn selected_by_url(&self, item: &NavigationItem) -> bool {
        self.root_path_match(item) || self.ctx.matches_current_request(item.url(), item.method())
    }

    fn root_path_match(&self, item: &NavigationItem) -> bool {
        item.url() == ROOT_PATH && self.ctx.current_path() == ROOT_PATH
    }
}

fn fresh_memo(tree: &NavigationTree) -> Vec<OnceCell<bool>> {
    (0..tree.item_count()).map(|_| OnceCell::new()).collect()
}

/// Read-only view of an item within a pass, as consumed by renderers.
#[derive(Clone, Copy)]
pub struct ResolvedItem<'r, 'a> {
    pass: &'r Resolution<'a>,
    item: &'a NavigationItem,
}

impl<'r, 'a> ResolvedItem<'r, 'a> {
    pub fn item(&self) -> &'a NavigationItem {
        self.item
    }

    pub fn key(&self) -> &'a str {
        self.item.key()
    }

    pub fn name(&self) -> &'a str {
        self.item.name()
    }

    pub fn url(&self) -> &'a str {
        self.item.url()
    }

    pub fn method(&self) -> Option<Method> {
        self.item.method()
    }

    pub fn level(&self) -> usize {
        self.item.level()
    }

    pub fn selected(&self) -> bool {
        self.pass.item_selected(self.item)
    }

    pub fn render_options(&self) -> HtmlOptions {
        self.pass.render_options(self.item)
    }

    pub fn has_sub_navigation(&self) -> bool {
        self.item.sub_navigation().is_some()
    }

    pub fn sub_navigation(&self) -> Option<Vec<ResolvedItem<'r, 'a>>> {
        self.item.sub_navigation().map(|sub| self.pass.items(sub))
    }
}

/// One step of an [`ActivePath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEntry {
    /// Depth of the item, the root being 1.
    pub level: usize,
    /// Item key.
    pub key: String,
    /// Display label.
    pub name: String,
    /// Target URL as declared.
    pub url: String,
}

/// Snapshot of the selected chain, root first, for breadcrumbs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePath {
    /// Selected items from the root down.
    pub entries: Vec<ActiveEntry>,
    /// Levels where several siblings were selected and the first was followed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_levels: Vec<usize>,
}

impl ActivePath {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Whether any level had more than one selected item.
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous_levels.is_empty()
    }

    /// The deepest active entry.
    pub fn leaf(&self) -> Option<&ActiveEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        config::NavConfig,
        context::{NoRequest, StaticRequest},
        data::ItemSpec,
    };

    fn shop(config: NavConfig) -> NavigationTree {
        NavigationTree::build(config, |primary| {
            primary.item("home", "Home", "/")?;
            primary.add_with(ItemSpec::new("products", "Products", "/products"), |sub| {
                sub.item("list", "All products", "/products/all")?;
                sub.add_with(ItemSpec::new("a", "A", "/a"), |leaf| {
                    leaf.item("b", "B", "/a/b")?;
                    Ok(())
                })?;
                Ok(())
            })?;
            primary.item("unrelated", "Unrelated", "/unrelated")?;
            Ok(())
        })
        .unwrap()
    }

    fn selected_keys(pass: &Resolution<'_>) -> Vec<String> {
        let mut keys = Vec::new();
        let mut stack = vec![pass.tree().root()];
        while let Some(container) = stack.pop() {
            for item in container.items() {
                if pass.item_selected(item) {
                    keys.push(item.key().to_string());
                }
                if let Some(sub) = item.sub_navigation() {
                    stack.push(sub);
                }
            }
        }
        keys.sort();
        keys
    }

    /// Counts route matching calls to observe memoization.
    struct CountingRequest {
        inner: StaticRequest,
        calls: Cell<usize>,
    }

    impl RequestContext for CountingRequest {
        fn current_path(&self) -> &str {
            self.inner.current_path()
        }

        fn matches_current_request(&self, url: &str, method: Option<Method>) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.inner.matches_current_request(url, method)
        }
    }

    #[test]
    fn test_config_override_wins_over_url() {
        let tree = shop(NavConfig::default().with_current_key(1, "unrelated"));
        let ctx = StaticRequest::get("/totally/different");
        let pass = tree.resolve(&ctx);
        let item = tree.root().get("unrelated").unwrap();
        assert!(pass.item_selected(item));
        assert_eq!(selected_keys(&pass), vec!["unrelated"]);
    }

    #[test]
    fn test_pass_override_wins_over_config() {
        let tree = shop(NavConfig::default().with_current_key(1, "home"));
        let ctx = NoRequest;
        let pass = tree.resolve(&ctx).with_current_key(1, "products");
        assert_eq!(pass.current_key(1), Some("products"));
        assert_eq!(selected_keys(&pass), vec!["products"]);
    }

    #[test]
    fn test_override_applies_per_level() {
        let tree = shop(NavConfig::default().with_current_key(2, "list"));
        let ctx = NoRequest;
        let pass = tree.resolve(&ctx);
        assert_eq!(selected_keys(&pass), vec!["list", "products"]);
    }

    #[test]
    fn test_default_current_key_applies_to_every_level() {
        let tree = shop(NavConfig::default().with_default_current_key("a"));
        let ctx = NoRequest;
        let pass = tree.resolve(&ctx);
        assert_eq!(selected_keys(&pass), vec!["a", "products"]);
    }

    #[test]
    fn test_sub_navigation_propagation() {
        let tree = shop(NavConfig::default());
        let ctx = StaticRequest::get("/a/b");
        let pass = tree.resolve(&ctx);
        assert!(pass.item_selected(tree.root().get("products").unwrap()));
        assert!(pass.container_selected(tree.root()));
        assert_eq!(selected_keys(&pass), vec!["a", "b", "products"]);
        assert!(!pass.item_selected(tree.root().get("home").unwrap()));
    }

    #[test]
    fn test_root_path_special_case() {
        struct NeverMatches;
        impl RequestContext for NeverMatches {
            fn current_path(&self) -> &str {
                "/"
            }
            fn matches_current_request(&self, _url: &str, _method: Option<Method>) -> bool {
                false
            }
        }

        let tree = shop(NavConfig::default());
        let ctx = NeverMatches;
        let pass = tree.resolve(&ctx);
        assert_eq!(selected_keys(&pass), vec!["home"]);
    }

    #[test]
    fn test_root_url_does_not_match_other_paths() {
        let tree = shop(NavConfig::default());
        let ctx = StaticRequest::get("/other");
        let pass = tree.resolve(&ctx);
        assert!(!pass.item_selected(tree.root().get("home").unwrap()));
        assert!(selected_keys(&pass).is_empty());
    }

    #[test]
    fn test_missing_context_selects_nothing() {
        let tree = shop(NavConfig::default());
        let ctx = NoRequest;
        let pass = tree.resolve(&ctx);
        assert!(selected_keys(&pass).is_empty());
        assert!(pass.active_path().is_empty());
        assert!(pass.snapshot().is_empty());
    }

    #[test]
    fn test_selection_is_memoized() {
        let tree = shop(NavConfig::default());
        let ctx = CountingRequest {
            inner: StaticRequest::get("/products/all"),
            calls: Cell::new(0),
        };
        let pass = tree.resolve(&ctx);

        let products = tree.root().get("products").unwrap();
        assert!(pass.item_selected(products));
        let calls = ctx.calls.get();
        assert!(calls > 0);

        for _ in 0..3 {
            assert!(pass.item_selected(products));
            assert!(pass.container_selected(tree.root()));
        }
        // Only the items not reached through `products` are evaluated later.
        assert_eq!(ctx.calls.get(), calls + 2);

        let again = tree.resolve(&ctx);
        assert!(again.item_selected(products));
        assert!(ctx.calls.get() > calls + 2);
    }

    #[test]
    fn test_container_selected_evaluates_all_items() {
        let tree = shop(NavConfig::default());
        let ctx = CountingRequest {
            inner: StaticRequest::get("/"),
            calls: Cell::new(0),
        };
        let pass = tree.resolve(&ctx);
        assert!(pass.container_selected(tree.root()));
        let calls = ctx.calls.get();

        // Every item already has a cached answer.
        selected_keys(&pass);
        assert_eq!(ctx.calls.get(), calls);
    }

    #[test]
    fn test_render_options_follow_selection() {
        let config = NavConfig::default().with_selected_class("active");
        let tree = NavigationTree::build(config, |primary| {
            primary.add(ItemSpec::new("home", "Home", "/").with_class("custom"))?;
            primary.item("about", "About", "/about")?;
            Ok(())
        })
        .unwrap();
        let ctx = StaticRequest::get("/");
        let pass = tree.resolve(&ctx);

        let items = pass.root_items();
        let home = items[0].render_options();
        assert_eq!(home.get("id").unwrap(), "home");
        assert_eq!(home.get("class").unwrap(), "custom active");

        let about = items[1].render_options();
        assert_eq!(about.get("id").unwrap(), "about");
        assert!(!about.contains_key("class"));
    }

    #[test]
    fn test_active_path_and_helpers() {
        let tree = shop(NavConfig::default());
        let ctx = StaticRequest::get("/a/b");
        let pass = tree.resolve(&ctx);

        let keys = pass
            .active_path()
            .iter()
            .map(|item| item.key())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["products", "a", "b"]);

        assert_eq!(pass.active_item_key(Level::Nth(1)), Some("products"));
        assert_eq!(pass.active_item_name(Level::Nth(2)), Some("A"));
        assert_eq!(pass.active_item_key(Level::Deepest), Some("b"));
        assert_eq!(pass.active_item_key(Level::Nth(4)), None);
        assert_eq!(pass.active_item(Level::Nth(0)), None);

        assert_eq!(pass.active_item_container(Level::Nth(1)).unwrap().level(), 1);
        let second = pass.active_item_container(Level::Nth(2)).unwrap();
        assert!(second.contains_key("list"));
        let deepest = pass.active_item_container(Level::Deepest).unwrap();
        assert_eq!(deepest.level(), 3);
        assert!(deepest.contains_key("b"));
        assert!(pass.active_item_container(Level::Nth(4)).is_none());
    }

    #[test]
    fn test_active_item_container_without_selection() {
        let tree = shop(NavConfig::default());
        let ctx = NoRequest;
        let pass = tree.resolve(&ctx);
        assert_eq!(pass.active_item_container(Level::Nth(1)).unwrap().len(), 3);
        assert!(pass.active_item_container(Level::Nth(2)).is_none());
        assert!(pass.active_item_container(Level::Deepest).is_none());
    }

    #[test]
    fn test_ambiguous_selection_follows_first() {
        let _ = env_logger::builder().is_test(true).try_init();
        let tree = NavigationTree::build(NavConfig::default(), |primary| {
            primary.item("first", "First", "/same")?;
            primary.item("second", "Second", "/same")?;
            Ok(())
        })
        .unwrap();
        let ctx = StaticRequest::get("/same");
        let pass = tree.resolve(&ctx);

        assert_eq!(pass.active_item_key(Level::Deepest), Some("first"));
        assert_eq!(pass.active_item_key(Level::Deepest), Some("first"));
        assert!(pass.item_selected(tree.root().get("second").unwrap()));

        assert_eq!(pass.ambiguous_levels(), vec![1]);
        let snapshot = pass.snapshot();
        assert!(snapshot.is_ambiguous());
        assert_eq!(snapshot.ambiguous_levels, vec![1]);
        assert_eq!(snapshot.keys(), vec!["first"]);
    }

    #[test]
    fn test_unique_selection_is_not_ambiguous() {
        let tree = shop(NavConfig::default());
        let ctx = StaticRequest::get("/a/b");
        let pass = tree.resolve(&ctx);
        assert!(pass.ambiguous_levels().is_empty());
        assert!(!pass.snapshot().is_ambiguous());
    }

    #[test]
    fn test_override_after_query_discards_cache() {
        let tree = NavigationTree::build(NavConfig::default(), |primary| {
            primary.item("home", "Home", "/")?;
            primary.item("products", "Products", "/products")?;
            Ok(())
        })
        .unwrap();
        let ctx = StaticRequest::get("/");
        let pass = tree.resolve(&ctx);
        let products = tree.root().get("products").unwrap();

        assert_eq!(pass.active_item_key(Level::Nth(1)), Some("home"));
        assert!(!pass.item_selected(products));

        let pass = pass.with_current_key(1, "products");
        assert_eq!(pass.current_key(1), Some("products"));
        assert!(pass.item_selected(products));
        assert_eq!(pass.active_item_key(Level::Nth(1)), Some("home"));
        assert_eq!(pass.ambiguous_levels(), vec![1]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not belong")]
    fn test_item_from_other_tree_rejected() {
        let tree = shop(NavConfig::default());
        let other = shop(NavConfig::default());
        let ctx = NoRequest;
        let pass = tree.resolve(&ctx);
        pass.item_selected(other.root().get("home").unwrap());
    }

    #[test]
    fn test_snapshot_outlives_pass() {
        let tree = shop(NavConfig::default());
        let snapshot = {
            let ctx = StaticRequest::get("/products/all");
            tree.resolve(&ctx).snapshot()
        };
        assert_eq!(snapshot.keys(), vec!["products", "list"]);
        assert_eq!(snapshot.names(), vec!["Products", "All products"]);
        assert_eq!(snapshot.leaf().unwrap().level, 2);
        assert_eq!(snapshot.leaf().unwrap().url, "/products/all");

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ActivePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_resolved_item_views() {
        let tree = shop(NavConfig::default());
        let ctx = StaticRequest::get("/a/b");
        let pass = tree.resolve(&ctx);

        let items = pass.root_items();
        assert_eq!(
            items.iter().map(ResolvedItem::name).collect::<Vec<_>>(),
            vec!["Home", "Products", "Unrelated"]
        );
        let products = items[1];
        assert!(products.selected());
        assert!(products.has_sub_navigation());
        let children = products.sub_navigation().unwrap();
        assert_eq!(children[1].key(), "a");
        assert!(children[1].selected());
        assert_eq!(children[1].level(), 2);
        assert!(!children[0].selected());
        assert!(items[0].sub_navigation().is_none());
    }
}

//! # navtree
//!
//! Hierarchical navigation menus for server-rendered web applications, with
//! per-request resolution of the active item and its ancestor chain.
//!
//! ## Features
//!
//! - Builder API and serde-friendly declarations (TOML / JSON) for menu trees
//! - Per-level "current key" overrides that take precedence over URL matching
//! - Selection propagates from any selected descendant up to its ancestors
//! - Memoized selection per request, with trees shareable between requests
//! - Render options with generated ids and a configurable selected class
//! - Active path helpers for breadcrumbs and secondary menus
//!
//! ## Quick Start
//!
//! ```rust
//! use navtree::{ItemSpec, Level, NavConfig, NavigationTree, StaticRequest};
//!
//! let tree = NavigationTree::build(NavConfig::default(), |primary| {
//!     primary.item("home", "Home", "/")?;
//!     primary.add_with(ItemSpec::new("products", "Products", "/products"), |sub| {
//!         sub.item("new", "New product", "/products/new")?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let request = StaticRequest::get("/products/new");
//! let pass = tree.resolve(&request);
//!
//! assert_eq!(pass.active_item_key(Level::Nth(1)), Some("products"));
//! assert_eq!(pass.snapshot().keys(), vec!["products", "new"]);
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Tree-wide settings
//! - [`context`] - The request collaborator and HTTP methods
//! - [`data`] - Items, containers and their declarative descriptions
//! - [`resolve`] - Per-request selection passes
//! - [`tree`] - The navigation tree

#[macro_use]
extern crate log;

/// Tree-wide settings such as the selected class and current key overrides.
pub mod config;

/// Request information consumed during selection.
pub mod context;

/// Navigation data structures.
pub mod data;

/// Error types and result definitions.
pub mod error;

/// Per-request selection passes.
pub mod resolve;

/// The navigation tree and its construction entry points.
pub mod tree;

pub use config::{CurrentKey, NavConfig};
pub use context::{Method, NoRequest, RequestContext, StaticRequest};
pub use data::{HtmlOptions, ItemContainer, ItemSpec, NavigationItem, NavigationSpec};
pub use error::{NavError, Result};
pub use resolve::{ActiveEntry, ActivePath, Level, Resolution, ResolvedItem};
pub use tree::NavigationTree;

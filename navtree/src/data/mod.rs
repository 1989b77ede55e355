//! Navigation data structures.
//!
//! - [`item`] - Individual navigation entries and their render options
//! - [`container`] - Ordered items at one depth, and the builder operations
//! - [`decl`] - Serde descriptions of items for file based declarations

/// Individual navigation entries.
pub mod item;

/// Item containers and tree construction.
pub mod container;

/// Declarative item descriptions.
pub mod decl;

pub use container::ItemContainer;
pub use item::{HtmlOptions, NavigationItem};
pub use decl::{ItemSpec, NavigationSpec};

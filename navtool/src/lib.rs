//! # navtool
//!
//! Command line companion for `navtree`: loads navigation files, validates
//! them and shows which items a given request would select.
//!
//! ## Modules
//!
//! - [`report`] - Text rendering of resolved trees
//! - [`request`] - Building request contexts and overrides from arguments

/// Text rendering of resolved navigation trees.
pub mod report;

/// Request contexts and current key overrides from command line arguments.
pub mod request;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

//! Core data layer – dataset loading, the filter pipeline, page navigation
//! and the aggregations the charts draw from.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod nav;
pub mod posting;
pub mod report;
pub mod session;

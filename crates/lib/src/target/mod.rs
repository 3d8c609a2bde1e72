//! Target model.
//!
//! Targets are the named buildable units of a project: binaries, libraries and
//! groups. They are declared into a [`Registry`], which validates each
//! declaration and records it, and are read back from the [`BuildGraph`] the
//! registry finishes into.
//!
//! # Submodules
//!
//! - [`language`] - Source languages and their default compile flags
//! - [`registry`] - Declaration operations and the finished graph

pub mod language;
pub mod registry;
mod types;

pub use language::Language;
pub use registry::{BuildGraph, Registry, base_dir_of};
pub use types::*;

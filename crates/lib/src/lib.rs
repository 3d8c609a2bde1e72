//! brick-lib: Core types and logic for brick
//!
//! brick turns C-family target declarations into a Ninja build file:
//! - `Target`: a binary, library or group, declared into a `Registry`
//! - `BuildGraph`: the finished, read-only set of targets
//! - `TargetTriple`: the platform a target compiles for
//! - `emit_ninja`: flattening from a root and writing rules and edges
//!
//! Declarations normally come from a Lua build file evaluated with
//! [`eval::evaluate_config`].

pub mod consts;
pub mod eval;
pub mod generate;
pub mod glob;
pub mod graph;
pub mod init;
pub mod limits;
pub mod lua;
pub mod ninja;
pub mod platform;
pub mod target;

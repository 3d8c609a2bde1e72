//! Lua build file surface.
//!
//! Build files are Lua scripts that declare targets through the `brick`
//! global. This module owns the Lua VM for one generation run, registers the
//! global table and tracks which file each declaration comes from.
//!
//! # Submodules
//!
//! - [`globals`] - The `brick` table and its declaration functions
//! - [`loaders`] - `dofile`/`require` with declaring-file tracking
//! - [`runtime`] - VM setup
//! - [`targets`] - Argument tables and target reference tables

pub mod globals;
pub mod loaders;
pub mod runtime;
pub mod targets;

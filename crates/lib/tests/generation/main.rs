//! Integration tests for build file generation.
//!
//! `emit_tests` drives the library API directly; `lua_tests` evaluates the
//! fixture projects under `tests/fixtures` and generates into temp dirs.

mod common;
mod emit_tests;
mod lua_tests;

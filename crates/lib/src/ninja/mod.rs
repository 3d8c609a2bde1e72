//! Ninja build file generation.
//!
//! Turns a flattened target list into the textual build graph consumed by
//! `ninja`: a version header, one stanza per rule, a compile-commands edge,
//! then per-target compile, link, merge and header-publish edges.
//!
//! # Submodules
//!
//! - [`emit`] - Edge generation and path conventions
//! - [`rules`] - The rule table written at the top of every file

pub mod emit;
pub mod rules;

pub use emit::{EmitError, EmitOptions, EmitSummary, emit_ninja};
pub use rules::{Rule, RuleError, RuleTable, Variable};

//! Ninja rule table.
//!
//! Every generated file starts with one `rule` stanza per entry of a
//! [`RuleTable`]. The table is populated during declaration and read-only
//! during emission.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

pub const CXX: &str = "cxx";
pub const MERGE_OBJECT: &str = "merge-object";
pub const LINK_BINARY: &str = "link-binary";
pub const NAMESPACE_HEADER: &str = "namespace-header";
pub const COMPDB: &str = "compdb";

/// Errors raised while registering rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
  #[error("rule name must not be empty")]
  EmptyName,

  #[error("rule '{0}' has no command")]
  EmptyCommand(String),

  #[error("rule '{0}' is already registered")]
  Duplicate(String),
}

/// A named rule variable with an optional default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
  pub name: String,
  pub default: Option<String>,
}

impl Variable {
  /// A variable every edge must supply.
  pub fn required(name: &str) -> Self {
    Self {
      name: name.to_string(),
      default: None,
    }
  }

  pub fn with_default(name: &str, default: &str) -> Self {
    Self {
      name: name.to_string(),
      default: Some(default.to_string()),
    }
  }
}

/// A Ninja generation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
  pub name: String,
  pub command: String,
  pub description: String,
  pub variables: Vec<Variable>,
}

impl Rule {
  pub fn new(name: &str, command: &str, description: &str) -> Self {
    Self {
      name: name.to_string(),
      command: command.to_string(),
      description: description.to_string(),
      variables: Vec::new(),
    }
  }

  pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
    self.variables = variables;
    self
  }

  /// Write the `rule` stanza, followed by a blank line.
  pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "rule {}", self.name)?;
    writeln!(out, "    command = {}", self.command)?;
    writeln!(out, "    description = {}", self.description)?;
    for variable in &self.variables {
      if let Some(default) = &variable.default {
        writeln!(out, "    {} = {}", variable.name, default)?;
      }
    }
    writeln!(out)
  }
}

/// Ordered, name-unique list of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
  rules: Vec<Rule>,
}

impl Default for RuleTable {
  fn default() -> Self {
    Self::builtin()
  }
}

impl RuleTable {
  /// A table with no rules at all.
  pub fn empty() -> Self {
    Self { rules: Vec::new() }
  }

  /// The rules every generated build file relies on.
  pub fn builtin() -> Self {
    let rules = vec![
      Rule::new(
        CXX,
        "clang++ -target $target $args -MD -MQ $out -MF $depfile -o $out -c $in",
        "Compiling $language object $out",
      )
      .with_variables(vec![
        Variable::required("out"),
        Variable::required("in"),
        Variable::required("target"),
        Variable::with_default("deps", "gcc"),
        Variable::required("args"),
        Variable::required("depfile"),
        Variable::required("language"),
      ]),
      Rule::new(MERGE_OBJECT, "$ld -r -o $out $in", "Linking static target $out")
        .with_variables(vec![Variable::required("out"), Variable::required("in")]),
      Rule::new(
        LINK_BINARY,
        "clang++ -target $target -o $out $in $link_args",
        "Linking binary target $out",
      )
      .with_variables(vec![
        Variable::required("out"),
        Variable::required("in"),
        Variable::required("target"),
        Variable::required("link_args"),
      ]),
      Rule::new(NAMESPACE_HEADER, "ln -sf $in $out", "Namespacing header $out")
        .with_variables(vec![Variable::required("out"), Variable::required("in")]),
      Rule::new(COMPDB, "ninja -t compdb > compile_commands.json", "Emitting compdb"),
    ];
    Self { rules }
  }

  /// Append a rule. Names must be unique.
  pub fn register(&mut self, rule: Rule) -> Result<(), RuleError> {
    if rule.name.is_empty() {
      return Err(RuleError::EmptyName);
    }
    if rule.command.is_empty() {
      return Err(RuleError::EmptyCommand(rule.name));
    }
    if self.get(&rule.name).is_some() {
      return Err(RuleError::Duplicate(rule.name));
    }
    self.rules.push(rule);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Rule> {
    self.rules.iter().find(|r| r.name == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Rule> {
    self.rules.iter()
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::CapacityError;
use crate::platform::TargetTriple;

use super::Language;

/// Handle to a target registered in a [`Registry`](super::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub(crate) usize);

impl TargetId {
  /// Position of the target in declaration order.
  pub fn index(&self) -> usize {
    self.0
  }
}

impl fmt::Display for TargetId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Errors raised while declaring targets.
#[derive(Debug, Error)]
pub enum TargetError {
  #[error("target name must not be empty")]
  EmptyName,

  #[error("target '{name}' has no declaring file")]
  EmptyFile { name: String },

  #[error("target name '{name}' is reserved")]
  ReservedName { name: String },

  #[error("target '{name}' declared in {second} was already declared in {first}")]
  DuplicateTarget { name: String, first: String, second: String },

  #[error("target '{target}' has an empty entry in its {what}")]
  EmptyEntry { target: String, what: &'static str },

  #[error("target '{target}' depends on {id}, which is not registered")]
  UnknownDependency { target: String, id: TargetId },

  #[error(transparent)]
  Capacity(#[from] CapacityError),
}

/// How a library is meant to be linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStyle {
  #[default]
  Static,
  Shared,
}

/// Arguments of a binary declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryArgs {
  pub srcs: Vec<String>,
  pub compile_flags: Vec<String>,
  pub linker_flags: Vec<String>,
  /// Defaults to the host triple.
  pub target_triple: Option<TargetTriple>,
  pub deps: Vec<TargetId>,
}

/// Arguments of a library declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryArgs {
  pub srcs: Vec<String>,
  pub exported_headers: Vec<String>,
  /// Defaults to the library name.
  pub header_namespace: Option<String>,
  pub compile_flags: Vec<String>,
  pub linker_flags: Vec<String>,
  /// Defaults to the host triple.
  pub target_triple: Option<TargetTriple>,
  pub link_style: LinkStyle,
  pub deps: Vec<TargetId>,
}

/// A resolved binary: defaults merged, triple chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binary {
  pub language: Language,
  pub srcs: Vec<String>,
  pub compile_flags: Vec<String>,
  pub linker_flags: Vec<String>,
  pub target_triple: TargetTriple,
  pub deps: Vec<TargetId>,
}

/// A resolved library: defaults merged, triple and namespace chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Library {
  pub language: Language,
  pub srcs: Vec<String>,
  pub exported_headers: Vec<String>,
  pub header_namespace: String,
  pub compile_flags: Vec<String>,
  pub linker_flags: Vec<String>,
  pub target_triple: TargetTriple,
  pub link_style: LinkStyle,
  pub deps: Vec<TargetId>,
}

/// Kind-specific payload of a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetKind {
  Binary(Binary),
  Library(Library),
  Group { members: Vec<TargetId> },
}

impl TargetKind {
  /// Targets this one depends on, in declaration order.
  pub fn deps(&self) -> &[TargetId] {
    match self {
      Self::Binary(binary) => &binary.deps,
      Self::Library(library) => &library.deps,
      Self::Group { members } => members,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Binary(_) => "binary",
      Self::Library(_) => "library",
      Self::Group { .. } => "group",
    }
  }
}

/// A named buildable unit. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
  /// Unique within a registry.
  pub name: String,
  /// File the target was declared in.
  pub file: String,
  /// Directory of `file`, `/`-separated, empty for a file at the project root.
  pub base_dir: String,
  #[serde(flatten)]
  pub kind: TargetKind,
}

impl Target {
  pub fn deps(&self) -> &[TargetId] {
    self.kind.deps()
  }

  pub fn as_binary(&self) -> Option<&Binary> {
    match &self.kind {
      TargetKind::Binary(binary) => Some(binary),
      _ => None,
    }
  }

  pub fn as_library(&self) -> Option<&Library> {
    match &self.kind {
      TargetKind::Library(library) => Some(library),
      _ => None,
    }
  }
}

//! Build directory setup and build file writing.

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts::NINJA_FILE;
use crate::ninja::{EmitError, EmitOptions, EmitSummary, emit_ninja};
use crate::target::{BuildGraph, TargetId};

/// Errors that can occur while generating a build directory.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("failed to create build directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },

  #[error("build directory {} must not leave the project root", path.display())]
  InvalidBuildDir { path: PathBuf },

  #[error(transparent)]
  Emit(#[from] EmitError),
}

/// Where to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
  /// Absolute directory of the root build file.
  pub project_root: PathBuf,
  /// Build directory, absolute or relative to `project_root`.
  pub build_dir: PathBuf,
}

/// Outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
  /// Path of the written Ninja file.
  pub path: PathBuf,
  pub summary: EmitSummary,
}

/// Path from `build_dir` back to `project_root`, as written in source edges.
///
/// A relative build directory yields one `..` per component. An absolute
/// one cannot be walked back, so the absolute project root is used.
pub fn source_prefix(project_root: &Path, build_dir: &Path) -> Result<String, GenerateError> {
  if build_dir.is_absolute() {
    return Ok(project_root.to_string_lossy().replace('\\', "/"));
  }

  let mut parts = Vec::new();
  for component in build_dir.components() {
    match component {
      Component::CurDir => {}
      Component::Normal(_) => parts.push(".."),
      _ => {
        return Err(GenerateError::InvalidBuildDir {
          path: build_dir.to_path_buf(),
        });
      }
    }
  }

  if parts.is_empty() {
    Ok(".".to_string())
  } else {
    Ok(parts.join("/"))
  }
}

/// Create the build directory and write the Ninja file for `root` into it.
///
/// The file is rendered in memory first, so a failed emission leaves any
/// previous build file untouched.
pub fn generate(graph: &BuildGraph, root: TargetId, options: &GenerateOptions) -> Result<Generated, GenerateError> {
  let prefix = source_prefix(&options.project_root, &options.build_dir)?;
  let build_dir = options.project_root.join(&options.build_dir);

  fs::create_dir_all(&build_dir).map_err(|source| GenerateError::CreateDir {
    path: build_dir.clone(),
    source,
  })?;

  let emit_options = EmitOptions {
    project_root: options.project_root.clone(),
    source_prefix: prefix,
  };
  let mut rendered = Vec::new();
  let summary = emit_ninja(&mut rendered, graph, root, &emit_options)?;

  let path = build_dir.join(NINJA_FILE);
  fs::write(&path, rendered).map_err(|source| GenerateError::Write {
    path: path.clone(),
    source,
  })?;

  info!(path = %path.display(), targets = summary.targets, "wrote build file");
  Ok(Generated { path, summary })
}

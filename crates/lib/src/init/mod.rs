//! Scaffold a new brick project.
//!
//! This module provides the core logic for the `brick init` command, which
//! writes:
//! - `build.lua` root build file with a library and a binary
//! - starter sources the build file refers to
//! - `.luarc.json` and `.brick/types/brick.d.lua` for LuaLS IDE integration

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::BUILD_FILE;

pub use templates::{BRICK_D_LUA, BUILD_LUA_TEMPLATE, LUARC_JSON_TEMPLATE, STARTER_SOURCES};

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },

  #[error("failed to canonicalize path {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: std::io::Error },
}

/// Options for initializing a project directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
  /// Directory to scaffold; created if missing.
  pub project_dir: PathBuf,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// The project directory (canonicalized)
  pub project_dir: PathBuf,
  pub build_lua: PathBuf,
  pub luarc_json: PathBuf,
  pub types_file: PathBuf,
  /// Starter sources that were written. Existing files are left alone.
  pub sources: Vec<PathBuf>,
}

fn create_dir(path: &Path) -> Result<(), InitError> {
  fs::create_dir_all(path).map_err(|source| InitError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

fn write_file(path: &Path, content: &str) -> Result<(), InitError> {
  if let Some(parent) = path.parent() {
    create_dir(parent)?;
  }
  fs::write(path, content).map_err(|source| InitError::WriteFile {
    path: path.to_path_buf(),
    source,
  })
}

/// Initialize a new project directory.
///
/// # Errors
///
/// Returns an error if:
/// - `build.lua` or `.luarc.json` already exist
/// - Directory creation fails
/// - File writing fails
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  create_dir(&options.project_dir)?;

  let project_dir = dunce::canonicalize(&options.project_dir).map_err(|source| InitError::Canonicalize {
    path: options.project_dir.clone(),
    source,
  })?;

  let build_lua = project_dir.join(BUILD_FILE);
  let luarc_json = project_dir.join(".luarc.json");

  for path in [&build_lua, &luarc_json] {
    if path.exists() {
      return Err(InitError::PathExists { path: path.clone() });
    }
  }

  let types_dir = project_dir.join(".brick").join("types");
  let types_file = types_dir.join("brick.d.lua");

  write_file(&build_lua, BUILD_LUA_TEMPLATE)?;
  write_file(&types_file, BRICK_D_LUA)?;

  let types_path = types_dir.to_string_lossy().replace('\\', "/");
  write_file(&luarc_json, &LUARC_JSON_TEMPLATE.replace("{types_path}", &types_path))?;

  let mut sources = Vec::new();
  for (relative, content) in STARTER_SOURCES {
    let path = project_dir.join(relative);
    if path.exists() {
      debug!(path = %path.display(), "keeping existing source");
      continue;
    }
    write_file(&path, content)?;
    sources.push(path);
  }

  Ok(InitResult {
    project_dir,
    build_lua,
    luarc_json,
    types_file,
    sources,
  })
}

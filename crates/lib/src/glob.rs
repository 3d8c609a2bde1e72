//! Source file discovery.
//!
//! Patterns are resolved against the directory of the file that declares them,
//! and matches are returned relative to that directory, which is the form
//! target source lists expect.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::limits::{CapacityError, Limits};
use crate::target::base_dir_of;

/// Errors that can occur while expanding a glob.
#[derive(Debug, Error)]
pub enum GlobError {
  #[error("invalid glob pattern '{pattern}': {source}")]
  Pattern {
    pattern: String,
    source: ::glob::PatternError,
  },

  #[error("failed to read {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },

  #[error(transparent)]
  Capacity(#[from] CapacityError),
}

/// Expand `pattern` relative to the directory of `declaring_file`.
///
/// `declaring_file` is relative to `project_root`. No match is not an error:
/// a warning is logged and the result is empty.
pub fn glob(
  pattern: &str,
  declaring_file: &str,
  project_root: &Path,
  limits: &Limits,
) -> Result<Vec<String>, GlobError> {
  let dir = project_root.join(base_dir_of(declaring_file));
  let full = format!(
    "{}/{}",
    ::glob::Pattern::escape(&dir.to_string_lossy()),
    pattern
  );

  let entries = ::glob::glob(&full).map_err(|source| GlobError::Pattern {
    pattern: pattern.to_string(),
    source,
  })?;

  let mut matches = Vec::new();
  for entry in entries {
    let path = entry.map_err(|e| GlobError::Io {
      path: e.path().to_path_buf(),
      source: e.into_error(),
    })?;
    let relative = path.strip_prefix(&dir).unwrap_or(&path);
    matches.push(relative.to_string_lossy().replace('\\', "/"));
    limits.check("glob matches", pattern, matches.len())?;
  }

  matches.sort();

  if matches.is_empty() {
    warn!(pattern, dir = %dir.display(), "could not match glob");
  } else {
    debug!(pattern, count = matches.len(), "expanded glob");
  }

  Ok(matches)
}

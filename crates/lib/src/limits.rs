//! Safety limits on bounded lists.
//!
//! Every list a declaration carries is capped. Exceeding a cap is a
//! [`CapacityError`], which aborts the generation run instead of silently
//! truncating the list.

use thiserror::Error;

use crate::consts::MAX_ENTRIES;

/// A bounded list grew past its configured limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("too many {what} for '{owner}': {count} exceeds the limit of {limit}")]
pub struct CapacityError {
  /// What was being counted (e.g. "dependencies").
  pub what: &'static str,
  /// The target or pattern that owns the list.
  pub owner: String,
  /// The number of entries that were requested.
  pub count: usize,
  /// The configured limit.
  pub limit: usize,
}

/// Configurable ceilings for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
  /// Maximum number of entries in any single list.
  pub max_entries: usize,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      max_entries: MAX_ENTRIES,
    }
  }
}

impl Limits {
  /// Create limits with a custom ceiling.
  pub fn new(max_entries: usize) -> Self {
    Self { max_entries }
  }

  /// Check that `count` entries of `what` owned by `owner` fit.
  pub fn check(&self, what: &'static str, owner: &str, count: usize) -> Result<(), CapacityError> {
    if count > self.max_entries {
      return Err(CapacityError {
        what,
        owner: owner.to_string(),
        count,
        limit: self.max_entries,
      });
    }
    Ok(())
  }
}

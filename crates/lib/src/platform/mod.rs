//! Target triples.
//!
//! A [`TargetTriple`] names the platform a target is compiled for and namespaces
//! every output path in the generated build file. The host triple is fixed when
//! this crate is compiled; building on an unsupported host is a compile error,
//! never a wrong value at generation time.

pub mod abi;
pub mod arch;
pub mod os;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::UNKNOWN;

pub use abi::Abi;
pub use arch::Arch;
pub use os::Os;

/// Errors produced while parsing a triple or one of its components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTripleError {
  #[error("unknown architecture: {0}")]
  UnknownArch(String),

  #[error("unknown abi: {0}")]
  UnknownAbi(String),

  #[error("unknown operating system: {0}")]
  UnknownOs(String),

  #[error("malformed target triple '{0}': expected <arch>-<abi>-<os>")]
  Malformed(String),
}

/// Platform identifier combining architecture, ABI and OS.
///
/// Any component may be absent; absent components render as `unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetTriple {
  pub arch: Option<Arch>,
  pub abi: Option<Abi>,
  pub os: Option<Os>,
}

impl TargetTriple {
  pub fn new(arch: Option<Arch>, abi: Option<Abi>, os: Option<Os>) -> Self {
    Self { arch, abi, os }
  }

  /// The triple of the machine running the generator.
  pub fn host() -> Self {
    Self {
      arch: Some(Arch::host()),
      abi: Some(Abi::host()),
      os: Some(Os::host()),
    }
  }

  /// WebAssembly: architecture only.
  pub fn wasm() -> Self {
    Self {
      arch: Some(Arch::Wasm32),
      abi: None,
      os: None,
    }
  }

  /// Returns the canonical `<arch>-<abi>-<os>` string.
  pub fn triple(&self) -> String {
    format!(
      "{}-{}-{}",
      self.arch.map_or(UNKNOWN, |a| a.as_str()),
      self.abi.map_or(UNKNOWN, |a| a.as_str()),
      self.os.map_or(UNKNOWN, |o| o.as_str()),
    )
  }
}

impl fmt::Display for TargetTriple {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

fn component<T: FromStr<Err = ParseTripleError>>(part: Option<&str>) -> Result<Option<T>, ParseTripleError> {
  match part {
    None | Some(UNKNOWN) => Ok(None),
    Some(s) => s.parse().map(Some),
  }
}

impl FromStr for TargetTriple {
  type Err = ParseTripleError;

  /// Parses `host`, `wasm`, or one to three dash-separated components.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "host" => return Ok(Self::host()),
      "wasm" => return Ok(Self::wasm()),
      "" => return Err(ParseTripleError::Malformed(s.to_string())),
      _ => {}
    }

    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
      return Err(ParseTripleError::Malformed(s.to_string()));
    }

    Ok(Self {
      arch: component(parts.first().copied())?,
      abi: component(parts.get(1).copied())?,
      os: component(parts.get(2).copied())?,
    })
  }
}

/// Returns the host triple string (e.g. "x86_64-gnu-linux").
pub fn host_triple() -> String {
  TargetTriple::host().triple()
}

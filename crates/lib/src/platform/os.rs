use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseTripleError;

/// Operating system component of a target triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Os {
  Linux,
  #[serde(rename = "macos")]
  MacOs,
  Windows,
}

#[cfg(target_os = "linux")]
const HOST: Os = Os::Linux;
#[cfg(target_os = "macos")]
const HOST: Os = Os::MacOs;
#[cfg(target_os = "windows")]
const HOST: Os = Os::Windows;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
compile_error!("unsupported host operating system: brick supports linux, macos and windows hosts");

impl Os {
  /// The operating system this crate was compiled for.
  pub const fn host() -> Self {
    HOST
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "macos",
      Self::Windows => "windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = ParseTripleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "linux" => Ok(Self::Linux),
      "macos" | "darwin" => Ok(Self::MacOs),
      "windows" => Ok(Self::Windows),
      _ => Err(ParseTripleError::UnknownOs(s.to_string())),
    }
  }
}

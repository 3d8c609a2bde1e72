use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseTripleError;

/// ABI component of a target triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Abi {
  Gnu,
  Windows,
  /// Apple targets carry no ABI suffix and render it as `none`.
  #[serde(rename = "none")]
  Bare,
}

#[cfg(target_os = "linux")]
const HOST: Abi = Abi::Gnu;
#[cfg(target_os = "macos")]
const HOST: Abi = Abi::Bare;
#[cfg(target_os = "windows")]
const HOST: Abi = Abi::Windows;

impl Abi {
  /// The ABI of the operating system this crate was compiled for.
  pub const fn host() -> Self {
    HOST
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Gnu => "gnu",
      Self::Windows => "windows",
      Self::Bare => "none",
    }
  }
}

impl fmt::Display for Abi {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Abi {
  type Err = ParseTripleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "gnu" => Ok(Self::Gnu),
      "windows" | "msvc" => Ok(Self::Windows),
      "none" => Ok(Self::Bare),
      _ => Err(ParseTripleError::UnknownAbi(s.to_string())),
    }
  }
}

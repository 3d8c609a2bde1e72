use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseTripleError;

/// CPU architecture component of a target triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
  X86_64,
  Aarch64,
  I386,
  Wasm32,
}

#[cfg(target_arch = "x86_64")]
const HOST: Arch = Arch::X86_64;
#[cfg(target_arch = "aarch64")]
const HOST: Arch = Arch::Aarch64;
#[cfg(target_arch = "x86")]
const HOST: Arch = Arch::I386;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "x86")))]
compile_error!("unsupported host architecture: brick supports x86_64, aarch64 and i386 hosts");

impl Arch {
  /// The architecture this crate was compiled for.
  pub const fn host() -> Self {
    HOST
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::I386 => "i386",
      Self::Wasm32 => "wasm32",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = ParseTripleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "x86_64" => Ok(Self::X86_64),
      "aarch64" | "arm64" => Ok(Self::Aarch64),
      "i386" | "x86" => Ok(Self::I386),
      "wasm32" => Ok(Self::Wasm32),
      _ => Err(ParseTripleError::UnknownArch(s.to_string())),
    }
  }
}

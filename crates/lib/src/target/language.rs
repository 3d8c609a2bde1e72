use std::fmt;

use serde::{Deserialize, Serialize};

/// Source languages with a default compile flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  Cpp,
  C,
  ObjC,
  ObjCpp,
}

const COMMON_FLAGS: [&str; 3] = ["-Wall", "-Wextra", "-fcolor-diagnostics"];

/// Suffix table, checked in order.
const EXTENSIONS: [(&str, Language); 4] = [
  (".cpp", Language::Cpp),
  (".c", Language::C),
  (".mm", Language::ObjCpp),
  (".m", Language::ObjC),
];

impl Language {
  /// Infer the language of a source file from its suffix.
  ///
  /// Unknown suffixes yield `None`; they are not an error.
  pub fn from_filename(name: &str) -> Option<Self> {
    EXTENSIONS
      .iter()
      .find(|(ext, _)| name.len() > ext.len() && name.ends_with(ext))
      .map(|(_, lang)| *lang)
  }

  /// Human readable name used in the compile edge's `language` variable.
  pub fn display_name(&self) -> &'static str {
    match self {
      Self::Cpp => "C++",
      Self::C => "C",
      Self::ObjC => "Objective-C",
      Self::ObjCpp => "Objective-C++",
    }
  }

  /// Compile flags placed before any flags given by a declaration.
  pub fn default_flags(&self) -> Vec<String> {
    let extra: &[&str] = match self {
      Self::Cpp => &["-std=c++17"],
      Self::C => &["-std=c11", "-xc"],
      Self::ObjC => &["-std=c11", "-xc", "-xobjc"],
      Self::ObjCpp => &["-std=c++17", "-xobjc++"],
    };
    COMMON_FLAGS.iter().chain(extra).map(|f| f.to_string()).collect()
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.display_name())
  }
}

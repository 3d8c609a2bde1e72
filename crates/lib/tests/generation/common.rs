//! Shared test helpers for generation tests.

use std::fs;
use std::path::{Path, PathBuf};

use brick_lib::ninja::{EmitOptions, emit_ninja};
use brick_lib::target::{BuildGraph, TargetId};
use tempfile::TempDir;

/// Path to a fixture project directory.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// Copy a fixture project into a fresh temp directory.
pub fn copy_fixture(name: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  copy_dir(&fixture_path(name), temp.path());
  temp
}

fn copy_dir(from: &Path, to: &Path) {
  fs::create_dir_all(to).unwrap();
  for entry in fs::read_dir(from).unwrap() {
    let entry = entry.unwrap();
    let target = to.join(entry.file_name());
    if entry.file_type().unwrap().is_dir() {
      copy_dir(&entry.path(), &target);
    } else {
      fs::copy(entry.path(), &target).unwrap();
    }
  }
}

/// Emit into a string with a fixed project root.
pub fn emit_to_string(graph: &BuildGraph, root: TargetId) -> String {
  let options = EmitOptions {
    project_root: PathBuf::from("/proj"),
    source_prefix: "..".to_string(),
  };
  let mut out = Vec::new();
  emit_ninja(&mut out, graph, root, &options).unwrap();
  String::from_utf8(out).unwrap()
}

/// The stanza starting with `first_line`, up to the next blank line.
pub fn stanza<'a>(ninja: &'a str, first_line: &str) -> &'a str {
  let start = ninja
    .find(&format!("{first_line}\n"))
    .unwrap_or_else(|| panic!("no stanza starting with {first_line:?} in:\n{ninja}"));
  let rest = &ninja[start..];
  let end = rest.find("\n\n").map_or(rest.len(), |i| i + 1);
  &rest[..end]
}

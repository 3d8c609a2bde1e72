//! Implementation of the `brick gen` command.
//!
//! Evaluates the root build file and writes `build.ninja` into the build
//! directory.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use brick_lib::eval::evaluate_config;
use brick_lib::generate::{GenerateOptions, generate};

use super::resolve_build_file;
use crate::output::{format_duration, print_info, print_stat, print_success};

pub fn cmd_gen(file: &Path, build_dir: &Path, root: Option<&str>) -> Result<()> {
  let start = Instant::now();
  let file = resolve_build_file(file);

  let evaluation =
    evaluate_config(&file).with_context(|| format!("Failed to evaluate build file: {}", file.display()))?;
  let root = evaluation.select_root(root)?;

  let options = GenerateOptions {
    project_root: evaluation.project_root.clone(),
    build_dir: build_dir.to_path_buf(),
  };
  let generated = generate(&evaluation.graph, root, &options).context("Failed to generate build file")?;

  print_success(&format!(
    "Wrote {} in {}",
    generated.path.display(),
    format_duration(start.elapsed())
  ));
  print_stat("Root", &evaluation.graph.target(root).name);
  print_stat("Targets", &generated.summary.targets.to_string());
  print_stat("Edges", &generated.summary.edges.to_string());

  let ninja_dir = generated.path.parent().unwrap_or(Path::new("."));
  print_info(&format!("Run: ninja -C {}", ninja_dir.display()));

  Ok(())
}

//! Implementation of the `brick targets` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use brick_lib::eval::evaluate_config;
use brick_lib::target::TargetKind;

use super::resolve_build_file;
use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct TargetSummary<'a> {
  name: &'a str,
  kind: &'static str,
  file: &'a str,
  /// Output triple; absent for groups.
  #[serde(skip_serializing_if = "Option::is_none")]
  triple: Option<String>,
  deps: Vec<&'a str>,
}

pub fn cmd_targets(file: &Path, root: Option<&str>, format: OutputFormat) -> Result<()> {
  let file = resolve_build_file(file);
  let evaluation =
    evaluate_config(&file).with_context(|| format!("Failed to evaluate build file: {}", file.display()))?;
  let root = evaluation.select_root(root)?;
  let graph = &evaluation.graph;

  let order = graph.flatten(root).context("Failed to flatten targets")?;
  let summaries: Vec<TargetSummary> = order
    .iter()
    .map(|&id| {
      let target = graph.target(id);
      let triple = match &target.kind {
        TargetKind::Binary(binary) => Some(binary.target_triple.triple()),
        TargetKind::Library(library) => Some(library.target_triple.triple()),
        TargetKind::Group { .. } => None,
      };
      TargetSummary {
        name: &target.name,
        kind: target.kind.as_str(),
        file: &target.file,
        triple,
        deps: target.deps().iter().map(|&d| graph.target(d).name.as_str()).collect(),
      }
    })
    .collect();

  if format.is_json() {
    return print_json(&summaries);
  }

  for summary in &summaries {
    let location = if summary.file.is_empty() {
      "(implicit)".to_string()
    } else {
      summary.file.to_string()
    };
    println!(
      "{:<24} {:<8} {}",
      summary.name,
      summary.kind.if_supports_color(Stream::Stdout, |s| s.cyan()),
      location.if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }

  Ok(())
}

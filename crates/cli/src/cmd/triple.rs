use anyhow::{Context, Result};
use serde::Serialize;

use brick_lib::platform::TargetTriple;

use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct TripleInfo {
  triple: String,
  #[serde(flatten)]
  parts: TargetTriple,
}

pub fn cmd_triple(target: &str, format: OutputFormat) -> Result<()> {
  let parts: TargetTriple = target
    .parse()
    .with_context(|| format!("Invalid target triple: {}", target))?;

  if format.is_json() {
    return print_json(&TripleInfo {
      triple: parts.triple(),
      parts,
    });
  }

  println!("{}", parts);
  Ok(())
}

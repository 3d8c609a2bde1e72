//! Implementation of the `brick init` command.
//!
//! Scaffolds a project directory with a starter `build.lua`, the sources it
//! refers to and LuaLS type definitions.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use brick_lib::init::{InitOptions, init};

use crate::output::symbols;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if `build.lua` or `.luarc.json` already exist, or if
/// there are permission issues.
pub fn cmd_init(path: &Path) -> Result<()> {
  let options = InitOptions {
    project_dir: path.to_path_buf(),
  };

  let result = init(&options).context("Failed to initialize project")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized brick project!".green().bold()
  );
  println!();
  println!(
    "  {} Project directory: {}",
    symbols::INFO.cyan(),
    result.project_dir.display()
  );
  println!(
    "  {} Build file:        {}",
    symbols::INFO.cyan(),
    result.build_lua.display()
  );
  println!(
    "  {} LuaLS config:      {}",
    symbols::INFO.cyan(),
    result.luarc_json.display()
  );
  println!(
    "  {} Type definitions:  {}",
    symbols::INFO.cyan(),
    result.types_file.display()
  );
  for source in &result.sources {
    println!("  {} Source:            {}", symbols::PLUS.green(), source.display());
  }
  println!();
  println!("{}", "Next steps:".bold());
  println!(
    "  1. Edit {} to declare your targets",
    result.build_lua.display().to_string().cyan()
  );
  println!(
    "  2. Run: {}",
    format!("brick gen {}", result.project_dir.display()).cyan()
  );

  Ok(())
}

mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brick_lib::consts::{BUILD_FILE, DEFAULT_BUILD_DIR};

use crate::output::{OutputFormat, print_error};

/// brick - Lua-declared C and C++ builds, generated as Ninja files
#[derive(Parser)]
#[command(name = "brick")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (overridden by RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate a build file and write the Ninja file
  Gen {
    /// Root build file, or a directory containing build.lua
    #[arg(default_value = BUILD_FILE)]
    file: PathBuf,

    /// Build directory, relative to the build file's directory
    #[arg(short = 'o', long, default_value = DEFAULT_BUILD_DIR)]
    build_dir: PathBuf,

    /// Generate for this target instead of the one the build file returns
    #[arg(long)]
    root: Option<String>,
  },

  /// List the targets reachable from the root, in build order
  Targets {
    /// Root build file, or a directory containing build.lua
    #[arg(default_value = BUILD_FILE)]
    file: PathBuf,

    /// List from this target instead of the one the build file returns
    #[arg(long)]
    root: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// Print a target triple
  Triple {
    /// `host`, `wasm` or `<arch>-<abi>-<os>`
    #[arg(long, default_value = "host")]
    target: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// Scaffold a new project
  Init {
    /// Project directory
    #[arg(default_value = ".")]
    path: PathBuf,
  },
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Gen { file, build_dir, root } => cmd::cmd_gen(&file, &build_dir, root.as_deref()),
    Commands::Targets { file, root, format } => cmd::cmd_targets(&file, root.as_deref(), format),
    Commands::Triple { target, format } => cmd::cmd_triple(&target, format),
    Commands::Init { path } => cmd::cmd_init(&path),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

mod generate;
mod init;
mod targets;
mod triple;

use std::path::{Path, PathBuf};

use tracing::debug;

use brick_lib::consts::BUILD_FILE;

pub use generate::cmd_gen;
pub use init::cmd_init;
pub use targets::cmd_targets;
pub use triple::cmd_triple;

/// Accept either a build file or the directory that holds one.
fn resolve_build_file(path: &Path) -> PathBuf {
  let file = if path.is_dir() {
    path.join(BUILD_FILE)
  } else {
    path.to_path_buf()
  };
  debug!(file = %file.display(), "resolved build file");
  file
}

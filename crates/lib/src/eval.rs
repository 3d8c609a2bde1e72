//! Build file evaluation.
//!
//! [`evaluate_config`] runs a root build file and returns the finished
//! [`BuildGraph`] together with the target generation should start from.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, info};

use crate::limits::Limits;
use crate::lua::targets::{is_target_ref, parse_target_ref};
use crate::lua::{loaders, runtime};
use crate::target::{BuildGraph, Registry, TargetId};

/// Errors that can occur during build file evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// Lua evaluation error, including declaration errors raised from Lua.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  #[error("cannot resolve build file {}: {source}", path.display())]
  NotFound { path: PathBuf, source: std::io::Error },

  #[error("build file must return a target reference or nothing, got {0}")]
  InvalidReturn(&'static str),

  #[error("unknown root target '{0}'")]
  UnknownRoot(String),
}

/// The result of evaluating a root build file.
#[derive(Debug)]
pub struct Evaluation {
  pub graph: BuildGraph,
  /// The target returned by the build file, or the `all` aggregate.
  pub root: TargetId,
  /// Directory of the root build file; declaring files are relative to it.
  pub project_root: PathBuf,
}

impl Evaluation {
  /// Pick the root by name, falling back to the one the build file chose.
  pub fn select_root(&self, name: Option<&str>) -> Result<TargetId, EvalError> {
    match name {
      None => Ok(self.root),
      Some(name) => self
        .graph
        .lookup(name)
        .ok_or_else(|| EvalError::UnknownRoot(name.to_string())),
    }
  }
}

/// Evaluate a root build file with the default limits.
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use brick_lib::eval::evaluate_config;
///
/// let evaluation = evaluate_config(Path::new("build.lua"))?;
/// let order = evaluation.graph.flatten(evaluation.root)?;
/// println!("{} targets", order.len());
/// ```
pub fn evaluate_config(path: &Path) -> Result<Evaluation, EvalError> {
  evaluate_config_with_limits(path, Limits::default())
}

/// Evaluate a root build file with custom limits.
pub fn evaluate_config_with_limits(path: &Path, limits: Limits) -> Result<Evaluation, EvalError> {
  let path = dunce::canonicalize(path).map_err(|source| EvalError::NotFound {
    path: path.to_path_buf(),
    source,
  })?;
  let project_root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
  debug!(path = %path.display(), root = %project_root.display(), "evaluating build file");

  let registry = Rc::new(RefCell::new(Registry::with_limits(limits)));

  // The Lua state holds clones of the registry; drop it before unwrapping.
  let returned = {
    let lua = runtime::create_runtime(&project_root, registry.clone())?;
    let value = loaders::load_file(&lua, &path)?;
    match value {
      LuaValue::Nil => None,
      ref v if is_target_ref(v) => Some(parse_target_ref(v)?),
      other => return Err(EvalError::InvalidReturn(other.type_name())),
    }
  };

  let registry = Rc::try_unwrap(registry)
    .map_err(|_| LuaError::external("registry is still referenced after evaluation"))?
    .into_inner();

  if let Some(id) = returned
    && registry.get(id).is_none()
  {
    return Err(LuaError::external(format!("build file returned unregistered target {}", id)).into());
  }

  let graph = registry.finish();
  let root = returned.unwrap_or_else(|| graph.all());
  info!(
    targets = graph.declared().count(),
    root = %graph.target(root).name,
    "evaluated build file"
  );

  Ok(Evaluation {
    graph,
    root,
    project_root,
  })
}

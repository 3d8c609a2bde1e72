//! Build file loading with declaring-file tracking.
//!
//! Every target records the file it was declared in, relative to the project
//! root. The loaders here keep that file in the Lua registry while a chunk
//! runs, so declarations made from a nested `dofile` or `require` see the
//! nested file rather than the root `build.lua`.
//!
//! `package.searchers[2]` is replaced so `require` keeps its caching and
//! preload behavior while loading Lua files through [`load_file`]. `dofile`
//! is replaced outright and resolves relative paths against the directory of
//! the calling file.
//!
//! Each loaded chunk also sees two locals in its environment: `__dir`, the
//! absolute directory of the file, and `__file`, the declaring file.

use std::fs;
use std::path::{Path, PathBuf};

use mlua::prelude::*;

const CURRENT_DIR_KEY: &str = "__brick_current_dir";
const CURRENT_FILE_KEY: &str = "__brick_current_file";
const PROJECT_ROOT_KEY: &str = "__brick_project_root";

/// Fix the directory declaring files are made relative to.
pub fn set_project_root(lua: &Lua, root: &Path) -> LuaResult<()> {
  let canonical = dunce::canonicalize(root)
    .map_err(|e| LuaError::external(format!("cannot resolve '{}': {}", root.display(), e)))?;
  lua.set_named_registry_value(PROJECT_ROOT_KEY, canonical.to_string_lossy().into_owned())
}

/// The project root, if one has been set.
pub fn project_root(lua: &Lua) -> LuaResult<Option<PathBuf>> {
  Ok(lua.named_registry_value::<Option<String>>(PROJECT_ROOT_KEY)?.map(PathBuf::from))
}

/// The file currently being executed, relative to the project root.
///
/// `None` outside of [`load_file`].
pub fn current_file(lua: &Lua) -> LuaResult<Option<String>> {
  lua.named_registry_value(CURRENT_FILE_KEY)
}

fn current_dir(lua: &Lua) -> LuaResult<Option<String>> {
  lua.named_registry_value(CURRENT_DIR_KEY)
}

/// Path of `canonical` relative to the project root, `/`-separated.
///
/// The first file loaded without a root fixes the root to its own directory.
fn declaring_file(lua: &Lua, canonical: &Path, dir: &Path) -> LuaResult<String> {
  let root = match project_root(lua)? {
    Some(root) => root,
    None => {
      set_project_root(lua, dir)?;
      dir.to_path_buf()
    }
  };

  let relative = canonical.strip_prefix(&root).map_err(|_| {
    LuaError::external(format!(
      "'{}' is outside the project root {}",
      canonical.display(),
      root.display()
    ))
  })?;
  Ok(relative.to_string_lossy().replace('\\', "/"))
}

/// Execute a Lua file as the current declaring file.
///
/// The previous declaring file is restored afterwards, including when the
/// chunk fails.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = dunce::canonicalize(path)
    .map_err(|e| LuaError::external(format!("cannot resolve '{}': {}", path.display(), e)))?;

  let content = fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let dir = canonical_path.parent().unwrap_or(Path::new(".")).to_path_buf();
  let file = declaring_file(lua, &canonical_path, &dir)?;
  let dir = dir.to_string_lossy().into_owned();

  let prev_dir = current_dir(lua)?;
  let prev_file = current_file(lua)?;
  lua.set_named_registry_value(CURRENT_DIR_KEY, dir.as_str())?;
  lua.set_named_registry_value(CURRENT_FILE_KEY, file.as_str())?;

  let env = lua.create_table()?;
  env.set("__dir", dir)?;
  env.set("__file", file)?;

  let mt = lua.create_table()?;
  mt.set("__index", lua.globals())?;
  mt.set("__newindex", lua.globals())?;
  env.set_metatable(Some(mt))?;

  let result = lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .set_environment(env)
    .eval::<LuaValue>();

  // Cleanup errors must not mask the chunk's own error.
  let _ = lua.set_named_registry_value(CURRENT_DIR_KEY, prev_dir);
  let _ = lua.set_named_registry_value(CURRENT_FILE_KEY, prev_file);

  result
}

/// Resolve `path_str` against the directory of the calling file.
fn resolve_path(lua: &Lua, path_str: &str) -> LuaResult<PathBuf> {
  let path = Path::new(path_str);
  if path.is_absolute() {
    return Ok(path.to_path_buf());
  }

  match current_dir(lua)? {
    Some(dir) => Ok(Path::new(&dir).join(path)),
    None => Ok(path.to_path_buf()),
  }
}

fn create_lua_searcher(lua: &Lua) -> LuaResult<LuaFunction> {
  lua.create_function(|lua, modname: String| {
    let package: LuaTable = lua.globals().get("package")?;
    let path: String = package.get("path")?;
    let searchpath: LuaFunction = package.get("searchpath")?;
    let found: LuaMultiValue = searchpath.call((modname.as_str(), path))?;

    match found.into_iter().next() {
      Some(LuaValue::String(filepath)) => {
        let filepath = filepath.to_str()?.to_string();
        let target = PathBuf::from(&filepath);
        let loader = lua.create_function(move |lua, _: LuaMultiValue| load_file(lua, &target))?;
        Ok((LuaValue::Function(loader), filepath))
      }
      _ => Ok((LuaValue::Nil, format!("\n\tno build file for module '{}'", modname))),
    }
  })
}

fn create_dofile(lua: &Lua) -> LuaResult<LuaFunction> {
  lua.create_function(|lua, path: Option<String>| match path {
    Some(path) => {
      let resolved = resolve_path(lua, &path)?;
      load_file(lua, &resolved)
    }
    None => Err(LuaError::external("dofile() without a path is not supported")),
  })
}

/// Replace `package.searchers[2]` and `dofile` with the tracking loaders.
pub fn install_loaders(lua: &Lua) -> LuaResult<()> {
  let package: LuaTable = lua.globals().get("package")?;
  let searchers: LuaTable = package.get("searchers")?;
  searchers.set(2, create_lua_searcher(lua)?)?;

  lua.globals().set("dofile", create_dofile(lua)?)?;
  // Loading a chunk without running it would escape declaring-file tracking.
  lua.globals().set("loadfile", LuaValue::Nil)?;

  Ok(())
}

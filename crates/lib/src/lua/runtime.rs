use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;

use crate::lua::{globals, loaders};
use crate::target::Registry;

/// Create a Lua runtime for one generation run.
///
/// `require` searches `<project_root>/?.lua` and `<project_root>/?/init.lua`
/// ahead of the default path, and declarations are recorded into `registry`.
pub fn create_runtime(project_root: &Path, registry: Rc<RefCell<Registry>>) -> LuaResult<Lua> {
  let lua = Lua::new();

  let root = project_root.to_string_lossy();
  let package: LuaTable = lua.globals().get("package")?;
  let package_path: String = package.get("path")?;
  package.set("path", format!("{root}/?.lua;{root}/?/init.lua;{package_path}"))?;

  loaders::set_project_root(&lua, project_root)?;
  loaders::install_loaders(&lua)?;
  globals::register_globals(&lua, registry)?;

  Ok(lua)
}

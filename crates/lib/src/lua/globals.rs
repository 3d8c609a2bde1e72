//! The `brick` global table.
//!
//! Registers:
//! - `brick.platform` - Host triple string (e.g. "x86_64-gnu-linux")
//! - `brick.cpp_binary(name, args)` / `brick.c_binary(name, args)`
//! - `brick.cpp_library`, `brick.c_library`, `brick.objc_library`,
//!   `brick.objcpp_library` - `(name, args)`
//! - `brick.group(name, members)` - Named set of targets
//! - `brick.glob(pattern)` - Source files next to the calling build file
//! - `brick.triple.host()`, `brick.triple.wasm()`, `brick.triple.parse(s)`
//! - `brick.rule{ name, command, description, variables }` - Custom rule

use std::cell::RefCell;
use std::rc::Rc;

use mlua::prelude::*;

use super::loaders;
use super::targets::{parse_binary_args, parse_library_args, parse_target_refs, target_ref};
use crate::glob::glob;
use crate::ninja::{Rule, Variable};
use crate::platform::{TargetTriple, host_triple};
use crate::target::{Language, Registry, TargetError, TargetId};

/// The declaring file of a call, or an error outside of a build file.
fn declaring_file(lua: &Lua, function: &str) -> LuaResult<String> {
  loaders::current_file(lua)?
    .ok_or_else(|| LuaError::external(format!("brick.{} must be called from a build file", function)))
}

/// Turn a registration result into the reference table handed back to Lua.
fn registered(lua: &Lua, registry: &Registry, result: Result<TargetId, TargetError>) -> LuaResult<LuaTable> {
  let id = result.map_err(LuaError::external)?;
  let target = registry
    .get(id)
    .ok_or_else(|| LuaError::external(format!("target {} vanished after registration", id)))?;
  target_ref(lua, id, target)
}

fn register_binary(
  lua: &Lua,
  brick: &LuaTable,
  function: &'static str,
  language: Language,
  registry: Rc<RefCell<Registry>>,
) -> LuaResult<()> {
  let declare = lua.create_function(move |lua, (name, args): (String, Option<LuaTable>)| {
    let file = declaring_file(lua, function)?;
    let args = parse_binary_args(args)?;
    let mut registry = registry.borrow_mut();
    let result = registry.binary_at(&name, &file, language, args);
    registered(lua, &registry, result)
  })?;
  brick.set(function, declare)
}

fn register_library(
  lua: &Lua,
  brick: &LuaTable,
  function: &'static str,
  language: Language,
  registry: Rc<RefCell<Registry>>,
) -> LuaResult<()> {
  let declare = lua.create_function(move |lua, (name, args): (String, Option<LuaTable>)| {
    let file = declaring_file(lua, function)?;
    let args = parse_library_args(args)?;
    let mut registry = registry.borrow_mut();
    let result = registry.library_at(&name, &file, language, args);
    registered(lua, &registry, result)
  })?;
  brick.set(function, declare)
}

fn create_triple_table(lua: &Lua) -> LuaResult<LuaTable> {
  let triple = lua.create_table()?;
  triple.set("host", lua.create_function(|_, ()| Ok(host_triple()))?)?;
  triple.set("wasm", lua.create_function(|_, ()| Ok(TargetTriple::wasm().triple()))?)?;
  triple.set(
    "parse",
    lua.create_function(|_, s: String| {
      s.parse::<TargetTriple>()
        .map(|t| t.triple())
        .map_err(LuaError::external)
    })?,
  )?;
  Ok(triple)
}

/// Parse `brick.rule{}` arguments.
///
/// `variables` maps a variable name to its default, or to `true` for a
/// variable every edge must supply.
fn parse_rule(spec: &LuaTable) -> LuaResult<Rule> {
  let name: String = spec
    .get("name")
    .map_err(|_| LuaError::external("rule spec requires 'name' field"))?;
  let command: String = spec
    .get("command")
    .map_err(|_| LuaError::external("rule spec requires 'command' field"))?;
  let description: String = spec.get::<Option<String>>("description")?.unwrap_or_else(|| command.clone());

  let mut variables = Vec::new();
  if let Some(table) = spec.get::<Option<LuaTable>>("variables")? {
    for pair in table.pairs::<String, LuaValue>() {
      let (var, value) = pair?;
      match value {
        LuaValue::Boolean(true) => variables.push(Variable::required(&var)),
        LuaValue::String(s) => variables.push(Variable::with_default(&var, &s.to_str()?)),
        other => {
          return Err(LuaError::external(format!(
            "rule variable '{}' must be a string default or true, got {}",
            var,
            other.type_name()
          )));
        }
      }
    }
  }
  // Table iteration order is unspecified; keep stanzas stable.
  variables.sort_by(|a, b| a.name.cmp(&b.name));

  Ok(Rule::new(&name, &command, &description).with_variables(variables))
}

/// Register the `brick` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, registry: Rc<RefCell<Registry>>) -> LuaResult<()> {
  let brick = lua.create_table()?;

  brick.set("platform", host_triple())?;
  brick.set("triple", create_triple_table(lua)?)?;

  register_binary(lua, &brick, "cpp_binary", Language::Cpp, registry.clone())?;
  register_binary(lua, &brick, "c_binary", Language::C, registry.clone())?;
  register_library(lua, &brick, "cpp_library", Language::Cpp, registry.clone())?;
  register_library(lua, &brick, "c_library", Language::C, registry.clone())?;
  register_library(lua, &brick, "objc_library", Language::ObjC, registry.clone())?;
  register_library(lua, &brick, "objcpp_library", Language::ObjCpp, registry.clone())?;

  let group_registry = registry.clone();
  let group = lua.create_function(move |lua, (name, members): (String, Option<LuaTable>)| {
    let file = declaring_file(lua, "group")?;
    let members = parse_target_refs(members)?;
    let mut registry = group_registry.borrow_mut();
    let result = registry.group_at(&name, &file, members);
    registered(lua, &registry, result)
  })?;
  brick.set("group", group)?;

  let glob_registry = registry.clone();
  let glob_fn = lua.create_function(move |lua, pattern: String| {
    let file = declaring_file(lua, "glob")?;
    let root = loaders::project_root(lua)?.ok_or_else(|| LuaError::external("no project root is set"))?;
    let limits = *glob_registry.borrow().limits();
    glob(&pattern, &file, &root, &limits).map_err(LuaError::external)
  })?;
  brick.set("glob", glob_fn)?;

  let rule = lua.create_function(move |_, spec: LuaTable| {
    let rule = parse_rule(&spec)?;
    registry.borrow_mut().register_rule(rule).map_err(LuaError::external)
  })?;
  brick.set("rule", rule)?;

  lua.globals().set("brick", brick)?;

  Ok(())
}

//! Conversion between Lua declaration tables and target types.
//!
//! A declaration returns a reference table marked with a `__type` metatable
//! field. Dependency lists accept only such tables, so a plain string or a
//! hand-built table is rejected before it reaches the registry.

use mlua::prelude::*;

use crate::platform::TargetTriple;
use crate::target::{BinaryArgs, LibraryArgs, LinkStyle, Target, TargetId};

/// Metatable `__type` of a target reference table.
pub const TARGET_REF_TYPE: &str = "TargetRef";

const BINARY_FIELDS: &[&str] = &["srcs", "compile_flags", "linker_flags", "target_triple", "deps"];

const LIBRARY_FIELDS: &[&str] = &[
  "srcs",
  "exported_headers",
  "header_namespace",
  "compile_flags",
  "linker_flags",
  "target_triple",
  "link_style",
  "deps",
];

/// Build the reference table returned to Lua for a registered target.
pub fn target_ref(lua: &Lua, id: TargetId, target: &Target) -> LuaResult<LuaTable> {
  let table = lua.create_table()?;
  table.set("id", id.index())?;
  table.set("name", target.name.as_str())?;
  table.set("kind", target.kind.as_str())?;
  table.set("file", target.file.as_str())?;

  let mt = lua.create_table()?;
  mt.set("__type", TARGET_REF_TYPE)?;
  table.set_metatable(Some(mt))?;

  Ok(table)
}

/// Whether `value` is a target reference table.
pub fn is_target_ref(value: &LuaValue) -> bool {
  let LuaValue::Table(t) = value else {
    return false;
  };
  t.metatable()
    .and_then(|mt| mt.get::<String>("__type").ok())
    .is_some_and(|ty| ty == TARGET_REF_TYPE)
}

/// Extract the id from a target reference table.
pub fn parse_target_ref(value: &LuaValue) -> LuaResult<TargetId> {
  match value {
    LuaValue::Table(t) if is_target_ref(value) => Ok(TargetId(t.get::<usize>("id")?)),
    _ => Err(LuaError::external(format!(
      "expected a target reference, got {}",
      value.type_name()
    ))),
  }
}

/// Parse a list of target references.
pub fn parse_target_refs(list: Option<LuaTable>) -> LuaResult<Vec<TargetId>> {
  let Some(list) = list else {
    return Ok(Vec::new());
  };
  list
    .sequence_values::<LuaValue>()
    .map(|value| parse_target_ref(&value?))
    .collect()
}

fn check_fields(table: &LuaTable, what: &str, allowed: &[&str]) -> LuaResult<()> {
  for pair in table.pairs::<LuaValue, LuaValue>() {
    let (key, _) = pair?;
    let known = match &key {
      LuaValue::String(s) => allowed.iter().any(|f| s.to_str().is_ok_and(|s| &*s == *f)),
      _ => false,
    };
    if !known {
      return Err(LuaError::external(format!(
        "unknown field {} in {} arguments",
        key.to_string()?,
        what
      )));
    }
  }
  Ok(())
}

fn strings(table: &LuaTable, key: &str) -> LuaResult<Vec<String>> {
  Ok(table.get::<Option<Vec<String>>>(key)?.unwrap_or_default())
}

fn triple(table: &LuaTable) -> LuaResult<Option<TargetTriple>> {
  match table.get::<Option<String>>("target_triple")? {
    Some(s) => s.parse().map(Some).map_err(LuaError::external),
    None => Ok(None),
  }
}

fn link_style(table: &LuaTable) -> LuaResult<LinkStyle> {
  match table.get::<Option<String>>("link_style")?.as_deref() {
    None | Some("static") => Ok(LinkStyle::Static),
    Some("shared") => Ok(LinkStyle::Shared),
    Some(other) => Err(LuaError::external(format!(
      "invalid link_style '{}': expected 'static' or 'shared'",
      other
    ))),
  }
}

/// Parse the arguments table of a binary declaration.
pub fn parse_binary_args(table: Option<LuaTable>) -> LuaResult<BinaryArgs> {
  let Some(table) = table else {
    return Ok(BinaryArgs::default());
  };
  check_fields(&table, "binary", BINARY_FIELDS)?;

  Ok(BinaryArgs {
    srcs: strings(&table, "srcs")?,
    compile_flags: strings(&table, "compile_flags")?,
    linker_flags: strings(&table, "linker_flags")?,
    target_triple: triple(&table)?,
    deps: parse_target_refs(table.get("deps")?)?,
  })
}

/// Parse the arguments table of a library declaration.
pub fn parse_library_args(table: Option<LuaTable>) -> LuaResult<LibraryArgs> {
  let Some(table) = table else {
    return Ok(LibraryArgs::default());
  };
  check_fields(&table, "library", LIBRARY_FIELDS)?;

  Ok(LibraryArgs {
    srcs: strings(&table, "srcs")?,
    exported_headers: strings(&table, "exported_headers")?,
    header_namespace: table.get("header_namespace")?,
    compile_flags: strings(&table, "compile_flags")?,
    linker_flags: strings(&table, "linker_flags")?,
    target_triple: triple(&table)?,
    link_style: link_style(&table)?,
    deps: parse_target_refs(table.get("deps")?)?,
  })
}

//! Template content for `brick init`.

/// Starter root build file.
pub const BUILD_LUA_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/build.lua"));

/// LuaLS type definitions for the `brick` global.
pub const BRICK_D_LUA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/brick.d.lua"));

/// Starter sources referenced by [`BUILD_LUA_TEMPLATE`], as `(path, content)`.
pub const STARTER_SOURCES: &[(&str, &str)] = &[
  (
    "src/main.cpp",
    "#include <core/include/core.h>\n\nint main() { return core::answer() == 42 ? 0 : 1; }\n",
  ),
  (
    "src/core/core.cpp",
    "#include \"../../include/core.h\"\n\nnamespace core {\nint answer() { return 42; }\n}\n",
  ),
  ("include/core.h", "#pragma once\n\nnamespace core {\nint answer();\n}\n"),
];

/// Template for .luarc.json (LuaLS configuration)
/// Contains {types_path} placeholder for substitution
pub const LUARC_JSON_TEMPLATE: &str = r#"{
  "$schema": "https://raw.githubusercontent.com/LuaLS/vscode-lua/master/setting/schema.json",
  "runtime": {
    "version": "Lua 5.4"
  },
  "workspace": {
    "library": [
      "{types_path}"
    ],
    "checkThirdParty": false
  },
  "diagnostics": {
    "globals": ["brick", "__dir", "__file"]
  }
}
"#;

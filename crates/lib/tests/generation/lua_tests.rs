//! Fixture projects evaluated from Lua and generated to disk.

use std::fs;
use std::path::PathBuf;

use brick_lib::eval::{EvalError, evaluate_config};
use brick_lib::generate::{GenerateOptions, generate};
use brick_lib::target::TargetKind;

use super::common::{copy_fixture, stanza};

mod nested {
  use super::*;

  #[test]
  fn declaring_files_follow_dofile() -> Result<(), EvalError> {
    let temp = copy_fixture("nested");
    let evaluation = evaluate_config(&temp.path().join("build.lua"))?;
    let graph = &evaluation.graph;

    let core = graph.target(graph.lookup("core").unwrap());
    assert_eq!(core.file, "lib/build.lua");
    assert_eq!(core.base_dir, "lib");
    assert_eq!(core.as_library().unwrap().srcs, vec!["core.c"]);

    let app = graph.target(evaluation.root);
    assert_eq!(app.name, "app");
    assert_eq!(app.file, "build.lua");
    assert_eq!(app.as_binary().unwrap().srcs, vec!["main.cpp"]);
    assert!(matches!(
      &graph.target(graph.lookup("everything").unwrap()).kind,
      TargetKind::Group { members } if members.len() == 2
    ));
    Ok(())
  }

  #[test]
  fn generated_file_uses_nested_paths() {
    let temp = copy_fixture("nested");
    let evaluation = evaluate_config(&temp.path().join("build.lua")).unwrap();
    let options = GenerateOptions {
      project_root: evaluation.project_root.clone(),
      build_dir: PathBuf::from("build"),
    };
    let generated = generate(&evaluation.graph, evaluation.root, &options).unwrap();
    let ninja = fs::read_to_string(&generated.path).unwrap();
    let host = brick_lib::platform::host_triple();

    let compile = stanza(&ninja, &format!("build {host}/lib/core.c.o: cxx ../lib/core.c"));
    assert!(compile.contains("-std=c11 -xc\n"));

    let published = format!(
      "build ns/acme/h/core/core.h: namespace-header {}\n",
      evaluation.project_root.join("lib").join("core.h").display()
    );
    assert!(ninja.contains(&published), "missing {published:?} in:\n{ninja}");

    let app = stanza(&ninja, &format!("build {host}/main.cpp.o: cxx ../main.cpp || ns/acme/_"));
    assert!(app.contains("args = -Wall -Wextra -fcolor-diagnostics -std=c++17 -O2 -Ins/acme/h\n"));

    let link = stanza(
      &ninja,
      &format!("build {host}/app: link-binary {host}/main.cpp.o {host}/core.o"),
    );
    assert!(link.contains("link_args = -lm\n"));

    // Rooted at `app`, so the group is not part of the file.
    assert!(!ninja.contains("build everything: phony"));
  }

  #[test]
  fn regeneration_is_byte_identical() {
    let temp = copy_fixture("nested");
    let path = temp.path().join("build.lua");
    let render = || {
      let evaluation = evaluate_config(&path).unwrap();
      let options = GenerateOptions {
        project_root: evaluation.project_root.clone(),
        build_dir: PathBuf::from("build"),
      };
      let generated = generate(&evaluation.graph, evaluation.root, &options).unwrap();
      fs::read_to_string(generated.path).unwrap()
    };
    assert_eq!(render(), render());
  }
}

mod wasm {
  use super::*;

  #[test]
  fn custom_rule_and_wasm_triple() {
    let temp = copy_fixture("wasm");
    let evaluation = evaluate_config(&temp.path().join("build.lua")).unwrap();
    let options = GenerateOptions {
      project_root: evaluation.project_root.clone(),
      build_dir: PathBuf::from("out"),
    };
    let generated = generate(&evaluation.graph, evaluation.root, &options).unwrap();
    let ninja = fs::read_to_string(&generated.path).unwrap();

    assert_eq!(
      stanza(&ninja, "rule wasm-opt"),
      "rule wasm-opt\n    command = wasm-opt -O3 $in -o $out\n    description = Optimizing $out\n"
    );
    let link = stanza(
      &ninja,
      "build wasm32-unknown-unknown/module: link-binary wasm32-unknown-unknown/module.c.o",
    );
    assert!(link.contains("    target = wasm32-unknown-unknown\n"));
    assert!(link.contains("    link_args = -nostdlib -Wl,--no-entry\n"));
  }
}

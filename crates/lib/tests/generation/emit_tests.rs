//! End-to-end emission through the Rust API.

use brick_lib::consts::MAX_ENTRIES;
use brick_lib::ninja::{EmitError, emit_ninja};
use brick_lib::platform::TargetTriple;
use brick_lib::target::{BinaryArgs, Language, LibraryArgs, Registry};

use super::common::{emit_to_string, stanza};

const TRIPLE: &str = "x86_64-gnu-linux";

fn triple() -> Option<TargetTriple> {
  Some(TRIPLE.parse().unwrap())
}

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

/// Library `L` publishing `a.h` into `ns1`, and binary `B` depending on it.
fn library_and_binary() -> (brick_lib::target::BuildGraph, brick_lib::target::TargetId) {
  let mut registry = Registry::new();
  let lib = registry
    .library_at(
      "L",
      "build.lua",
      Language::Cpp,
      LibraryArgs {
        srcs: strings(&["a.cpp"]),
        exported_headers: strings(&["a.h"]),
        header_namespace: Some("ns1".to_string()),
        target_triple: triple(),
        ..Default::default()
      },
    )
    .unwrap();
  let bin = registry
    .binary_at(
      "B",
      "build.lua",
      Language::Cpp,
      BinaryArgs {
        srcs: strings(&["main.cpp"]),
        target_triple: triple(),
        deps: vec![lib],
        ..Default::default()
      },
    )
    .unwrap();
  (registry.finish(), bin)
}

mod library_and_binary {
  use super::*;

  #[test]
  fn preamble_lists_rules_then_compdb() {
    let (graph, root) = library_and_binary();
    let ninja = emit_to_string(&graph, root);

    assert!(ninja.starts_with("ninja_required_version = 1.8.2\n\nrule cxx\n"));
    let rules: Vec<usize> = ["rule cxx", "rule merge-object", "rule link-binary", "rule namespace-header", "rule compdb"]
      .iter()
      .map(|r| ninja.find(r).unwrap())
      .collect();
    assert!(rules.windows(2).all(|w| w[0] < w[1]));
    assert!(ninja.contains("build compile_commands.json: compdb\n"));
  }

  #[test]
  fn binary_links_library_object() {
    let (graph, root) = library_and_binary();
    let ninja = emit_to_string(&graph, root);

    assert_eq!(
      stanza(&ninja, "build x86_64-gnu-linux/B: link-binary x86_64-gnu-linux/main.cpp.o x86_64-gnu-linux/L.o"),
      "build x86_64-gnu-linux/B: link-binary x86_64-gnu-linux/main.cpp.o x86_64-gnu-linux/L.o\n    target = x86_64-gnu-linux\n"
    );
  }

  #[test]
  fn binary_compile_waits_for_namespace_and_includes_it() {
    let (graph, root) = library_and_binary();
    let ninja = emit_to_string(&graph, root);

    assert_eq!(
      stanza(&ninja, "build x86_64-gnu-linux/main.cpp.o: cxx ../main.cpp || ns/ns1/_"),
      "build x86_64-gnu-linux/main.cpp.o: cxx ../main.cpp || ns/ns1/_\n    language = C++\n    target = x86_64-gnu-linux\n    depfile = x86_64-gnu-linux/main.cpp.o.d\n    args = -Wall -Wextra -fcolor-diagnostics -std=c++17 -Ins/ns1/h\n"
    );
  }

  #[test]
  fn library_publishes_headers_and_merges_objects() {
    let (graph, root) = library_and_binary();
    let ninja = emit_to_string(&graph, root);

    assert!(ninja.contains("build ns/ns1/h/L/a.h: namespace-header /proj/a.h\n"));
    assert!(ninja.contains("build ns/ns1/_: phony ns/ns1/h/L/a.h\n"));
    assert_eq!(
      stanza(&ninja, "build x86_64-gnu-linux/L.o: merge-object x86_64-gnu-linux/a.cpp.o"),
      "build x86_64-gnu-linux/L.o: merge-object x86_64-gnu-linux/a.cpp.o\n    ld = ld\n"
    );
    assert!(ninja.contains("build x86_64-gnu-linux/a.cpp.o: cxx ../a.cpp\n"));
  }

  #[test]
  fn emission_is_deterministic() {
    let (first_graph, first_root) = library_and_binary();
    let (second_graph, second_root) = library_and_binary();
    assert_eq!(emit_to_string(&first_graph, first_root), emit_to_string(&second_graph, second_root));
  }

  #[test]
  fn targets_outside_the_root_are_not_emitted() {
    let (graph, _) = library_and_binary();
    let lib = graph.lookup("L").unwrap();
    let ninja = emit_to_string(&graph, lib);
    assert!(!ninja.contains("link-binary x86_64-gnu-linux/main.cpp.o"));
    assert!(ninja.contains("build x86_64-gnu-linux/L.o: merge-object"));
  }
}

#[test]
fn core_library_with_default_namespace() {
  let mut registry = Registry::new();
  let core = registry
    .library_at(
      "core",
      "build.lua",
      Language::Cpp,
      LibraryArgs {
        srcs: strings(&["core.cpp"]),
        exported_headers: strings(&["core.h"]),
        target_triple: triple(),
        ..Default::default()
      },
    )
    .unwrap();
  let app = registry
    .binary_at(
      "app",
      "build.lua",
      Language::Cpp,
      BinaryArgs {
        srcs: strings(&["main.cpp"]),
        target_triple: triple(),
        deps: vec![core],
        ..Default::default()
      },
    )
    .unwrap();
  let graph = registry.finish();
  let ninja = emit_to_string(&graph, app);

  let link = "build x86_64-gnu-linux/app: link-binary x86_64-gnu-linux/main.cpp.o x86_64-gnu-linux/core.o\n";
  assert!(ninja.contains(link));
  let compile = stanza(&ninja, "build x86_64-gnu-linux/main.cpp.o: cxx ../main.cpp || ns/core/_");
  assert!(compile.contains(" -Ins/core/h\n"));
  assert!(ninja.contains("build ns/core/h/core/core.h: namespace-header /proj/core.h\n"));
  assert!(ninja.contains("build ns/core/_: phony ns/core/h/core/core.h\n"));
}

mod propagation {
  use super::*;

  #[test]
  fn transitive_library_chain() {
    let mut registry = Registry::new();
    let l2 = registry
      .library_at(
        "l2",
        "build.lua",
        Language::C,
        LibraryArgs {
          srcs: strings(&["l2.c"]),
          exported_headers: strings(&["l2.h"]),
          target_triple: triple(),
          ..Default::default()
        },
      )
      .unwrap();
    let l1 = registry
      .library_at(
        "l1",
        "build.lua",
        Language::C,
        LibraryArgs {
          srcs: strings(&["l1.c"]),
          exported_headers: strings(&["l1.h"]),
          target_triple: triple(),
          deps: vec![l2],
          ..Default::default()
        },
      )
      .unwrap();
    let b = registry
      .binary_at(
        "b",
        "build.lua",
        Language::C,
        BinaryArgs {
          srcs: strings(&["main.c"]),
          target_triple: triple(),
          deps: vec![l1],
          ..Default::default()
        },
      )
      .unwrap();
    let graph = registry.finish();
    let ninja = emit_to_string(&graph, b);

    assert_eq!(
      stanza(&ninja, "build x86_64-gnu-linux/b: link-binary x86_64-gnu-linux/main.c.o x86_64-gnu-linux/l1.o x86_64-gnu-linux/l2.o"),
      "build x86_64-gnu-linux/b: link-binary x86_64-gnu-linux/main.c.o x86_64-gnu-linux/l1.o x86_64-gnu-linux/l2.o\n    target = x86_64-gnu-linux\n"
    );
    assert_eq!(
      stanza(&ninja, "build x86_64-gnu-linux/main.c.o: cxx ../main.c || ns/l1/_ ns/l2/_"),
      "build x86_64-gnu-linux/main.c.o: cxx ../main.c || ns/l1/_ ns/l2/_\n    language = C\n    target = x86_64-gnu-linux\n    depfile = x86_64-gnu-linux/main.c.o.d\n    args = -Wall -Wextra -fcolor-diagnostics -std=c11 -xc -Ins/l1/h -Ins/l2/h\n"
    );
    assert_eq!(
      stanza(&ninja, "build x86_64-gnu-linux/l1.c.o: cxx ../l1.c || ns/l2/_"),
      "build x86_64-gnu-linux/l1.c.o: cxx ../l1.c || ns/l2/_\n    language = C\n    target = x86_64-gnu-linux\n    depfile = x86_64-gnu-linux/l1.c.o.d\n    args = -Wall -Wextra -fcolor-diagnostics -std=c11 -xc -Ins/l2/h\n"
    );
    assert_eq!(
      stanza(&ninja, "build x86_64-gnu-linux/l2.c.o: cxx ../l2.c"),
      "build x86_64-gnu-linux/l2.c.o: cxx ../l2.c\n    language = C\n    target = x86_64-gnu-linux\n    depfile = x86_64-gnu-linux/l2.c.o.d\n    args = -Wall -Wextra -fcolor-diagnostics -std=c11 -xc\n"
    );
  }
}

mod shared_sources {
  use super::*;
  use brick_lib::target::BuildGraph;

  /// Binaries `app` and `test` in one directory, both compiling `util.cpp`.
  fn two_binaries(test_flags: &[&str]) -> BuildGraph {
    let mut registry = Registry::new();
    for (name, flags) in [("app", &[] as &[&str]), ("test", test_flags)] {
      registry
        .binary_at(
          name,
          "build.lua",
          Language::Cpp,
          BinaryArgs {
            srcs: strings(&[&format!("{name}.cpp"), "util.cpp"]),
            compile_flags: strings(flags),
            target_triple: triple(),
            ..Default::default()
          },
        )
        .unwrap();
    }
    registry.finish()
  }

  #[test]
  fn identical_object_is_compiled_once() {
    let graph = two_binaries(&[]);
    let ninja = emit_to_string(&graph, graph.all());

    assert_eq!(ninja.matches("build x86_64-gnu-linux/util.cpp.o: cxx").count(), 1);
    assert!(ninja.contains(
      "build x86_64-gnu-linux/app: link-binary x86_64-gnu-linux/app.cpp.o x86_64-gnu-linux/util.cpp.o\n"
    ));
    assert!(ninja.contains(
      "build x86_64-gnu-linux/test: link-binary x86_64-gnu-linux/test.cpp.o x86_64-gnu-linux/util.cpp.o\n"
    ));
  }

  #[test]
  fn conflicting_settings_are_reported() {
    let graph = two_binaries(&["-DTESTING"]);
    let mut out = Vec::new();
    let err = emit_ninja(&mut out, &graph, graph.all(), &Default::default()).unwrap_err();

    match err {
      EmitError::ConflictingOutput { output, first, second } => {
        assert_eq!(output, "x86_64-gnu-linux/util.cpp.o");
        assert_eq!(first, "app");
        assert_eq!(second, "test");
      }
      other => panic!("expected conflicting output, got {other:?}"),
    }
  }
}

mod groups {
  use super::*;

  #[test]
  fn all_aggregates_every_declared_output() {
    let (graph, _) = library_and_binary();
    let ninja = emit_to_string(&graph, graph.all());
    assert!(ninja.contains("build all: phony x86_64-gnu-linux/L.o x86_64-gnu-linux/B\n"));
  }

  #[test]
  fn shared_namespace_has_one_marker() {
    let mut registry = Registry::new();
    for name in ["x", "y"] {
      registry
        .library_at(
          name,
          "build.lua",
          Language::C,
          LibraryArgs {
            srcs: strings(&[&format!("{name}.c")]),
            exported_headers: strings(&[&format!("{name}.h")]),
            header_namespace: Some("shared".to_string()),
            target_triple: triple(),
            ..Default::default()
          },
        )
        .unwrap();
    }
    let graph = registry.finish();
    let ninja = emit_to_string(&graph, graph.all());

    assert_eq!(ninja.matches("build ns/shared/_: phony").count(), 1);
    assert!(ninja.contains("build ns/shared/_: phony ns/shared/h/x/x.h ns/shared/h/y/y.h\n"));
  }
}

mod sources {
  use super::*;

  #[test]
  fn nested_declaring_file_prefixes_paths() {
    let mut registry = Registry::new();
    let root = registry
      .binary_at(
        "tool",
        "tools/build.lua",
        Language::C,
        BinaryArgs {
          srcs: strings(&["tool.c", "weird.xyz"]),
          target_triple: triple(),
          ..Default::default()
        },
      )
      .unwrap();
    let graph = registry.finish();
    let ninja = emit_to_string(&graph, root);

    let tool = stanza(&ninja, "build x86_64-gnu-linux/tools/tool.c.o: cxx ../tools/tool.c");
    assert!(tool.contains("    language = C\n"));
    assert!(tool.contains("    args = -Wall -Wextra -fcolor-diagnostics -std=c11 -xc\n"));

    let weird = stanza(&ninja, "build x86_64-gnu-linux/tools/weird.xyz.o: cxx ../tools/weird.xyz");
    assert!(!weird.contains("language"));
  }

  #[test]
  fn linker_flags_are_collected_from_libraries() {
    let mut registry = Registry::new();
    let lib = registry
      .library_at(
        "z",
        "build.lua",
        Language::C,
        LibraryArgs {
          srcs: strings(&["z.c"]),
          linker_flags: strings(&["-lm"]),
          target_triple: triple(),
          ..Default::default()
        },
      )
      .unwrap();
    let bin = registry
      .binary_at(
        "app",
        "build.lua",
        Language::C,
        BinaryArgs {
          srcs: strings(&["main.c"]),
          linker_flags: strings(&["-static"]),
          target_triple: triple(),
          deps: vec![lib],
          ..Default::default()
        },
      )
      .unwrap();
    let graph = registry.finish();
    let ninja = emit_to_string(&graph, bin);

    let link = stanza(&ninja, "build x86_64-gnu-linux/app: link-binary x86_64-gnu-linux/main.c.o x86_64-gnu-linux/z.o");
    assert!(link.contains("    link_args = -static -lm\n"));
  }
}

mod capacity {
  use super::*;
  use brick_lib::target::TargetError;

  #[test]
  fn full_registry_still_emits_from_all() {
    let mut registry = Registry::new();
    for i in 0..MAX_ENTRIES - 1 {
      registry.group_at(&format!("g{i}"), "build.lua", vec![]).unwrap();
    }

    // One more would leave no room for the aggregate.
    let err = registry.group_at("overflow", "build.lua", vec![]).unwrap_err();
    assert!(matches!(err, TargetError::Capacity(_)));
    assert!(err.to_string().contains("'overflow'"));

    let graph = registry.finish();
    let ninja = emit_to_string(&graph, graph.all());
    assert!(ninja.contains("build all: phony g0 g1 "));
    assert!(ninja.contains(&format!("build g{}: phony\n", MAX_ENTRIES - 2)));
  }
}

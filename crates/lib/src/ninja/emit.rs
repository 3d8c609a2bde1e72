//! Edge generation.
//!
//! Output paths are namespaced by target triple so one build directory can
//! hold several platforms. Sources are referenced through
//! [`EmitOptions::source_prefix`], published headers by absolute path.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{NAMESPACE_ROOT, NINJA_REQUIRED_VERSION};
use crate::limits::CapacityError;
use crate::target::{Binary, BuildGraph, Language, Library, Target, TargetId, TargetKind};

use super::rules::{COMPDB, CXX, LINK_BINARY, MERGE_OBJECT, NAMESPACE_HEADER};

/// Errors that can occur while writing a build file.
#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to write build file: {0}")]
  Io(#[from] io::Error),

  #[error(transparent)]
  Capacity(#[from] CapacityError),

  #[error("{output} is compiled by both '{first}' and '{second}' with different settings")]
  ConflictingOutput { output: String, first: String, second: String },
}

/// Where sources live relative to the generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
  /// Absolute project root; published headers link to files under it.
  pub project_root: PathBuf,
  /// Path from the build directory back to the project root.
  pub source_prefix: String,
}

impl Default for EmitOptions {
  fn default() -> Self {
    Self {
      project_root: PathBuf::from("."),
      source_prefix: "..".to_string(),
    }
  }
}

/// Counts reported after a successful emission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
  pub targets: usize,
  pub edges: usize,
}

/// Escape a path for use in a `build` line.
pub fn escape_path(path: &str) -> String {
  let mut escaped = String::with_capacity(path.len());
  for c in path.chars() {
    match c {
      '$' | ' ' | ':' => {
        escaped.push('$');
        escaped.push(c);
      }
      _ => escaped.push(c),
    }
  }
  escaped
}

/// Join path segments with `/`, skipping empty ones.
pub fn join_path(segments: &[&str]) -> String {
  segments.iter().filter(|s| !s.is_empty()).copied().collect::<Vec<_>>().join("/")
}

/// `<triple>/<base_dir>/<src>.o`
pub fn object_path(triple: &str, base_dir: &str, src: &str) -> String {
  join_path(&[triple, base_dir, format!("{src}.o").as_str()])
}

/// `<triple>/<name>`
pub fn binary_path(triple: &str, name: &str) -> String {
  join_path(&[triple, name])
}

/// `<triple>/<name>.o`
pub fn merged_object_path(triple: &str, name: &str) -> String {
  join_path(&[triple, format!("{name}.o").as_str()])
}

/// `ns/<namespace>/h/<name>/<header>`
pub fn published_header_path(namespace: &str, name: &str, header: &str) -> String {
  join_path(&[NAMESPACE_ROOT, namespace, "h", name, header])
}

/// `ns/<namespace>/_`
pub fn namespace_marker_path(namespace: &str) -> String {
  join_path(&[NAMESPACE_ROOT, namespace, "_"])
}

/// `ns/<namespace>/h`
pub fn include_root_path(namespace: &str) -> String {
  join_path(&[NAMESPACE_ROOT, namespace, "h"])
}

/// The path a dependent refers to when it names `target` as an input.
fn output_of(target: &Target) -> String {
  match &target.kind {
    TargetKind::Binary(binary) => binary_path(&binary.target_triple.triple(), &target.name),
    TargetKind::Library(library) => merged_object_path(&library.target_triple.triple(), &target.name),
    TargetKind::Group { .. } => target.name.clone(),
  }
}

#[derive(Default)]
struct Edge {
  outputs: Vec<String>,
  rule: &'static str,
  inputs: Vec<String>,
  order_only: Vec<String>,
  variables: Vec<(&'static str, String)>,
}

impl Edge {
  fn new(output: String, rule: &'static str) -> Self {
    Self {
      outputs: vec![output],
      rule,
      ..Default::default()
    }
  }

  fn inputs(mut self, inputs: Vec<String>) -> Self {
    self.inputs = inputs;
    self
  }

  fn order_only(mut self, order_only: Vec<String>) -> Self {
    self.order_only = order_only;
    self
  }

  fn var(mut self, name: &'static str, value: String) -> Self {
    self.variables.push((name, value));
    self
  }
}

/// The compile settings an object was first emitted with.
struct CompiledObject {
  owner: String,
  language: Option<Language>,
  triple: String,
  args: String,
}

/// Library dependency facts a compile or link edge needs.
struct LibraryDeps<'g> {
  libraries: Vec<(&'g Target, &'g Library)>,
  namespaces: Vec<&'g str>,
}

impl<'g> LibraryDeps<'g> {
  fn include_flags(&self) -> impl Iterator<Item = String> + '_ {
    self.namespaces.iter().map(|ns| format!("-I{}", include_root_path(ns)))
  }

  fn markers(&self) -> Vec<String> {
    self.namespaces.iter().map(|ns| escape_path(&namespace_marker_path(ns))).collect()
  }
}

struct Emitter<'g, W> {
  out: W,
  graph: &'g BuildGraph,
  options: &'g EmitOptions,
  order: Vec<TargetId>,
  published_namespaces: BTreeSet<&'g str>,
  /// Object outputs emitted so far, keyed by path.
  objects: BTreeMap<String, CompiledObject>,
  summary: EmitSummary,
}

impl<'g, W: Write> Emitter<'g, W> {
  fn edge(&mut self, edge: Edge) -> io::Result<()> {
    write!(self.out, "build {}: {}", edge.outputs.join(" "), edge.rule)?;
    for input in &edge.inputs {
      write!(self.out, " {input}")?;
    }
    if !edge.order_only.is_empty() {
      write!(self.out, " ||")?;
      for input in &edge.order_only {
        write!(self.out, " {input}")?;
      }
    }
    writeln!(self.out)?;
    for (name, value) in &edge.variables {
      writeln!(self.out, "    {name} = {value}")?;
    }
    writeln!(self.out)?;
    self.summary.edges += 1;
    Ok(())
  }

  fn preamble(&mut self) -> io::Result<()> {
    writeln!(self.out, "ninja_required_version = {NINJA_REQUIRED_VERSION}")?;
    writeln!(self.out)?;
    let graph = self.graph;
    for rule in graph.rules().iter() {
      rule.write(&mut self.out)?;
    }
    self.edge(Edge::new("compile_commands.json".to_string(), COMPDB))
  }

  /// Libraries among the flattened dependencies of `id`, root excluded.
  fn library_deps(&self, id: TargetId) -> Result<LibraryDeps<'g>, CapacityError> {
    let graph = self.graph;
    let mut libraries = Vec::new();
    let mut namespaces: Vec<&'g str> = Vec::new();
    for dep in graph.flatten(id)?.into_iter().skip(1) {
      let target = graph.target(dep);
      if let Some(library) = target.as_library() {
        libraries.push((target, library));
        if !namespaces.contains(&library.header_namespace.as_str()) {
          namespaces.push(&library.header_namespace);
        }
      }
    }
    Ok(LibraryDeps { libraries, namespaces })
  }

  fn compile_edges(
    &mut self,
    target: &Target,
    triple: &str,
    srcs: &[String],
    compile_flags: &[String],
    deps: &LibraryDeps<'_>,
  ) -> Result<(), EmitError> {
    let args: Vec<String> = compile_flags.iter().cloned().chain(deps.include_flags()).collect();
    let args = args.join(" ");

    for src in srcs {
      let object = object_path(triple, &target.base_dir, src);
      let language = Language::from_filename(src);

      // A source shared by several targets is compiled once.
      if let Some(first) = self.objects.get(&object) {
        if first.language == language && first.triple == triple && first.args == args {
          debug!(object = %object, owner = %first.owner, "object already emitted");
          continue;
        }
        return Err(EmitError::ConflictingOutput {
          output: object,
          first: first.owner.clone(),
          second: target.name.clone(),
        });
      }
      self.objects.insert(
        object.clone(),
        CompiledObject {
          owner: target.name.clone(),
          language,
          triple: triple.to_string(),
          args: args.clone(),
        },
      );

      let source = join_path(&[self.options.source_prefix.as_str(), target.base_dir.as_str(), src.as_str()]);
      let mut edge = Edge::new(escape_path(&object), CXX)
        .inputs(vec![escape_path(&source)])
        .order_only(deps.markers());
      if let Some(language) = language {
        edge = edge.var("language", language.display_name().to_string());
      }
      let edge = edge
        .var("target", triple.to_string())
        .var("depfile", format!("{object}.d"))
        .var("args", args.clone());
      self.edge(edge)?;
    }
    Ok(())
  }

  fn binary(&mut self, id: TargetId, target: &Target, binary: &Binary) -> Result<(), EmitError> {
    let triple = binary.target_triple.triple();
    let deps = self.library_deps(id)?;

    let mut inputs: Vec<String> = binary
      .srcs
      .iter()
      .map(|src| escape_path(&object_path(&triple, &target.base_dir, src)))
      .collect();
    inputs.extend(
      deps
        .libraries
        .iter()
        .map(|(lib, library)| escape_path(&merged_object_path(&library.target_triple.triple(), &lib.name))),
    );

    let link_args: Vec<&str> = binary
      .linker_flags
      .iter()
      .chain(deps.libraries.iter().flat_map(|(_, library)| library.linker_flags.iter()))
      .map(String::as_str)
      .collect();

    let mut link = Edge::new(escape_path(&binary_path(&triple, &target.name)), LINK_BINARY)
      .inputs(inputs)
      .var("target", triple.clone());
    if !link_args.is_empty() {
      link = link.var("link_args", link_args.join(" "));
    }
    self.edge(link)?;

    self.compile_edges(target, &triple, &binary.srcs, &binary.compile_flags, &deps)?;
    Ok(())
  }

  fn library(&mut self, id: TargetId, target: &Target, library: &'g Library) -> Result<(), EmitError> {
    let triple = library.target_triple.triple();
    let namespace = library.header_namespace.as_str();

    for header in &library.exported_headers {
      let source = self.options.project_root.join(&target.base_dir).join(header);
      let edge = Edge::new(
        escape_path(&published_header_path(namespace, &target.name, header)),
        NAMESPACE_HEADER,
      )
      .inputs(vec![escape_path(&path_string(&source))]);
      self.edge(edge)?;
    }

    // One marker per namespace, covering every library published into it.
    if self.published_namespaces.insert(namespace) {
      let headers = self.namespace_headers(namespace);
      self.edge(Edge::new(escape_path(&namespace_marker_path(namespace)), "phony").inputs(headers))?;
    }

    let objects = library
      .srcs
      .iter()
      .map(|src| escape_path(&object_path(&triple, &target.base_dir, src)))
      .collect();
    let merge = Edge::new(escape_path(&merged_object_path(&triple, &target.name)), MERGE_OBJECT)
      .inputs(objects)
      .var("ld", "ld".to_string());
    self.edge(merge)?;

    let deps = self.library_deps(id)?;
    self.compile_edges(target, &triple, &library.srcs, &library.compile_flags, &deps)?;
    Ok(())
  }

  fn group(&mut self, target: &Target, members: &[TargetId]) -> io::Result<()> {
    let inputs = members
      .iter()
      .map(|&m| escape_path(&output_of(self.graph.target(m))))
      .collect();
    self.edge(Edge::new(escape_path(&target.name), "phony").inputs(inputs))
  }

  /// Published headers of every library in `namespace` within this emission.
  fn namespace_headers(&self, namespace: &str) -> Vec<String> {
    self
      .order
      .iter()
      .filter_map(|&id| {
        let target = self.graph.target(id);
        target.as_library().map(|library| (target, library))
      })
      .filter(|(_, library)| library.header_namespace == namespace)
      .flat_map(|(target, library)| {
        library
          .exported_headers
          .iter()
          .map(move |header| escape_path(&published_header_path(namespace, &target.name, header)))
      })
      .collect()
  }

  fn emit(&mut self) -> Result<(), EmitError> {
    self.preamble()?;

    let graph = self.graph;
    for id in self.order.clone() {
      let target = graph.target(id);
      debug!(name = %target.name, kind = target.kind.as_str(), "emitting target");
      match &target.kind {
        TargetKind::Binary(binary) => self.binary(id, target, binary)?,
        TargetKind::Library(library) => self.library(id, target, library)?,
        TargetKind::Group { members } => self.group(target, members)?,
      }
      self.summary.targets += 1;
    }
    Ok(())
  }
}

fn path_string(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

/// Write the Ninja build file for `root` and everything it depends on.
pub fn emit_ninja(
  out: impl Write,
  graph: &BuildGraph,
  root: TargetId,
  options: &EmitOptions,
) -> Result<EmitSummary, EmitError> {
  let order = graph.flatten(root)?;
  let mut emitter = Emitter {
    out,
    graph,
    options,
    order,
    published_namespaces: BTreeSet::new(),
    objects: BTreeMap::new(),
    summary: EmitSummary::default(),
  };
  emitter.emit()?;
  emitter.out.flush()?;

  let summary = emitter.summary;
  info!(
    root = %graph.target(root).name,
    targets = summary.targets,
    edges = summary.edges,
    "emitted build file"
  );
  Ok(summary)
}

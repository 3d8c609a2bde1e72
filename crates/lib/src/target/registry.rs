//! Construction-phase registry and the finished, read-only build graph.

use std::collections::HashMap;
use std::panic::Location;
use std::path::Path;

use tracing::debug;

use crate::consts::ALL_TARGET;
use crate::limits::Limits;
use crate::ninja::rules::{Rule, RuleError, RuleTable};
use crate::platform::TargetTriple;

use super::{Binary, BinaryArgs, Language, Library, LibraryArgs, Target, TargetError, TargetId, TargetKind};

/// Directory part of a declaring file, `/`-separated, without a leading `./`.
pub fn base_dir_of(file: &str) -> String {
  let dir = Path::new(file)
    .parent()
    .map(|p| p.to_string_lossy().replace('\\', "/"))
    .unwrap_or_default();
  let mut dir = dir.as_str();
  while let Some(rest) = dir.strip_prefix("./") {
    dir = rest;
  }
  if dir == "." { String::new() } else { dir.to_string() }
}

/// Append-only record of every target declared during one generation run.
///
/// Declarations validate their inputs, merge language defaults ahead of the
/// caller's flags and resolve the host triple before the target is stored.
/// [`Registry::finish`] closes the construction phase.
#[derive(Debug)]
pub struct Registry {
  limits: Limits,
  targets: Vec<Target>,
  names: HashMap<String, TargetId>,
  rules: RuleTable,
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}

impl Registry {
  pub fn new() -> Self {
    Self::with_limits(Limits::default())
  }

  pub fn with_limits(limits: Limits) -> Self {
    Self {
      limits,
      targets: Vec::new(),
      names: HashMap::new(),
      rules: RuleTable::builtin(),
    }
  }

  pub fn limits(&self) -> &Limits {
    &self.limits
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  pub fn get(&self, id: TargetId) -> Option<&Target> {
    self.targets.get(id.0)
  }

  pub fn lookup(&self, name: &str) -> Option<TargetId> {
    self.names.get(name).copied()
  }

  pub fn rules(&self) -> &RuleTable {
    &self.rules
  }

  /// Add a custom rule to the rule table.
  pub fn register_rule(&mut self, rule: Rule) -> Result<(), RuleError> {
    self.rules.register(rule)
  }

  #[track_caller]
  pub fn cpp_binary(&mut self, name: &str, args: BinaryArgs) -> Result<TargetId, TargetError> {
    self.binary_at(name, Location::caller().file(), Language::Cpp, args)
  }

  #[track_caller]
  pub fn c_binary(&mut self, name: &str, args: BinaryArgs) -> Result<TargetId, TargetError> {
    self.binary_at(name, Location::caller().file(), Language::C, args)
  }

  #[track_caller]
  pub fn cpp_library(&mut self, name: &str, args: LibraryArgs) -> Result<TargetId, TargetError> {
    self.library_at(name, Location::caller().file(), Language::Cpp, args)
  }

  #[track_caller]
  pub fn c_library(&mut self, name: &str, args: LibraryArgs) -> Result<TargetId, TargetError> {
    self.library_at(name, Location::caller().file(), Language::C, args)
  }

  #[track_caller]
  pub fn objc_library(&mut self, name: &str, args: LibraryArgs) -> Result<TargetId, TargetError> {
    self.library_at(name, Location::caller().file(), Language::ObjC, args)
  }

  #[track_caller]
  pub fn objcpp_library(&mut self, name: &str, args: LibraryArgs) -> Result<TargetId, TargetError> {
    self.library_at(name, Location::caller().file(), Language::ObjCpp, args)
  }

  #[track_caller]
  pub fn group(&mut self, name: &str, members: Vec<TargetId>) -> Result<TargetId, TargetError> {
    self.group_at(name, Location::caller().file(), members)
  }

  /// Declare a binary from an explicit declaring file.
  pub fn binary_at(
    &mut self,
    name: &str,
    file: &str,
    language: Language,
    args: BinaryArgs,
  ) -> Result<TargetId, TargetError> {
    self.check_identity(name, file)?;
    self.check_entries(name, "sources", &args.srcs)?;
    self.check_entries(name, "linker flags", &args.linker_flags)?;
    self.check_deps(name, &args.deps)?;
    let compile_flags = self.merge_flags(name, language, args.compile_flags)?;

    let binary = Binary {
      language,
      srcs: args.srcs,
      compile_flags,
      linker_flags: args.linker_flags,
      target_triple: args.target_triple.unwrap_or_else(TargetTriple::host),
      deps: args.deps,
    };
    self.insert(name, file, TargetKind::Binary(binary))
  }

  /// Declare a library from an explicit declaring file.
  pub fn library_at(
    &mut self,
    name: &str,
    file: &str,
    language: Language,
    args: LibraryArgs,
  ) -> Result<TargetId, TargetError> {
    self.check_identity(name, file)?;
    self.check_entries(name, "sources", &args.srcs)?;
    self.check_entries(name, "exported headers", &args.exported_headers)?;
    self.check_entries(name, "linker flags", &args.linker_flags)?;
    self.check_deps(name, &args.deps)?;
    let compile_flags = self.merge_flags(name, language, args.compile_flags)?;

    let header_namespace = match args.header_namespace {
      Some(ns) if !ns.is_empty() => ns,
      _ => name.to_string(),
    };

    let library = Library {
      language,
      srcs: args.srcs,
      exported_headers: args.exported_headers,
      header_namespace,
      compile_flags,
      linker_flags: args.linker_flags,
      target_triple: args.target_triple.unwrap_or_else(TargetTriple::host),
      link_style: args.link_style,
      deps: args.deps,
    };
    self.insert(name, file, TargetKind::Library(library))
  }

  /// Declare a group from an explicit declaring file.
  pub fn group_at(&mut self, name: &str, file: &str, members: Vec<TargetId>) -> Result<TargetId, TargetError> {
    self.check_identity(name, file)?;
    self.check_deps(name, &members)?;
    self.insert(name, file, TargetKind::Group { members })
  }

  /// Close the construction phase.
  ///
  /// The returned graph carries the aggregate `all` group whose members are
  /// every registered target in declaration order.
  pub fn finish(self) -> BuildGraph {
    let Registry {
      limits,
      mut targets,
      mut names,
      rules,
    } = self;

    let all = TargetId(targets.len());
    let members = (0..targets.len()).map(TargetId).collect();
    targets.push(Target {
      name: ALL_TARGET.to_string(),
      file: String::new(),
      base_dir: String::new(),
      kind: TargetKind::Group { members },
    });
    names.insert(ALL_TARGET.to_string(), all);

    BuildGraph {
      limits,
      targets,
      names,
      rules,
      all,
    }
  }

  fn check_identity(&self, name: &str, file: &str) -> Result<(), TargetError> {
    if name.is_empty() {
      return Err(TargetError::EmptyName);
    }
    if file.is_empty() {
      return Err(TargetError::EmptyFile { name: name.to_string() });
    }
    if name == ALL_TARGET {
      return Err(TargetError::ReservedName { name: name.to_string() });
    }
    if let Some(&existing) = self.names.get(name) {
      return Err(TargetError::DuplicateTarget {
        name: name.to_string(),
        first: self.targets[existing.0].file.clone(),
        second: file.to_string(),
      });
    }
    // Flattening the aggregate visits it and every registered target.
    self.limits.check("targets including 'all'", name, self.targets.len() + 2)?;
    Ok(())
  }

  fn check_entries(&self, target: &str, what: &'static str, entries: &[String]) -> Result<(), TargetError> {
    self.limits.check(what, target, entries.len())?;
    if entries.iter().any(|e| e.is_empty()) {
      return Err(TargetError::EmptyEntry {
        target: target.to_string(),
        what,
      });
    }
    Ok(())
  }

  fn check_deps(&self, target: &str, deps: &[TargetId]) -> Result<(), TargetError> {
    self.limits.check("dependencies", target, deps.len())?;
    if let Some(&id) = deps.iter().find(|id| id.0 >= self.targets.len()) {
      return Err(TargetError::UnknownDependency {
        target: target.to_string(),
        id,
      });
    }
    Ok(())
  }

  fn merge_flags(&self, target: &str, language: Language, flags: Vec<String>) -> Result<Vec<String>, TargetError> {
    let mut merged = language.default_flags();
    merged.extend(flags);
    self.check_entries(target, "compile flags", &merged)?;
    Ok(merged)
  }

  fn insert(&mut self, name: &str, file: &str, kind: TargetKind) -> Result<TargetId, TargetError> {
    let id = TargetId(self.targets.len());
    let base_dir = base_dir_of(file);
    debug!(name, file, kind = kind.as_str(), base_dir = %base_dir, "declared target");

    self.targets.push(Target {
      name: name.to_string(),
      file: file.to_string(),
      base_dir,
      kind,
    });
    self.names.insert(name.to_string(), id);
    Ok(id)
  }
}

/// The finished, read-only set of targets for one generation run.
#[derive(Debug)]
pub struct BuildGraph {
  limits: Limits,
  targets: Vec<Target>,
  names: HashMap<String, TargetId>,
  rules: RuleTable,
  all: TargetId,
}

impl BuildGraph {
  /// The implicit aggregate of every registered target.
  pub fn all(&self) -> TargetId {
    self.all
  }

  /// Look up a registered target. Panics on an id from another registry.
  pub fn target(&self, id: TargetId) -> &Target {
    &self.targets[id.0]
  }

  pub fn lookup(&self, name: &str) -> Option<TargetId> {
    self.names.get(name).copied()
  }

  /// Every declared target, in declaration order, without the aggregate.
  pub fn declared(&self) -> impl Iterator<Item = (TargetId, &Target)> {
    self
      .targets
      .iter()
      .enumerate()
      .filter(|(i, _)| *i != self.all.0)
      .map(|(i, t)| (TargetId(i), t))
  }

  pub fn rules(&self) -> &RuleTable {
    &self.rules
  }

  pub fn limits(&self) -> &Limits {
    &self.limits
  }
}

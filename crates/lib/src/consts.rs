//! Constants shared across the crate.

/// Default ceiling for every bounded list (sources, flags, dependencies,
/// glob matches, flattened targets, registered targets).
pub const MAX_ENTRIES: usize = 128;

/// Minimum Ninja version required by the emitted build file.
pub const NINJA_REQUIRED_VERSION: &str = "1.8.2";

/// Default name of the root Lua build file.
pub const BUILD_FILE: &str = "build.lua";

/// Default build directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Name of the generated Ninja file inside the build directory.
pub const NINJA_FILE: &str = "build.ninja";

/// Name of the implicit aggregate target containing every registered target.
pub const ALL_TARGET: &str = "all";

/// Root directory of synthesized header namespaces inside the build directory.
pub const NAMESPACE_ROOT: &str = "ns";

/// Placeholder rendered for an absent triple component.
pub const UNKNOWN: &str = "unknown";

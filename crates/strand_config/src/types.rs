//! Configuration types deserialized from `strand.toml`.

use serde::Deserialize;

/// The whole `strand.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// Linker settings.
    #[serde(default)]
    pub link: LinkConfig,
}

/// The `[project]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// Project name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
}

/// The `[link]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Which occurrences of a colliding private symbol get a fresh name.
    pub rename_policy: RenamePolicy,
    /// Prefix for namespaces assigned to untagged units (`module` gives
    /// `module_0`, `module_1`, ...).
    pub namespace_prefix: String,
    /// Worker threads for the parallel phases; `0` picks one per core.
    pub threads: usize,
    /// Check every class and symbol reference of the merged unit.
    pub verify: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            rename_policy: RenamePolicy::default(),
            namespace_prefix: "module".to_string(),
            threads: 0,
            verify: true,
        }
    }
}

/// Policy for renaming private symbols that collide across units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenamePolicy {
    /// The first occurrence in unit order keeps its name.
    #[default]
    KeepFirst,
    /// Every occurrence gets a fresh name.
    RenameAll,
}

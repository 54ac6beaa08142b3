use serde::Deserialize;
use serde::Serialize;

/// Flags controlling tag helper discovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Copy documentation comments onto descriptors.
    pub include_documentation: bool,
    /// Skip types and members marked as hidden from editors.
    pub exclude_hidden: bool,
    /// Assemblies whose names start with one of these prefixes are never
    /// scanned; they cannot define component or tag helper marker types.
    pub skip_assembly_prefixes: Vec<String>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            include_documentation: true,
            exclude_hidden: false,
            skip_assembly_prefixes: vec!["System.".to_string()],
        }
    }
}

impl DiscoverySettings {
    #[must_use]
    pub fn skips_assembly(&self, name: &str) -> bool {
        self.skip_assembly_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

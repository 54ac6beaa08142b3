use rzls_conf::DiscoverySettings;
use rzls_symbols::AssemblyId;
use rzls_symbols::AssemblySymbol;
use rzls_symbols::Compilation;
use rzls_symbols::NamedTypeSymbol;
use rzls_symbols::TypeId;

use super::walker::visit_types;
use crate::TagHelperDescriptor;

/// What one provider run sees and where it writes.
#[derive(Debug)]
pub struct ProviderContext<'a> {
    compilation: &'a Compilation,
    settings: &'a DiscoverySettings,
    target: Option<AssemblyId>,
    existing: &'a [TagHelperDescriptor],
    results: Vec<TagHelperDescriptor>,
}

impl<'a> ProviderContext<'a> {
    #[must_use]
    pub fn new(
        compilation: &'a Compilation,
        settings: &'a DiscoverySettings,
        target: Option<AssemblyId>,
    ) -> Self {
        Self {
            compilation,
            settings,
            target,
            existing: &[],
            results: Vec::new(),
        }
    }

    /// Expose descriptors produced by lower-ordered providers.
    #[must_use]
    pub fn with_existing(mut self, existing: &'a [TagHelperDescriptor]) -> Self {
        self.existing = existing;
        self
    }

    #[must_use]
    pub fn compilation(&self) -> &'a Compilation {
        self.compilation
    }

    #[must_use]
    pub fn settings(&self) -> &'a DiscoverySettings {
        self.settings
    }

    /// The one assembly this run is restricted to, if any.
    #[must_use]
    pub fn target(&self) -> Option<AssemblyId> {
        self.target
    }

    #[must_use]
    pub fn existing(&self) -> &'a [TagHelperDescriptor] {
        self.existing
    }

    #[must_use]
    pub fn results(&self) -> &[TagHelperDescriptor] {
        &self.results
    }

    /// Append a descriptor, dropping its documentation when documentation
    /// is switched off.
    pub fn add(&mut self, mut descriptor: TagHelperDescriptor) {
        if !self.settings.include_documentation {
            descriptor.clear_documentation();
        }
        self.results.push(descriptor);
    }

    #[must_use]
    pub fn into_results(self) -> Vec<TagHelperDescriptor> {
        self.results
    }

    /// Assemblies a symbol-scanning provider should walk: the target alone,
    /// or every assembly not excluded by a system-library prefix.
    pub fn assemblies(&self) -> impl Iterator<Item = &'a AssemblySymbol> + '_ {
        let settings = self.settings;
        let target = self.target;
        self.compilation
            .assemblies()
            .iter()
            .filter(move |assembly| match target {
                Some(target) => assembly.id() == target,
                None => !settings.skips_assembly(assembly.name()),
            })
    }

    /// Call `visit` for every type in the scanned assemblies.
    pub fn for_each_type(&self, mut visit: impl FnMut(TypeId, &'a NamedTypeSymbol)) {
        for assembly in self.assemblies() {
            visit_types(self.compilation, assembly.global_namespace(), &mut visit);
        }
    }

    /// Whether a descriptor hosted on `id` belongs to this run.
    #[must_use]
    pub fn is_in_scope(&self, id: TypeId) -> bool {
        self.target
            .is_none_or(|target| self.compilation.assembly_of(id).id() == target)
    }

    /// Whether a hidden symbol should be skipped.
    #[must_use]
    pub fn excludes(&self, hidden: bool) -> bool {
        hidden && self.settings.exclude_hidden
    }

    /// Resolve a well-known type, logging when it is absent.
    #[must_use]
    pub fn well_known_type(&self, provider: &'static str, metadata_name: &str) -> Option<TypeId> {
        let id = self.compilation.get_type_by_metadata_name(metadata_name);
        if id.is_none() {
            tracing::debug!(
                provider,
                missing = metadata_name,
                "Skipping provider, well-known type not found"
            );
        }
        id
    }
}

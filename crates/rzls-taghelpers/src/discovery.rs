use rayon::prelude::*;
use rzls_conf::DiscoverySettings;
use rzls_symbols::AssemblyId;
use rzls_symbols::Compilation;

use crate::providers::default_providers;
use crate::providers::ProviderContext;
use crate::providers::TagHelperDescriptorProvider;
use crate::DiscoveryError;
use crate::TagHelperDescriptor;

/// Runs a set of providers over a compilation.
///
/// Providers are grouped by [`order`](TagHelperDescriptorProvider::order).
/// Groups run one after another; the providers inside a group run in
/// parallel and their output is appended in registration order, so the
/// result is deterministic regardless of scheduling.
#[derive(Debug)]
pub struct TagHelperDiscovery {
    providers: Vec<Box<dyn TagHelperDescriptorProvider>>,
}

impl Default for TagHelperDiscovery {
    fn default() -> Self {
        Self::new(default_providers())
    }
}

impl TagHelperDiscovery {
    #[must_use]
    pub fn new(mut providers: Vec<Box<dyn TagHelperDescriptorProvider>>) -> Self {
        providers.sort_by_key(|provider| provider.order());
        Self { providers }
    }

    #[must_use]
    pub fn providers(&self) -> &[Box<dyn TagHelperDescriptorProvider>] {
        &self.providers
    }

    /// Discover descriptors across the compilation, or only those hosted
    /// in the assembly named `target`.
    pub fn discover(
        &self,
        compilation: &Compilation,
        settings: &DiscoverySettings,
        target: Option<&str>,
    ) -> Result<Vec<TagHelperDescriptor>, DiscoveryError> {
        let target = match target {
            Some(name) => Some(
                compilation
                    .assembly_by_name(name)
                    .ok_or_else(|| DiscoveryError::UnknownAssembly {
                        name: name.to_string(),
                    })?
                    .id(),
            ),
            None => None,
        };
        self.discover_in(compilation, settings, target)
    }

    #[tracing::instrument(skip_all, fields(target = ?target))]
    pub fn discover_in(
        &self,
        compilation: &Compilation,
        settings: &DiscoverySettings,
        target: Option<AssemblyId>,
    ) -> Result<Vec<TagHelperDescriptor>, DiscoveryError> {
        let mut results: Vec<TagHelperDescriptor> = Vec::new();

        for group in self
            .providers
            .chunk_by(|a, b| a.order() == b.order())
        {
            let existing = results.as_slice();
            let outputs: Vec<Result<Vec<TagHelperDescriptor>, DiscoveryError>> = group
                .par_iter()
                .map(|provider| {
                    let mut context =
                        ProviderContext::new(compilation, settings, target).with_existing(existing);
                    provider
                        .execute(&mut context)
                        .map_err(|source| DiscoveryError::Provider {
                            provider: provider.name(),
                            source,
                        })?;
                    Ok(context.into_results())
                })
                .collect();

            let mut produced = Vec::new();
            for output in outputs {
                produced.extend(output?);
            }
            results.extend(produced);
        }

        tracing::debug!(count = results.len(), "Discovered tag helpers");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use rzls_symbols::CompilationBuilder;
    use rzls_symbols::TypeBuilder;

    use super::*;
    use crate::known;
    use crate::BuildError;
    use crate::ProviderError;
    use crate::TagHelperDescriptorBuilder;
    use crate::TagHelperKind;

    struct Recording {
        name: &'static str,
        order: i32,
        seen: Arc<Mutex<Vec<usize>>>,
    }

    impl Recording {
        fn new(name: &'static str, order: i32) -> Self {
            Self {
                name,
                order,
                seen: Arc::default(),
            }
        }
    }

    impl TagHelperDescriptorProvider for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
            self.seen.lock().unwrap().push(context.existing().len());
            let mut builder =
                TagHelperDescriptorBuilder::get_pooled_instance(TagHelperKind::Default, self.name, "App");
            builder.tag_matching_rule(|rule| {
                rule.set_tag_name(self.name);
            });
            context.add(builder.build()?);
            Ok(())
        }
    }

    struct Failing;

    impl TagHelperDescriptorProvider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn execute(&self, _context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
            Err(BuildError::MissingName {
                kind: TagHelperKind::Default,
            }
            .into())
        }
    }

    fn compilation() -> Compilation {
        CompilationBuilder::new("App")
            .with_type(TypeBuilder::class("App.Widget"))
            .build()
            .unwrap()
    }

    #[test]
    fn groups_run_in_order_and_see_earlier_output() {
        let discovery = TagHelperDiscovery::new(vec![
            Box::new(Recording::new("late", 10)),
            Box::new(Recording::new("first", 0)),
            Box::new(Recording::new("second", 0)),
        ]);
        let names: Vec<_> = discovery.providers().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["first", "second", "late"]);

        let results = discovery
            .discover(&compilation(), &DiscoverySettings::default(), None)
            .unwrap();
        let names: Vec<_> = results.iter().map(TagHelperDescriptor::name).collect();
        assert_eq!(names, ["first", "second", "late"]);
    }

    #[test]
    fn later_group_sees_lower_ordered_results() {
        let late = Recording::new("late", 10);
        let late_seen = Arc::clone(&late.seen);
        let peer = Recording::new("peer", 0);
        let peer_seen = Arc::clone(&peer.seen);
        let discovery = TagHelperDiscovery::new(vec![
            Box::new(Recording::new("a", 0)),
            Box::new(peer),
            Box::new(late),
        ]);
        let results = discovery
            .discover(&compilation(), &DiscoverySettings::default(), None)
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(*peer_seen.lock().unwrap(), [0]);
        assert_eq!(*late_seen.lock().unwrap(), [2]);
    }

    #[test]
    fn provider_failure_names_the_provider() {
        let discovery = TagHelperDiscovery::new(vec![Box::new(Failing)]);
        let error = discovery
            .discover(&compilation(), &DiscoverySettings::default(), None)
            .unwrap_err();
        assert!(matches!(
            error,
            DiscoveryError::Provider {
                provider: "failing",
                ..
            }
        ));
    }

    #[test]
    fn unknown_target_assembly_is_an_error() {
        let error = TagHelperDiscovery::default()
            .discover(&compilation(), &DiscoverySettings::default(), Some("Missing"))
            .unwrap_err();
        assert_eq!(
            error,
            DiscoveryError::UnknownAssembly {
                name: "Missing".to_string()
            }
        );
    }

    #[test]
    fn empty_compilation_yields_nothing() {
        let compilation = CompilationBuilder::new("App").build().unwrap();
        let results = TagHelperDiscovery::default()
            .discover(&compilation, &DiscoverySettings::default(), None)
            .unwrap();
        assert!(results.is_empty());
        assert!(compilation.get_type_by_metadata_name(known::ICOMPONENT).is_none());
    }
}

//! Scanners that turn a compiled unit's symbols into descriptors.
//!
//! Each provider covers one category of binding construct. Providers only
//! read the [`Compilation`] and append to their own [`ProviderContext`], so
//! providers of equal [`order`](TagHelperDescriptorProvider::order) can run
//! in parallel. A provider with a higher order sees the output of every
//! lower-ordered provider through [`ProviderContext::existing`].

mod bind;
mod component;
mod context;
mod default;
mod event_handler;
mod form_name;
mod key;
mod reference;
mod render_mode;
mod splat;
mod walker;

use std::fmt;
use std::sync::LazyLock;

pub use bind::BindTagHelperDescriptorProvider;
pub use component::ComponentTagHelperDescriptorProvider;
pub use context::ProviderContext;
pub use default::DefaultTagHelperDescriptorProvider;
pub use event_handler::EventHandlerTagHelperDescriptorProvider;
pub use form_name::FormNameTagHelperDescriptorProvider;
pub use key::KeyTagHelperDescriptorProvider;
pub use reference::RefTagHelperDescriptorProvider;
pub use render_mode::RenderModeTagHelperDescriptorProvider;
pub use splat::SplatTagHelperDescriptorProvider;

use crate::BuildError;
use crate::MetadataKey;
use crate::ProviderError;
use crate::TagHelperDescriptor;
use crate::TagHelperDescriptorBuilder;
use crate::TagHelperKind;

pub trait TagHelperDescriptorProvider: Send + Sync {
    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Providers run in ascending order; equal orders run together.
    fn order(&self) -> i32 {
        0
    }

    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError>;
}

impl fmt::Debug for dyn TagHelperDescriptorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagHelperDescriptorProvider")
            .field("name", &self.name())
            .field("order", &self.order())
            .finish()
    }
}

/// Every built-in provider, in registration order.
#[must_use]
pub fn default_providers() -> Vec<Box<dyn TagHelperDescriptorProvider>> {
    vec![
        Box::new(ComponentTagHelperDescriptorProvider),
        Box::new(BindTagHelperDescriptorProvider),
        Box::new(EventHandlerTagHelperDescriptorProvider),
        Box::new(RefTagHelperDescriptorProvider),
        Box::new(KeyTagHelperDescriptorProvider),
        Box::new(SplatTagHelperDescriptorProvider),
        Box::new(FormNameTagHelperDescriptorProvider),
        Box::new(RenderModeTagHelperDescriptorProvider),
        Box::new(DefaultTagHelperDescriptorProvider),
    ]
}

type Singleton = LazyLock<Result<TagHelperDescriptor, BuildError>>;

/// Shape of a descriptor that classifies one directive attribute.
struct DirectiveAttribute {
    kind: TagHelperKind,
    name: &'static str,
    tag_name: &'static str,
    attribute: &'static str,
    type_name: &'static str,
    property: &'static str,
    documentation: &'static str,
}

impl DirectiveAttribute {
    fn build(&self) -> Result<TagHelperDescriptor, BuildError> {
        let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
            self.kind,
            self.name,
            crate::known::COMPONENTS_ASSEMBLY,
        );
        builder
            .set_case_sensitive(true)
            .set_documentation(Some(self.documentation.to_string()));
        let metadata = builder.metadata_mut();
        metadata.set_flag(MetadataKey::ClassifyAttributesOnly, true);
        metadata.set_text(MetadataKey::RuntimeName, crate::known::runtime::NONE);

        builder.tag_matching_rule(|rule| {
            rule.set_tag_name(self.tag_name).require_attribute(|attribute| {
                attribute.set_name(self.attribute);
            });
        });
        builder.bind_attribute(|attribute| {
            attribute
                .set_name(self.attribute)
                .set_type_name(self.type_name)
                .set_property_name(self.property)
                .set_documentation(Some(self.documentation.to_string()));
        });
        builder.build()
    }
}

/// Add a memoised singleton when its host type exists, passes `accept`,
/// and belongs to this run.
fn add_singleton(
    context: &mut ProviderContext<'_>,
    provider: &'static str,
    host: &str,
    accept: impl FnOnce(&ProviderContext<'_>, rzls_symbols::TypeId) -> bool,
    singleton: &Singleton,
) -> Result<(), ProviderError> {
    let Some(id) = context.well_known_type(provider, host) else {
        return Ok(());
    };
    if !accept(context, id) {
        tracing::debug!(provider, host, "Skipping provider, host type lacks required member");
        return Ok(());
    }
    if !context.is_in_scope(id) {
        return Ok(());
    }
    context.add(Singleton::force(singleton).clone()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use rzls_conf::DiscoverySettings;
    use rzls_symbols::AssemblyBuilder;
    use rzls_symbols::Compilation;
    use rzls_symbols::CompilationBuilder;
    use rzls_symbols::MethodBuilder;
    use rzls_symbols::TypeBuilder;
    use rzls_symbols::TypeRef;

    use super::*;
    use crate::known;

    fn run(
        provider: &dyn TagHelperDescriptorProvider,
        compilation: &Compilation,
        target: Option<&str>,
    ) -> Vec<TagHelperDescriptor> {
        let settings = DiscoverySettings::default();
        let target = target
            .and_then(|name| compilation.assembly_by_name(name))
            .map(|assembly| assembly.id());
        let mut context = ProviderContext::new(compilation, &settings, target);
        provider.execute(&mut context).unwrap();
        context.into_results()
    }

    fn framework(render_tree: TypeBuilder) -> Compilation {
        CompilationBuilder::new("App")
            .reference(
                AssemblyBuilder::new(known::COMPONENTS_ASSEMBLY)
                    .with_type(TypeBuilder::interface(known::ICOMPONENT))
                    .with_type(TypeBuilder::structure(known::ELEMENT_REFERENCE))
                    .with_type(TypeBuilder::interface(known::ICOMPONENT_RENDER_MODE))
                    .with_type(render_tree),
            )
            .build()
            .unwrap()
    }

    fn singletons() -> [(&'static dyn TagHelperDescriptorProvider, &'static str, &'static str); 5] {
        [
            (&RefTagHelperDescriptorProvider, "@ref", "*"),
            (&KeyTagHelperDescriptorProvider, "@key", "*"),
            (&SplatTagHelperDescriptorProvider, "@attributes", "*"),
            (&FormNameTagHelperDescriptorProvider, "@formname", "form"),
            (&RenderModeTagHelperDescriptorProvider, "@rendermode", "*"),
        ]
    }

    #[test]
    fn directive_singletons_follow_their_host_types() {
        let void = TypeRef::named("System.Void");
        let compilation = framework(
            TypeBuilder::class(known::RENDER_TREE_BUILDER)
                .method(MethodBuilder::new(known::ADD_NAMED_EVENT, void.clone()))
                .method(MethodBuilder::new(known::ADD_MULTIPLE_ATTRIBUTES, void)),
        );

        for (provider, attribute, tag) in singletons() {
            let results = run(provider, &compilation, None);
            assert_eq!(results.len(), 1, "{}", provider.name());
            let descriptor = &results[0];
            assert_eq!(descriptor.tag_matching_rules()[0].tag_name(), tag);
            assert_eq!(descriptor.bound_attributes()[0].name(), attribute);
            assert!(descriptor.classify_attributes_only());
            assert!(descriptor.case_sensitive());

            // Memoised: a second run hands out an equal descriptor.
            assert_eq!(run(provider, &compilation, None), results);
        }
    }

    #[test]
    fn render_tree_members_gate_form_name_and_splat() {
        let compilation = framework(TypeBuilder::class(known::RENDER_TREE_BUILDER));
        assert!(run(&FormNameTagHelperDescriptorProvider, &compilation, None).is_empty());
        assert!(run(&SplatTagHelperDescriptorProvider, &compilation, None).is_empty());
        assert_eq!(run(&RefTagHelperDescriptorProvider, &compilation, None).len(), 1);
    }

    #[test]
    fn singletons_belong_to_the_framework_assembly() {
        let void = TypeRef::named("System.Void");
        let compilation = framework(
            TypeBuilder::class(known::RENDER_TREE_BUILDER)
                .method(MethodBuilder::new(known::ADD_NAMED_EVENT, void.clone()))
                .method(MethodBuilder::new(known::ADD_MULTIPLE_ATTRIBUTES, void)),
        );
        for (provider, _, _) in singletons() {
            assert!(run(provider, &compilation, Some("App")).is_empty());
            assert_eq!(
                run(provider, &compilation, Some(known::COMPONENTS_ASSEMBLY)).len(),
                1
            );
        }
    }

    #[test]
    fn missing_framework_skips_silently() {
        let compilation = CompilationBuilder::new("App").build().unwrap();
        for (provider, _, _) in singletons() {
            assert!(run(provider, &compilation, None).is_empty());
        }
    }
}

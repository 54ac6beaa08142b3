use std::sync::LazyLock;

use super::add_singleton;
use super::DirectiveAttribute;
use super::ProviderContext;
use super::Singleton;
use super::TagHelperDescriptorProvider;
use crate::known;
use crate::ProviderError;
use crate::TagHelperKind;
use crate::ELEMENT_CATCH_ALL_TARGET;

const SPLAT_ATTRIBUTE: DirectiveAttribute = DirectiveAttribute {
    kind: TagHelperKind::Splat,
    name: "Attributes",
    tag_name: ELEMENT_CATCH_ALL_TARGET,
    attribute: "@attributes",
    type_name: known::OBJECT,
    property: "Attributes",
    documentation: "Merges a collection of attributes into the current element or component.",
};

static SPLAT_TAG_HELPER: Singleton = LazyLock::new(|| SPLAT_ATTRIBUTE.build());

/// `@attributes`, available when the render tree can add attribute
/// collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplatTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for SplatTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "splat"
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        add_singleton(
            context,
            self.name(),
            known::RENDER_TREE_BUILDER,
            |context, id| {
                context
                    .compilation()
                    .find_method(id, known::ADD_MULTIPLE_ATTRIBUTES)
                    .is_some()
            },
            &SPLAT_TAG_HELPER,
        )
    }
}

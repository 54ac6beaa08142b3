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

const REF_ATTRIBUTE: DirectiveAttribute = DirectiveAttribute {
    kind: TagHelperKind::Ref,
    name: "Ref",
    tag_name: ELEMENT_CATCH_ALL_TARGET,
    attribute: "@ref",
    type_name: known::OBJECT,
    property: "Ref",
    documentation: "Populates the specified field or property with a reference to the element or component.",
};

static REF_TAG_HELPER: Singleton = LazyLock::new(|| REF_ATTRIBUTE.build());

/// `@ref` on any element or component.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for RefTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "ref"
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        add_singleton(
            context,
            self.name(),
            known::ELEMENT_REFERENCE,
            |_, _| true,
            &REF_TAG_HELPER,
        )
    }
}

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

const KEY_ATTRIBUTE: DirectiveAttribute = DirectiveAttribute {
    kind: TagHelperKind::Key,
    name: "Key",
    tag_name: ELEMENT_CATCH_ALL_TARGET,
    attribute: "@key",
    type_name: known::OBJECT,
    property: "Key",
    documentation: "Ensures that the component or element will be preserved across renders if (and only if) the supplied key value matches.",
};

static KEY_TAG_HELPER: Singleton = LazyLock::new(|| KEY_ATTRIBUTE.build());

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for KeyTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "key"
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        add_singleton(
            context,
            self.name(),
            known::ICOMPONENT,
            |_, _| true,
            &KEY_TAG_HELPER,
        )
    }
}

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

// Provisional shape: one attribute on any tag, typed with the render mode
// interface itself.
const RENDER_MODE_ATTRIBUTE: DirectiveAttribute = DirectiveAttribute {
    kind: TagHelperKind::RenderMode,
    name: "RenderMode",
    tag_name: ELEMENT_CATCH_ALL_TARGET,
    attribute: "@rendermode",
    type_name: known::ICOMPONENT_RENDER_MODE,
    property: "RenderMode",
    documentation: "Specifies the render mode for a component.",
};

static RENDER_MODE_TAG_HELPER: Singleton = LazyLock::new(|| RENDER_MODE_ATTRIBUTE.build());

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderModeTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for RenderModeTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "render-mode"
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        add_singleton(
            context,
            self.name(),
            known::ICOMPONENT_RENDER_MODE,
            |_, _| true,
            &RENDER_MODE_TAG_HELPER,
        )
    }
}

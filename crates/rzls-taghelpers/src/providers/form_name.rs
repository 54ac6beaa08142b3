use std::sync::LazyLock;

use super::add_singleton;
use super::DirectiveAttribute;
use super::ProviderContext;
use super::Singleton;
use super::TagHelperDescriptorProvider;
use crate::known;
use crate::ProviderError;
use crate::TagHelperKind;

const FORM_NAME_ATTRIBUTE: DirectiveAttribute = DirectiveAttribute {
    kind: TagHelperKind::FormName,
    name: "FormName",
    tag_name: "form",
    attribute: "@formname",
    type_name: known::STRING,
    property: "FormName",
    documentation: "Names the form so that posted data is dispatched to the matching handler.",
};

static FORM_NAME_TAG_HELPER: Singleton = LazyLock::new(|| FORM_NAME_ATTRIBUTE.build());

/// `@formname` on `<form>`, available when the render tree supports named
/// events.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormNameTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for FormNameTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "form-name"
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
                    .find_method(id, known::ADD_NAMED_EVENT)
                    .is_some()
            },
            &FORM_NAME_TAG_HELPER,
        )
    }
}

use serde::Serialize;

use crate::known;
use crate::names::name_starts_with;
use crate::names::names_equal;
use crate::Metadata;
use crate::MetadataKey;
use crate::TagHelperDiagnostic;
use crate::TagHelperKind;

/// A colon-suffixed sub-attribute such as `:format` or `:preventDefault`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BoundAttributeParameterDescriptor {
    pub(crate) kind: TagHelperKind,
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) is_enum: bool,
    pub(crate) documentation: Option<String>,
    pub(crate) display_name: String,
    pub(crate) case_sensitive: bool,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub(crate) metadata: Metadata,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) diagnostics: Vec<TagHelperDiagnostic>,
}

impl BoundAttributeParameterDescriptor {
    #[must_use]
    pub fn kind(&self) -> TagHelperKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.is_enum
    }

    #[must_use]
    pub fn is_boolean_property(&self) -> bool {
        self.type_name == known::BOOLEAN
    }

    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[TagHelperDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.metadata.text(MetadataKey::PropertyName)
    }

    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        names_equal(name, &self.name, self.case_sensitive)
    }
}

/// One settable surface of a matched tag: a property, a directive or a
/// dictionary-prefixed attribute family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BoundAttributeDescriptor {
    pub(crate) kind: TagHelperKind,
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) is_enum: bool,
    pub(crate) is_editor_required: bool,
    pub(crate) indexer_name_prefix: Option<String>,
    pub(crate) indexer_type_name: Option<String>,
    pub(crate) is_directive_attribute: bool,
    pub(crate) documentation: Option<String>,
    pub(crate) display_name: String,
    pub(crate) case_sensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) parameters: Vec<BoundAttributeParameterDescriptor>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub(crate) metadata: Metadata,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) diagnostics: Vec<TagHelperDiagnostic>,
}

impl BoundAttributeDescriptor {
    #[must_use]
    pub fn kind(&self) -> TagHelperKind {
        self.kind
    }

    /// Empty for an attribute reachable only through its indexer prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.is_enum
    }

    #[must_use]
    pub fn is_editor_required(&self) -> bool {
        self.is_editor_required
    }

    #[must_use]
    pub fn is_boolean_property(&self) -> bool {
        self.type_name == known::BOOLEAN
    }

    #[must_use]
    pub fn indexer_name_prefix(&self) -> Option<&str> {
        self.indexer_name_prefix.as_deref()
    }

    #[must_use]
    pub fn indexer_type_name(&self) -> Option<&str> {
        self.indexer_type_name.as_deref()
    }

    #[must_use]
    pub fn has_indexer(&self) -> bool {
        self.indexer_name_prefix.is_some()
    }

    #[must_use]
    pub fn is_indexer_only(&self) -> bool {
        self.name.is_empty() && self.has_indexer()
    }

    #[must_use]
    pub fn is_directive_attribute(&self) -> bool {
        self.is_directive_attribute
    }

    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    #[must_use]
    pub fn parameters(&self) -> &[BoundAttributeParameterDescriptor] {
        &self.parameters
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[TagHelperDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
            || self
                .parameters
                .iter()
                .any(|parameter| !parameter.diagnostics.is_empty())
    }

    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.metadata.text(MetadataKey::PropertyName)
    }

    #[must_use]
    pub fn is_weakly_typed(&self) -> bool {
        self.metadata.flag(MetadataKey::WeaklyTyped)
    }

    #[must_use]
    pub fn is_child_content_property(&self) -> bool {
        self.metadata.flag(MetadataKey::ChildContent)
    }

    /// `RenderFragment<T>` rather than plain `RenderFragment`.
    #[must_use]
    pub fn is_parameterized_child_content_property(&self) -> bool {
        self.is_child_content_property() && self.type_name != known::RENDER_FRAGMENT
    }

    #[must_use]
    pub fn is_child_content_parameter_name_property(&self) -> bool {
        self.metadata.flag(MetadataKey::ChildContentParameterName)
    }

    #[must_use]
    pub fn is_delegate_property(&self) -> bool {
        self.metadata.flag(MetadataKey::DelegateSignature)
    }

    #[must_use]
    pub fn is_delegate_with_awaitable_result(&self) -> bool {
        self.metadata.flag(MetadataKey::DelegateWithAwaitableResult)
    }

    #[must_use]
    pub fn is_event_callback_property(&self) -> bool {
        self.metadata.flag(MetadataKey::EventCallback)
    }

    #[must_use]
    pub fn is_generic_typed_property(&self) -> bool {
        self.metadata.flag(MetadataKey::GenericTyped)
    }

    #[must_use]
    pub fn is_type_parameter_property(&self) -> bool {
        self.metadata.flag(MetadataKey::TypeParameter)
    }

    #[must_use]
    pub fn is_cascading_type_parameter_property(&self) -> bool {
        self.metadata.flag(MetadataKey::TypeParameterIsCascading)
    }

    /// Exact name match; never true for indexer-only attributes.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        !self.name.is_empty() && names_equal(name, &self.name, self.case_sensitive)
    }

    /// Dictionary fan-out: `prefix-key` binds to the `prefix-` indexer.
    #[must_use]
    pub fn matches_indexer(&self, name: &str) -> bool {
        self.indexer_name_prefix.as_deref().is_some_and(|prefix| {
            name.len() > prefix.len() && name_starts_with(name, prefix, self.case_sensitive)
        })
    }

    #[must_use]
    pub fn find_parameter(&self, name: &str) -> Option<&BoundAttributeParameterDescriptor> {
        self.parameters
            .iter()
            .find(|parameter| parameter.matches_name(name))
    }
}

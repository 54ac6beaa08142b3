use serde::Serialize;

use crate::BoundAttributeDescriptor;
use crate::Metadata;
use crate::MetadataKey;
use crate::TagHelperDiagnostic;
use crate::TagMatchingRule;

/// The category of binding construct a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TagHelperKind {
    Component,
    ChildContent,
    Bind,
    EventHandler,
    Ref,
    Key,
    Splat,
    FormName,
    RenderMode,
    Default,
}

impl TagHelperKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TagHelperKind::Component => "Components.Component",
            TagHelperKind::ChildContent => "Components.ChildContent",
            TagHelperKind::Bind => "Components.Bind",
            TagHelperKind::EventHandler => "Components.EventHandler",
            TagHelperKind::Ref => "Components.Ref",
            TagHelperKind::Key => "Components.Key",
            TagHelperKind::Splat => "Components.Splat",
            TagHelperKind::FormName => "Components.FormName",
            TagHelperKind::RenderMode => "Components.RenderMode",
            TagHelperKind::Default => "ITagHelper",
        }
    }

    /// Kinds that only classify directive attributes and never own a tag.
    #[must_use]
    pub fn is_directive_attribute_kind(self) -> bool {
        matches!(
            self,
            TagHelperKind::Bind
                | TagHelperKind::EventHandler
                | TagHelperKind::Ref
                | TagHelperKind::Key
                | TagHelperKind::Splat
                | TagHelperKind::FormName
                | TagHelperKind::RenderMode
        )
    }
}

impl std::fmt::Display for TagHelperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AllowedChildTag {
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) diagnostics: Vec<TagHelperDiagnostic>,
}

impl AllowedChildTag {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[TagHelperDiagnostic] {
        &self.diagnostics
    }
}

/// An immutable, matchable markup-binding construct.
///
/// Equality and hashing are structural over every field, so two discovery
/// runs over the same symbols produce equal descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagHelperDescriptor {
    pub(crate) kind: TagHelperKind,
    pub(crate) name: String,
    pub(crate) assembly_name: String,
    pub(crate) display_name: String,
    pub(crate) documentation: Option<String>,
    pub(crate) case_sensitive: bool,
    pub(crate) tag_matching_rules: Vec<TagMatchingRule>,
    pub(crate) bound_attributes: Vec<BoundAttributeDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) allowed_child_tags: Vec<AllowedChildTag>,
    pub(crate) tag_output_hint: Option<String>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub(crate) metadata: Metadata,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) diagnostics: Vec<TagHelperDiagnostic>,
}

impl TagHelperDescriptor {
    #[must_use]
    pub fn kind(&self) -> TagHelperKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    #[must_use]
    pub fn tag_matching_rules(&self) -> &[TagMatchingRule] {
        &self.tag_matching_rules
    }

    #[must_use]
    pub fn bound_attributes(&self) -> &[BoundAttributeDescriptor] {
        &self.bound_attributes
    }

    #[must_use]
    pub fn allowed_child_tags(&self) -> &[AllowedChildTag] {
        &self.allowed_child_tags
    }

    #[must_use]
    pub fn tag_output_hint(&self) -> Option<&str> {
        self.tag_output_hint.as_deref()
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[TagHelperDiagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of the descriptor and everything it owns.
    #[must_use]
    pub fn all_diagnostics(&self) -> Vec<&TagHelperDiagnostic> {
        let rules = self.tag_matching_rules.iter().flat_map(|rule| {
            rule.diagnostics().iter().chain(
                rule.required_attributes()
                    .iter()
                    .flat_map(|attribute| attribute.diagnostics()),
            )
        });
        let attributes = self.bound_attributes.iter().flat_map(|attribute| {
            attribute.diagnostics().iter().chain(
                attribute
                    .parameters()
                    .iter()
                    .flat_map(|parameter| parameter.diagnostics()),
            )
        });
        let children = self
            .allowed_child_tags
            .iter()
            .flat_map(AllowedChildTag::diagnostics);
        self.diagnostics
            .iter()
            .chain(rules)
            .chain(attributes)
            .chain(children)
            .collect()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.all_diagnostics().is_empty()
    }

    /// Metadata name of the type this descriptor was built from.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.metadata.text(MetadataKey::TypeName)
    }

    #[must_use]
    pub fn is_component(&self) -> bool {
        self.kind == TagHelperKind::Component
    }

    #[must_use]
    pub fn is_child_content(&self) -> bool {
        self.kind == TagHelperKind::ChildContent
    }

    /// The variant matching `<Ns.Type>` rather than `<Type>`.
    #[must_use]
    pub fn is_fully_qualified_name_match(&self) -> bool {
        self.metadata.flag(MetadataKey::FullyQualifiedNameMatch)
    }

    #[must_use]
    pub fn is_generic_typed(&self) -> bool {
        self.metadata.flag(MetadataKey::GenericTyped)
    }

    /// Matches attributes only; the element itself stays ordinary markup.
    #[must_use]
    pub fn classify_attributes_only(&self) -> bool {
        self.metadata.flag(MetadataKey::ClassifyAttributesOnly)
    }

    #[must_use]
    pub fn is_fallback_bind(&self) -> bool {
        self.kind == TagHelperKind::Bind && self.metadata.flag(MetadataKey::BindFallback)
    }

    #[must_use]
    pub fn bind_value_attribute(&self) -> Option<&str> {
        self.metadata.text(MetadataKey::BindValueAttribute)
    }

    #[must_use]
    pub fn bind_change_attribute(&self) -> Option<&str> {
        self.metadata.text(MetadataKey::BindChangeAttribute)
    }

    #[must_use]
    pub fn bind_expression_attribute(&self) -> Option<&str> {
        self.metadata.text(MetadataKey::BindExpressionAttribute)
    }

    #[must_use]
    pub fn bind_type_attribute(&self) -> Option<&str> {
        self.metadata.text(MetadataKey::BindTypeAttribute)
    }

    pub(crate) fn clear_documentation(&mut self) {
        self.documentation = None;
        for attribute in &mut self.bound_attributes {
            attribute.documentation = None;
            for parameter in &mut attribute.parameters {
                parameter.documentation = None;
            }
        }
    }

    #[must_use]
    pub fn find_bound_attribute(&self, name: &str) -> Option<&BoundAttributeDescriptor> {
        self.bound_attributes
            .iter()
            .find(|attribute| attribute.matches_name(name))
    }
}

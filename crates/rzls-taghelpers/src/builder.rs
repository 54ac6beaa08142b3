use rustc_hash::FxHashSet;

use crate::names::invalid_attribute_character;
use crate::names::validate_tag_name;
use crate::AllowedChildTag;
use crate::BoundAttributeDescriptor;
use crate::BoundAttributeParameterDescriptor;
use crate::BuildError;
use crate::Metadata;
use crate::MetadataKey;
use crate::NameComparison;
use crate::RequiredAttributeDescriptor;
use crate::TagHelperDescriptor;
use crate::TagHelperDiagnostic;
use crate::TagHelperKind;
use crate::TagMatchingRule;
use crate::TagStructure;
use crate::ValueComparison;

/// Mutable scratch state for one descriptor.
///
/// Obtain one with [`TagHelperDescriptorBuilder::get_pooled_instance`]; the
/// returned guard hands the builder back to its pool when built or dropped.
#[derive(Debug)]
pub struct TagHelperDescriptorBuilder {
    kind: TagHelperKind,
    name: String,
    assembly_name: String,
    display_name: Option<String>,
    documentation: Option<String>,
    case_sensitive: bool,
    tag_output_hint: Option<String>,
    rules: Vec<TagMatchingRuleBuilder>,
    attributes: Vec<BoundAttributeBuilder>,
    allowed_child_tags: Vec<String>,
    metadata: Metadata,
    diagnostics: Vec<TagHelperDiagnostic>,
}

impl TagHelperDescriptorBuilder {
    pub(crate) fn empty() -> Self {
        Self {
            kind: TagHelperKind::Default,
            name: String::new(),
            assembly_name: String::new(),
            display_name: None,
            documentation: None,
            case_sensitive: false,
            tag_output_hint: None,
            rules: Vec::new(),
            attributes: Vec::new(),
            allowed_child_tags: Vec::new(),
            metadata: Metadata::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Clear every field, keeping allocated capacity.
    pub(crate) fn reset(&mut self, kind: TagHelperKind, name: String, assembly_name: String) {
        self.kind = kind;
        self.name = name;
        self.assembly_name = assembly_name;
        self.display_name = None;
        self.documentation = None;
        self.case_sensitive = false;
        self.tag_output_hint = None;
        self.rules.clear();
        self.attributes.clear();
        self.allowed_child_tags.clear();
        self.metadata.clear();
        self.diagnostics.clear();
    }

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

    pub fn set_display_name(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn set_documentation(&mut self, documentation: Option<String>) -> &mut Self {
        self.documentation = documentation;
        self
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> &mut Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn set_tag_output_hint(&mut self, hint: impl Into<String>) -> &mut Self {
        self.tag_output_hint = Some(hint.into());
        self
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn add_diagnostic(&mut self, diagnostic: TagHelperDiagnostic) -> &mut Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub fn allow_child_tag(&mut self, name: impl Into<String>) -> &mut Self {
        self.allowed_child_tags.push(name.into());
        self
    }

    pub fn tag_matching_rule(&mut self, configure: impl FnOnce(&mut TagMatchingRuleBuilder)) -> &mut Self {
        let mut rule = TagMatchingRuleBuilder::default();
        configure(&mut rule);
        self.rules.push(rule);
        self
    }

    pub fn bind_attribute(&mut self, configure: impl FnOnce(&mut BoundAttributeBuilder)) -> &mut Self {
        let mut attribute = BoundAttributeBuilder::new(self.kind);
        configure(&mut attribute);
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn bound_attributes(&self) -> &[BoundAttributeBuilder] {
        &self.attributes
    }

    /// Freeze the accumulated state, leaving the builder empty.
    ///
    /// Bound attributes are deduplicated by name, first wins; all other
    /// collections keep insertion order.
    pub(crate) fn build(&mut self) -> Result<TagHelperDescriptor, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::MissingName { kind: self.kind });
        }
        if self.assembly_name.trim().is_empty() {
            return Err(BuildError::MissingAssemblyName {
                name: self.name.clone(),
            });
        }

        let case_sensitive = self.case_sensitive;
        let rules = self
            .rules
            .drain(..)
            .map(|rule| rule.build(case_sensitive))
            .collect();

        let mut seen = FxHashSet::default();
        let mut bound_attributes = Vec::with_capacity(self.attributes.len());
        for attribute in self.attributes.drain(..) {
            let key = match (&attribute.name, &attribute.indexer_name_prefix) {
                (name, _) if !name.is_empty() => name.clone(),
                (_, Some(prefix)) => format!("{prefix}*"),
                (_, None) => {
                    return Err(BuildError::UnnamedBoundAttribute {
                        descriptor: self.name.clone(),
                    })
                }
            };
            if !seen.insert(key) {
                continue;
            }
            bound_attributes.push(attribute.build(&self.name, case_sensitive)?);
        }

        let allowed_child_tags = self
            .allowed_child_tags
            .drain(..)
            .map(|name| {
                let diagnostics = match validate_tag_name(&name, false) {
                    Ok(()) => Vec::new(),
                    Err(character) => vec![TagHelperDiagnostic::InvalidRestrictedChild {
                        name: name.clone(),
                        character,
                    }],
                };
                AllowedChildTag { name, diagnostics }
            })
            .collect();

        let name = std::mem::take(&mut self.name);
        Ok(TagHelperDescriptor {
            kind: self.kind,
            display_name: self.display_name.take().unwrap_or_else(|| name.clone()),
            name,
            assembly_name: std::mem::take(&mut self.assembly_name),
            documentation: self.documentation.take(),
            case_sensitive,
            tag_matching_rules: rules,
            bound_attributes,
            allowed_child_tags,
            tag_output_hint: self.tag_output_hint.take(),
            metadata: std::mem::take(&mut self.metadata),
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }
}

#[derive(Debug, Default)]
pub struct TagMatchingRuleBuilder {
    tag_name: String,
    parent_tag: Option<String>,
    tag_structure: TagStructure,
    attributes: Vec<RequiredAttributeBuilder>,
    diagnostics: Vec<TagHelperDiagnostic>,
}

impl TagMatchingRuleBuilder {
    pub fn set_tag_name(&mut self, tag_name: impl Into<String>) -> &mut Self {
        self.tag_name = tag_name.into();
        self
    }

    pub fn set_parent_tag(&mut self, parent_tag: Option<String>) -> &mut Self {
        self.parent_tag = parent_tag;
        self
    }

    pub fn set_tag_structure(&mut self, tag_structure: TagStructure) -> &mut Self {
        self.tag_structure = tag_structure;
        self
    }

    pub fn add_diagnostic(&mut self, diagnostic: TagHelperDiagnostic) -> &mut Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub fn require_attribute(&mut self, configure: impl FnOnce(&mut RequiredAttributeBuilder)) -> &mut Self {
        let mut attribute = RequiredAttributeBuilder::default();
        configure(&mut attribute);
        self.attributes.push(attribute);
        self
    }

    pub(crate) fn push_required_attribute(&mut self, attribute: RequiredAttributeBuilder) {
        self.attributes.push(attribute);
    }

    fn build(self, case_sensitive: bool) -> TagMatchingRule {
        let mut diagnostics = self.diagnostics;
        if let Err(character) = validate_tag_name(&self.tag_name, true) {
            diagnostics.push(TagHelperDiagnostic::InvalidTagName {
                name: self.tag_name.clone(),
                character,
            });
        }
        if let Some(parent) = &self.parent_tag {
            if let Err(character) = validate_tag_name(parent, false) {
                diagnostics.push(TagHelperDiagnostic::InvalidParentTagName {
                    name: parent.clone(),
                    character,
                });
            }
        }

        TagMatchingRule {
            tag_name: self.tag_name,
            parent_tag: self.parent_tag,
            tag_structure: self.tag_structure,
            required_attributes: self
                .attributes
                .into_iter()
                .map(|attribute| attribute.build(case_sensitive))
                .collect(),
            case_sensitive,
            diagnostics,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequiredAttributeBuilder {
    name: String,
    name_comparison: NameComparison,
    value: Option<String>,
    value_comparison: ValueComparison,
    diagnostics: Vec<TagHelperDiagnostic>,
}

impl RequiredAttributeBuilder {
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_name_comparison(&mut self, comparison: NameComparison) -> &mut Self {
        self.name_comparison = comparison;
        self
    }

    /// Require a value; `comparison` must not be [`ValueComparison::None`].
    pub fn set_value(&mut self, value: impl Into<String>, comparison: ValueComparison) -> &mut Self {
        self.value = Some(value.into());
        self.value_comparison = comparison;
        self
    }

    pub fn add_diagnostic(&mut self, diagnostic: TagHelperDiagnostic) -> &mut Self {
        self.diagnostics.push(diagnostic);
        self
    }

    fn build(self, case_sensitive: bool) -> RequiredAttributeDescriptor {
        let is_directive_attribute = self.name.starts_with('@');
        let mut diagnostics = self.diagnostics;
        if self.name.trim().is_empty() {
            diagnostics.push(TagHelperDiagnostic::EmptyRequiredAttributeName);
        } else if let Some(character) = invalid_attribute_character(&self.name, is_directive_attribute) {
            diagnostics.push(TagHelperDiagnostic::InvalidRequiredAttributeName {
                name: self.name.clone(),
                character,
            });
        }

        let display_name = match (&self.value, self.value_comparison) {
            (Some(value), ValueComparison::PrefixMatch) => format!("[{}^={value}]", self.name),
            (Some(value), ValueComparison::SuffixMatch) => format!("[{}$={value}]", self.name),
            (Some(value), _) => format!("[{}={value}]", self.name),
            (None, _) if self.name_comparison == NameComparison::PrefixMatch => {
                format!("{}*", self.name)
            }
            (None, _) => self.name.clone(),
        };

        RequiredAttributeDescriptor {
            name: self.name,
            name_comparison: self.name_comparison,
            value_comparison: if self.value.is_some() {
                self.value_comparison
            } else {
                ValueComparison::None
            },
            value: self.value,
            case_sensitive,
            is_directive_attribute,
            display_name,
            diagnostics,
        }
    }
}

#[derive(Debug)]
pub struct BoundAttributeBuilder {
    kind: TagHelperKind,
    name: String,
    type_name: String,
    is_enum: bool,
    is_editor_required: bool,
    indexer_name_prefix: Option<String>,
    indexer_type_name: Option<String>,
    documentation: Option<String>,
    display_name: Option<String>,
    parameters: Vec<BoundAttributeParameterBuilder>,
    metadata: Metadata,
    diagnostics: Vec<TagHelperDiagnostic>,
}

impl BoundAttributeBuilder {
    fn new(kind: TagHelperKind) -> Self {
        Self {
            kind,
            name: String::new(),
            type_name: String::new(),
            is_enum: false,
            is_editor_required: false,
            indexer_name_prefix: None,
            indexer_type_name: None,
            documentation: None,
            display_name: None,
            parameters: Vec::new(),
            metadata: Metadata::default(),
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.type_name = type_name.into();
        self
    }

    pub fn set_is_enum(&mut self, is_enum: bool) -> &mut Self {
        self.is_enum = is_enum;
        self
    }

    pub fn set_is_editor_required(&mut self, required: bool) -> &mut Self {
        self.is_editor_required = required;
        self
    }

    /// Accept `prefix-key` attributes as entries of a dictionary whose values
    /// have type `value_type_name`.
    pub fn as_dictionary(&mut self, prefix: impl Into<String>, value_type_name: impl Into<String>) -> &mut Self {
        self.indexer_name_prefix = Some(prefix.into());
        self.indexer_type_name = Some(value_type_name.into());
        self
    }

    pub fn set_documentation(&mut self, documentation: Option<String>) -> &mut Self {
        self.documentation = documentation;
        self
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn set_property_name(&mut self, property_name: impl Into<String>) -> &mut Self {
        self.metadata.set_text(MetadataKey::PropertyName, property_name);
        self
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn add_diagnostic(&mut self, diagnostic: TagHelperDiagnostic) -> &mut Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub fn bind_attribute_parameter(
        &mut self,
        configure: impl FnOnce(&mut BoundAttributeParameterBuilder),
    ) -> &mut Self {
        let mut parameter = BoundAttributeParameterBuilder::default();
        configure(&mut parameter);
        self.parameters.push(parameter);
        self
    }

    fn build(self, owner: &str, case_sensitive: bool) -> Result<BoundAttributeDescriptor, BuildError> {
        let is_directive_attribute = self.name.starts_with('@')
            || self
                .indexer_name_prefix
                .as_deref()
                .is_some_and(|prefix| prefix.starts_with('@'));

        let mut diagnostics = self.diagnostics;
        if !self.name.is_empty() {
            if let Some(character) = invalid_attribute_character(&self.name, is_directive_attribute) {
                diagnostics.push(TagHelperDiagnostic::InvalidBoundAttributeName {
                    owner: owner.to_string(),
                    name: self.name.clone(),
                    character,
                });
            } else if self.kind == TagHelperKind::Default
                && self.name.to_ascii_lowercase().starts_with("data-")
            {
                diagnostics.push(TagHelperDiagnostic::BoundAttributeNameStartsWithData {
                    owner: owner.to_string(),
                    name: self.name.clone(),
                });
            }
        }
        if let Some(prefix) = &self.indexer_name_prefix {
            if let Some(character) = invalid_attribute_character(prefix, is_directive_attribute) {
                diagnostics.push(TagHelperDiagnostic::InvalidBoundAttributePrefix {
                    owner: owner.to_string(),
                    prefix: prefix.clone(),
                    character,
                });
            }
        }

        let attribute_name = if self.name.is_empty() {
            self.indexer_name_prefix.clone().unwrap_or_default()
        } else {
            self.name.clone()
        };

        let mut seen = FxHashSet::default();
        let mut parameters = Vec::with_capacity(self.parameters.len());
        for parameter in self.parameters {
            if parameter.name.trim().is_empty() {
                return Err(BuildError::UnnamedParameter {
                    descriptor: owner.to_string(),
                    attribute: attribute_name,
                });
            }
            if seen.insert(parameter.name.clone()) {
                parameters.push(parameter.build(self.kind, &attribute_name, case_sensitive));
            }
        }

        let display_name = self.display_name.unwrap_or_else(|| {
            match self.metadata.text(MetadataKey::PropertyName) {
                Some(property) => format!("{} {owner}.{property}", self.type_name),
                None => format!("{} {attribute_name}", self.type_name),
            }
        });

        Ok(BoundAttributeDescriptor {
            kind: self.kind,
            name: self.name,
            type_name: self.type_name,
            is_enum: self.is_enum,
            is_editor_required: self.is_editor_required,
            indexer_name_prefix: self.indexer_name_prefix,
            indexer_type_name: self.indexer_type_name,
            is_directive_attribute,
            documentation: self.documentation,
            display_name,
            case_sensitive,
            parameters,
            metadata: self.metadata,
            diagnostics,
        })
    }
}

#[derive(Debug, Default)]
pub struct BoundAttributeParameterBuilder {
    name: String,
    type_name: String,
    is_enum: bool,
    documentation: Option<String>,
    metadata: Metadata,
}

impl BoundAttributeParameterBuilder {
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.type_name = type_name.into();
        self
    }

    pub fn set_is_enum(&mut self, is_enum: bool) -> &mut Self {
        self.is_enum = is_enum;
        self
    }

    pub fn set_documentation(&mut self, documentation: impl Into<String>) -> &mut Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn set_property_name(&mut self, property_name: impl Into<String>) -> &mut Self {
        self.metadata.set_text(MetadataKey::PropertyName, property_name);
        self
    }

    fn build(self, kind: TagHelperKind, attribute_name: &str, case_sensitive: bool) -> BoundAttributeParameterDescriptor {
        BoundAttributeParameterDescriptor {
            kind,
            display_name: format!("{} {attribute_name}:{}", self.type_name, self.name),
            name: self.name,
            type_name: self.type_name,
            is_enum: self.is_enum,
            documentation: self.documentation,
            case_sensitive,
            metadata: self.metadata,
            diagnostics: Vec::new(),
        }
    }
}

use serde::Serialize;

use crate::names::name_starts_with;
use crate::names::names_equal;
use crate::TagHelperDiagnostic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TagStructure {
    #[default]
    Unspecified,
    NormalOrSelfClosing,
    WithoutEndTag,
}

impl TagStructure {
    /// Decode the integral value of a `TagStructure` enum constant.
    #[must_use]
    pub fn from_value(value: i64) -> Self {
        match value {
            1 => TagStructure::NormalOrSelfClosing,
            2 => TagStructure::WithoutEndTag,
            _ => TagStructure::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum NameComparison {
    #[default]
    FullMatch,
    PrefixMatch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ValueComparison {
    #[default]
    None,
    FullMatch,
    PrefixMatch,
    SuffixMatch,
}

/// An attribute a tag must carry for a rule to apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequiredAttributeDescriptor {
    pub(crate) name: String,
    pub(crate) name_comparison: NameComparison,
    pub(crate) value: Option<String>,
    pub(crate) value_comparison: ValueComparison,
    pub(crate) case_sensitive: bool,
    pub(crate) is_directive_attribute: bool,
    pub(crate) display_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) diagnostics: Vec<TagHelperDiagnostic>,
}

impl RequiredAttributeDescriptor {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn name_comparison(&self) -> NameComparison {
        self.name_comparison
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn value_comparison(&self) -> ValueComparison {
        self.value_comparison
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    #[must_use]
    pub fn is_directive_attribute(&self) -> bool {
        self.is_directive_attribute
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[TagHelperDiagnostic] {
        &self.diagnostics
    }

    /// Whether an attribute name satisfies this requirement.
    ///
    /// A directive attribute written with a parameter (`@onclick:preventDefault`)
    /// satisfies a full-match requirement on its base name (`@onclick`).
    #[must_use]
    pub fn matches_name(&self, attribute_name: &str) -> bool {
        match self.name_comparison {
            NameComparison::FullMatch => {
                if names_equal(attribute_name, &self.name, self.case_sensitive) {
                    return true;
                }
                self.is_directive_attribute
                    && attribute_name
                        .split_once(':')
                        .is_some_and(|(base, _)| names_equal(base, &self.name, self.case_sensitive))
            }
            NameComparison::PrefixMatch => {
                attribute_name.len() > self.name.len()
                    && name_starts_with(attribute_name, &self.name, self.case_sensitive)
            }
        }
    }

    /// Attribute values always compare ordinally.
    #[must_use]
    pub fn matches_value(&self, attribute_value: &str) -> bool {
        let Some(value) = self.value.as_deref() else {
            return self.value_comparison == ValueComparison::None;
        };
        match self.value_comparison {
            ValueComparison::None => true,
            ValueComparison::FullMatch => attribute_value == value,
            ValueComparison::PrefixMatch => attribute_value.starts_with(value),
            ValueComparison::SuffixMatch => attribute_value.ends_with(value),
        }
    }

    #[must_use]
    pub fn is_satisfied_by(&self, attribute_name: &str, attribute_value: &str) -> bool {
        self.matches_name(attribute_name) && self.matches_value(attribute_value)
    }

    /// Weight of this requirement when ranking competing rules.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        let name = match self.name_comparison {
            NameComparison::FullMatch => 10,
            NameComparison::PrefixMatch => 8,
        };
        let value = match self.value_comparison {
            ValueComparison::None => 0,
            ValueComparison::FullMatch => 5,
            ValueComparison::PrefixMatch | ValueComparison::SuffixMatch => 3,
        };
        name + value
    }
}

/// A predicate over a tag name, its parent and its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagMatchingRule {
    pub(crate) tag_name: String,
    pub(crate) parent_tag: Option<String>,
    pub(crate) tag_structure: TagStructure,
    pub(crate) required_attributes: Vec<RequiredAttributeDescriptor>,
    pub(crate) case_sensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) diagnostics: Vec<TagHelperDiagnostic>,
}

pub const ELEMENT_CATCH_ALL_TARGET: &str = "*";

impl TagMatchingRule {
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    #[must_use]
    pub fn parent_tag(&self) -> Option<&str> {
        self.parent_tag.as_deref()
    }

    #[must_use]
    pub fn tag_structure(&self) -> TagStructure {
        self.tag_structure
    }

    #[must_use]
    pub fn required_attributes(&self) -> &[RequiredAttributeDescriptor] {
        &self.required_attributes
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[TagHelperDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.tag_name == ELEMENT_CATCH_ALL_TARGET
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
            || self
                .required_attributes
                .iter()
                .any(|attribute| !attribute.diagnostics.is_empty())
    }

    #[must_use]
    pub fn matches_tag_name(&self, tag_name: &str) -> bool {
        self.is_catch_all() || names_equal(tag_name, &self.tag_name, self.case_sensitive)
    }

    #[must_use]
    pub fn matches_parent(&self, parent_tag: Option<&str>) -> bool {
        match (&self.parent_tag, parent_tag) {
            (None, _) => true,
            (Some(expected), Some(actual)) => names_equal(actual, expected, self.case_sensitive),
            (Some(_), None) => false,
        }
    }

    /// Every required attribute must be satisfied by some attribute.
    #[must_use]
    pub fn matches_attributes(&self, attributes: &[(String, String)]) -> bool {
        self.required_attributes.iter().all(|required| {
            attributes
                .iter()
                .any(|(name, value)| required.is_satisfied_by(name, value))
        })
    }

    #[must_use]
    pub fn matches(
        &self,
        tag_name: &str,
        parent_tag: Option<&str>,
        attributes: &[(String, String)],
    ) -> bool {
        self.matches_tag_name(tag_name)
            && self.matches_parent(parent_tag)
            && self.matches_attributes(attributes)
    }

    /// Higher is more specific: an explicit tag name outranks any number of
    /// attribute requirements on the catch-all.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        let tag = if self.is_catch_all() { 0 } else { 1000 };
        let parent = if self.parent_tag.is_some() { 100 } else { 0 };
        let attributes: u32 = self
            .required_attributes
            .iter()
            .map(RequiredAttributeDescriptor::specificity)
            .sum();
        tag + parent + attributes
    }
}

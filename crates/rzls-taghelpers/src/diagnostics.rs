use serde::Serialize;
use thiserror::Error;

/// A recoverable modelling problem found while building a descriptor.
///
/// Diagnostics travel with the descriptor that produced them; the descriptor
/// is still emitted so tooling can report the problem at the right place.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind")]
pub enum TagHelperDiagnostic {
    #[error("Invalid tag helper bound property '{type_name}.{property}': a dictionary attribute prefix requires a property of type IDictionary<string, TValue>")]
    DictionaryPrefixOnNonDictionary { type_name: String, property: String },

    #[error("Invalid tag helper bound property '{type_name}.{property}': an explicit attribute name requires a public setter")]
    NameOnNonSettableProperty { type_name: String, property: String },

    #[error("Invalid tag helper bound property '{type_name}.{property}': a dictionary attribute prefix requires string dictionary keys")]
    NonStringDictionaryKey { type_name: String, property: String },

    #[error("Invalid tag helper bound property '{type_name}.{property}': a dictionary attribute prefix is required when an explicit name is given without a public setter")]
    MissingDictionaryPrefix { type_name: String, property: String },

    #[error("Invalid bound attribute name '{name}' on '{owner}': names cannot contain '{character}'")]
    InvalidBoundAttributeName {
        owner: String,
        name: String,
        character: char,
    },

    #[error("Invalid bound attribute prefix '{prefix}' on '{owner}': prefixes cannot contain '{character}'")]
    InvalidBoundAttributePrefix {
        owner: String,
        prefix: String,
        character: char,
    },

    #[error("Invalid bound attribute name '{name}' on '{owner}': names cannot start with 'data-'")]
    BoundAttributeNameStartsWithData { owner: String, name: String },

    #[error("Invalid tag name '{name}'{}", invalid_character(*.character))]
    InvalidTagName {
        name: String,
        character: Option<char>,
    },

    #[error("Invalid required attribute name '{name}': names cannot contain '{character}'")]
    InvalidRequiredAttributeName { name: String, character: char },

    #[error("Required attribute names cannot be empty")]
    EmptyRequiredAttributeName,

    #[error("Invalid required attribute selector '{selector}': {reason}")]
    InvalidRequiredAttributeSelector { selector: String, reason: String },

    #[error("Invalid parent tag name '{name}'{}", invalid_character(*.character))]
    InvalidParentTagName {
        name: String,
        character: Option<char>,
    },

    #[error("Invalid restricted child tag name '{name}'{}", invalid_character(*.character))]
    InvalidRestrictedChild {
        name: String,
        character: Option<char>,
    },
}

fn invalid_character(character: Option<char>) -> String {
    match character {
        Some(character) => format!(": names cannot contain '{character}'"),
        None => ": names cannot be empty or whitespace".to_string(),
    }
}

impl TagHelperDiagnostic {
    #[must_use]
    pub fn diagnostic_code(&self) -> &'static str {
        match self {
            TagHelperDiagnostic::DictionaryPrefixOnNonDictionary { .. } => "RZ3001",
            TagHelperDiagnostic::NameOnNonSettableProperty { .. } => "RZ3002",
            TagHelperDiagnostic::NonStringDictionaryKey { .. } => "RZ3003",
            TagHelperDiagnostic::MissingDictionaryPrefix { .. } => "RZ3004",
            TagHelperDiagnostic::InvalidBoundAttributeName { .. } => "RZ3005",
            TagHelperDiagnostic::InvalidBoundAttributePrefix { .. } => "RZ3006",
            TagHelperDiagnostic::BoundAttributeNameStartsWithData { .. } => "RZ3007",
            TagHelperDiagnostic::InvalidTagName { .. } => "RZ3008",
            TagHelperDiagnostic::InvalidRequiredAttributeName { .. } => "RZ3009",
            TagHelperDiagnostic::EmptyRequiredAttributeName => "RZ3010",
            TagHelperDiagnostic::InvalidRequiredAttributeSelector { .. } => "RZ3011",
            TagHelperDiagnostic::InvalidParentTagName { .. } => "RZ3012",
            TagHelperDiagnostic::InvalidRestrictedChild { .. } => "RZ3013",
        }
    }
}

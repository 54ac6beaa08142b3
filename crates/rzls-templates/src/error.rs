use rzls_source::Span;
use serde::Serialize;
use thiserror::Error;

use crate::Language;

/// A syntax problem in a hybrid document.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash, Serialize)]
pub enum SyntaxError {
    #[error("The comment is not terminated; expected '*@'")]
    UnterminatedComment,

    #[error("The code block is missing a closing '}}' character")]
    UnterminatedCodeBlock,

    #[error("The explicit expression is missing a closing ')' character")]
    UnterminatedExpression,

    #[error("Unterminated string literal")]
    UnterminatedString,

    #[error("Encountered end tag '</{name}>' with no matching start tag")]
    UnexpectedClosingTag { name: String },

    #[error("The element '{name}' was not closed")]
    UnclosedElement { name: String },
}

impl SyntaxError {
    #[must_use]
    pub fn diagnostic_code(&self) -> &'static str {
        match self {
            SyntaxError::UnterminatedComment => "RZ1001",
            SyntaxError::UnterminatedCodeBlock => "RZ1002",
            SyntaxError::UnterminatedExpression => "RZ1003",
            SyntaxError::UnterminatedString => "RZ1004",
            SyntaxError::UnexpectedClosingTag { .. } => "RZ1005",
            SyntaxError::UnclosedElement { .. } => "RZ1006",
        }
    }

    /// The language region a diagnostic of this kind belongs to.
    #[must_use]
    pub fn language(&self) -> Language {
        match self {
            SyntaxError::UnterminatedCodeBlock
            | SyntaxError::UnterminatedExpression
            | SyntaxError::UnterminatedString => Language::Code,
            SyntaxError::UnterminatedComment
            | SyntaxError::UnexpectedClosingTag { .. }
            | SyntaxError::UnclosedElement { .. } => Language::Markup,
        }
    }
}

/// A [`SyntaxError`] located in the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SyntaxDiagnostic {
    pub error: SyntaxError,
    pub span: Span,
}

impl SyntaxDiagnostic {
    #[must_use]
    pub fn new(error: SyntaxError, span: Span) -> Self {
        Self { error, span }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.error.diagnostic_code()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.error.language()
    }
}

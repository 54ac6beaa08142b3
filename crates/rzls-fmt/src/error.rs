use rzls_source::EditError;
use rzls_source::Span;
use rzls_templates::Language;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Formatting was cancelled")]
    Cancelled,

    #[error("Sub-formatters produced overlapping edits at {first:?} and {second:?}")]
    OverlappingEdits { first: Span, second: Span },

    #[error(transparent)]
    Edit(EditError),

    #[error("{language:?} formatter failed: {message}")]
    SubFormatter { language: Language, message: String },
}

impl From<EditError> for FormatError {
    fn from(error: EditError) -> Self {
        match error {
            EditError::Overlapping { first, second } => Self::OverlappingEdits { first, second },
            other => Self::Edit(other),
        }
    }
}

/// Why a candidate edit list was discarded.
///
/// A rejection is not an error: the request completes with no edits.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("Edits would change significant tokens between {span:?}")]
    ContentChanged { span: Span },

    #[error("Edits would introduce {code} in the {language:?} region")]
    NewDiagnostics {
        code: &'static str,
        language: Language,
    },

    #[error("The document already has {count} syntax diagnostic(s)")]
    PreexistingDiagnostics { count: usize },

    #[error("The {formatter} formatter returned an edit at {span:?} outside any source mapping")]
    UnmappedEdit { formatter: &'static str, span: Span },
}

impl Rejection {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::ContentChanged { .. } => "content_changed",
            Rejection::NewDiagnostics { .. } => "new_diagnostics",
            Rejection::PreexistingDiagnostics { .. } => "preexisting_diagnostics",
            Rejection::UnmappedEdit { .. } => "unmapped_edit",
        }
    }
}

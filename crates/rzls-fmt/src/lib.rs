//! Formatting for hybrid markup/C# documents.
//!
//! The [`Formatter`] splits a document into its code and markup
//! projections, asks a [`DocumentFormatter`] for each, maps the edits back,
//! and only returns them when the result keeps every significant token and
//! introduces no new syntax diagnostic.

mod cancel;
mod code;
mod error;
mod formatter;
mod lines;
mod markup;
mod minimize;
mod orchestrator;
pub mod validate;

pub use cancel::CancellationToken;
pub use code::CodeFormatter;
pub use error::FormatError;
pub use error::Rejection;
pub use formatter::DocumentFormatter;
pub use markup::MarkupFormatter;
pub use minimize::minimal_edits;
pub use orchestrator::Formatter;
pub use orchestrator::FormattingRequest;

//! Hybrid markup/C# documents: segment classification, per-language
//! projections and syntax diagnostics.

mod classifier;
mod document;
mod error;
mod markup;
mod projection;
pub mod scanner;
mod segment;
mod tokens;

pub use document::HybridDocument;
pub use document::MASK;
pub use error::SyntaxDiagnostic;
pub use error::SyntaxError;
pub use markup::scan_markup;
pub use markup::MarkupScan;
pub use markup::Tag;
pub use markup::TagKind;
pub use projection::Projection;
pub use projection::SourceMapping;
pub use segment::Language;
pub use segment::Segment;
pub use segment::SegmentKind;
pub use tokens::significant_tokens;

/// Classify `text` into segments and collect its syntax diagnostics.
#[must_use]
pub fn parse_document(text: &str) -> HybridDocument {
    HybridDocument::parse(text)
}

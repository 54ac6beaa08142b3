//! Text primitives shared by every `rzls` crate: byte spans, text
//! edits and diagnostic rendering.

mod edit;
mod render;
mod span;

pub use edit::apply_edits;
pub use edit::normalize_edits;
pub use edit::EditError;
pub use edit::TextEdit;
pub use render::Report;
pub use render::ReportRenderer;
pub use render::Severity;
pub use span::Span;

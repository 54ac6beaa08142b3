use async_trait::async_trait;
use rzls_conf::FormattingOptions;
use rzls_source::TextEdit;
use rzls_templates::Projection;

use crate::FormatError;

/// A formatter for one language of a hybrid document.
///
/// Edits are expressed in the coordinates of the projection the formatter
/// is handed; the orchestrator maps them back to the document.
#[async_trait]
pub trait DocumentFormatter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn document_edits(
        &self,
        projection: &Projection,
        options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError>;

    /// Edits in response to `trigger` having been typed just before
    /// `position`. The orchestrator keeps only edits near the position.
    async fn on_type_edits(
        &self,
        projection: &Projection,
        position: usize,
        trigger: char,
        options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError> {
        let _ = (position, trigger);
        self.document_edits(projection, options).await
    }
}

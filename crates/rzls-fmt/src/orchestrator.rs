use std::sync::Arc;

use rzls_conf::FormattingOptions;
use rzls_source::apply_edits;
use rzls_source::normalize_edits;
use rzls_source::Span;
use rzls_source::TextEdit;
use rzls_templates::parse_document;
use rzls_templates::scanner::literal_spans;
use rzls_templates::HybridDocument;
use rzls_templates::Language;
use rzls_templates::Projection;

use crate::lines::line_end;
use crate::lines::line_span;
use crate::lines::line_start;
use crate::minimize::minimal_edits;
use crate::validate::filter_preexisting;
use crate::validate::validate_content;
use crate::validate::validate_diagnostics;
use crate::validate::Candidate;
use crate::CancellationToken;
use crate::CodeFormatter;
use crate::DocumentFormatter;
use crate::FormatError;
use crate::MarkupFormatter;
use crate::Rejection;

/// What the caller wants from one format call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattingRequest {
    pub options: FormattingOptions,
    /// Only edits wholly inside this span are kept.
    pub range: Option<Span>,
    /// Format documents that already have syntax diagnostics, leaving the
    /// broken spans alone.
    pub allow_preexisting_diagnostics: bool,
}

impl FormattingRequest {
    #[must_use]
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: Span) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn allow_preexisting_diagnostics(mut self, allow: bool) -> Self {
        self.allow_preexisting_diagnostics = allow;
        self
    }
}

/// Runs one format request through segment, dispatch, remap, merge and
/// validation.
#[derive(Clone)]
pub struct Formatter {
    code: Arc<dyn DocumentFormatter>,
    markup: Arc<dyn DocumentFormatter>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(Arc::new(CodeFormatter), Arc::new(MarkupFormatter))
    }
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("code", &self.code.name())
            .field("markup", &self.markup.name())
            .finish()
    }
}

impl Formatter {
    #[must_use]
    pub fn new(code: Arc<dyn DocumentFormatter>, markup: Arc<dyn DocumentFormatter>) -> Self {
        Self { code, markup }
    }

    fn formatter(&self, language: Language) -> &dyn DocumentFormatter {
        match language {
            Language::Code => self.code.as_ref(),
            Language::Markup => self.markup.as_ref(),
        }
    }

    /// Edits formatting the whole document, or `request.range` of it.
    ///
    /// A request whose edits fail validation returns no edits.
    #[tracing::instrument(skip_all, fields(len = text.len(), range = ?request.range))]
    pub async fn format(
        &self,
        text: &str,
        request: &FormattingRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<TextEdit>, FormatError> {
        if cancel.is_cancelled() {
            return Err(FormatError::Cancelled);
        }
        let document = parse_document(text);
        let code = document.code_projection();
        let markup = document.markup_projection();
        let options = &request.options;

        let dispatched = async {
            tokio::try_join!(
                self.dispatch(Language::Code, &code, options),
                self.dispatch(Language::Markup, &markup, options),
            )
        };
        let (code_edits, markup_edits) = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(FormatError::Cancelled),
            result = dispatched => result?,
        };

        let mut edits = match remap(&code, code_edits, self.code.name()) {
            Ok(edits) => edits,
            Err(rejection) => return Ok(reject(&rejection)),
        };
        match remap(&markup, markup_edits, self.markup.name()) {
            Ok(markup_edits) => edits.extend(markup_edits),
            Err(rejection) => return Ok(reject(&rejection)),
        }
        if let Some(range) = request.range {
            edits.retain(|edit| range.contains_span(edit.span));
        }
        finish(&document, edits, request, cancel)
    }

    /// Edits in response to `trigger` having been typed just before
    /// `position`. Handles `}`, `;` and newline; any other trigger yields no
    /// edits. Only the language that owns the position is consulted.
    #[tracing::instrument(skip_all, fields(position = position, trigger = ?trigger))]
    pub async fn format_on_type(
        &self,
        text: &str,
        position: usize,
        trigger: char,
        request: &FormattingRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<TextEdit>, FormatError> {
        if cancel.is_cancelled() {
            return Err(FormatError::Cancelled);
        }
        let document = parse_document(text);
        let Some(region) = on_type_region(&document, position, trigger) else {
            return Ok(Vec::new());
        };

        let language = document.language_at(position - trigger.len_utf8());
        let projection = match language {
            Language::Code => document.code_projection(),
            Language::Markup => document.markup_projection(),
        };
        let Some(projected) = projection.to_projected(position) else {
            return Ok(Vec::new());
        };

        let formatter = self.formatter(language);
        let edits = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(FormatError::Cancelled),
            result = formatter.on_type_edits(&projection, projected, trigger, &request.options) => result?,
        };

        let mut edits = match remap(&projection, edits, formatter.name()) {
            Ok(edits) => edits,
            Err(rejection) => return Ok(reject(&rejection)),
        };
        edits.retain(|edit| region.contains_span(edit.span));
        finish(&document, edits, request, cancel)
    }

    /// Format `text` and return the result.
    pub async fn format_text(
        &self,
        text: &str,
        request: &FormattingRequest,
        cancel: &CancellationToken,
    ) -> Result<String, FormatError> {
        let edits = self.format(text, request, cancel).await?;
        Ok(apply_edits(text, &edits)?)
    }

    async fn dispatch(
        &self,
        language: Language,
        projection: &Projection,
        options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError> {
        if projection.is_empty() {
            return Ok(Vec::new());
        }
        self.formatter(language)
            .document_edits(projection, options)
            .await
    }
}

/// Merge, validate and minimise remapped edits.
fn finish(
    document: &HybridDocument,
    edits: Vec<TextEdit>,
    request: &FormattingRequest,
    cancel: &CancellationToken,
) -> Result<Vec<TextEdit>, FormatError> {
    if cancel.is_cancelled() {
        return Err(FormatError::Cancelled);
    }
    let text = document.text();
    let mut edits = normalize_edits(edits)?;
    edits.retain(|edit| !edit.is_noop(text));
    if edits.is_empty() {
        return Ok(edits);
    }

    let edits = match filter_preexisting(document, edits, request.allow_preexisting_diagnostics) {
        Ok(edits) if edits.is_empty() => return Ok(edits),
        Ok(edits) => edits,
        Err(rejection) => return Ok(reject(&rejection)),
    };
    let candidate = Candidate::new(document, edits)?;
    match validate_content(candidate).and_then(validate_diagnostics) {
        Ok(candidate) => {
            let minimal = minimal_edits(text, &candidate.edited);
            let edits = match apply_edits(text, &minimal) {
                Ok(applied) if applied == candidate.edited => minimal,
                _ => {
                    tracing::warn!("Minimised edits diverge from the validated text, keeping the merged edits");
                    candidate.edits
                }
            };
            tracing::debug!(edits = edits.len(), "Formatted document");
            Ok(edits)
        }
        Err(rejection) => Ok(reject(&rejection)),
    }
}

fn reject(rejection: &Rejection) -> Vec<TextEdit> {
    tracing::warn!(reason = rejection.reason(), "Discarding formatting edits: {rejection}");
    Vec::new()
}

/// Map edits from projection offsets back to the document.
///
/// One edit outside every mapping rejects the formatter's whole batch.
fn remap(
    projection: &Projection,
    edits: Vec<TextEdit>,
    formatter: &'static str,
) -> Result<Vec<TextEdit>, Rejection> {
    edits
        .into_iter()
        .map(|edit| match projection.to_original(edit.span) {
            Some(span) => Ok(TextEdit::new(span, edit.new_text)),
            None => Err(Rejection::UnmappedEdit {
                formatter,
                span: edit.span,
            }),
        })
        .collect()
}

/// The part of the document an on-type request may touch.
fn on_type_region(document: &HybridDocument, position: usize, trigger: char) -> Option<Span> {
    let text = document.text();
    let typed = position.checked_sub(trigger.len_utf8())?;
    if !text.get(typed..)?.starts_with(trigger) {
        return None;
    }
    match trigger {
        ';' => Some(line_span(text, typed)),
        '\n' => Some(line_span(text, typed).cover(line_span(text, position))),
        '}' => {
            let open = matching_open_brace(document, typed)?;
            Some(Span::from_bounds(line_start(text, open), line_end(text, typed)))
        }
        _ => None,
    }
}

/// The `{` matching the `}` at `close`, searched within its segment.
fn matching_open_brace(document: &HybridDocument, close: usize) -> Option<usize> {
    let segment = document.segment_at(close)?;
    let start = segment.span.start_usize();
    let text = segment.text(document.text());
    let literals = literal_spans(text);
    let in_literal = |offset: usize| {
        literals
            .iter()
            .any(|(span, _)| span.start_usize() <= offset && offset < span.end_usize())
    };

    let mut depth = 0usize;
    for (offset, b) in text.as_bytes()[..=close - start].iter().enumerate().rev() {
        if in_literal(offset) {
            continue;
        }
        match b {
            b'}' => depth += 1,
            b'{' if depth == 1 => return Some(start + offset),
            b'{' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

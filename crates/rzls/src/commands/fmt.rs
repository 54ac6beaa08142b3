use std::io::IsTerminal;
use std::io::Read as _;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use rzls_fmt::CancellationToken;
use rzls_fmt::Formatter;
use rzls_fmt::FormattingRequest;
use rzls_source::Report;
use rzls_source::ReportRenderer;
use rzls_templates::parse_document;
use rzls_templates::Language;
use rzls_templates::SyntaxDiagnostic;
use similar::TextDiff;
use tokio::runtime::Handle;

use crate::args::Args;
use crate::cli::Session;
use crate::commands::Command;
use crate::exit::Exit;
use crate::walk::walk_documents;

#[derive(Debug, Parser)]
pub struct Fmt {
    /// Files or directories to format. Defaults to the project root.
    paths: Vec<Utf8PathBuf>,

    /// Print a diff of the changes instead of writing them, and exit with
    /// status 1 when any file would change.
    #[arg(long)]
    check: bool,

    /// Read a document from stdin and write the formatted result to stdout.
    #[arg(long, conflicts_with = "paths")]
    stdin: bool,

    /// Format documents with syntax errors, leaving the broken regions
    /// untouched.
    #[arg(long)]
    allow_syntax_errors: bool,
}

impl Command for Fmt {
    fn execute(&self, args: &Args, session: &Session) -> Result<Exit> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start the async runtime")?;
        let request = FormattingRequest::new(session.settings.format().clone())
            .allow_preexisting_diagnostics(self.allow_syntax_errors);
        let formatter = Formatter::default();
        let renderer = pick_renderer();

        let reading_stdin =
            self.stdin || (!std::io::stdin().is_terminal() && self.paths.is_empty());
        if reading_stdin {
            return self.format_stdin(runtime.handle(), &formatter, &request, &renderer);
        }

        let paths = if self.paths.is_empty() {
            vec![session.project_root.clone()]
        } else {
            self.paths
                .iter()
                .map(|path| {
                    if path.is_relative() {
                        session.project_root.join(path)
                    } else {
                        path.clone()
                    }
                })
                .collect()
        };
        let files = walk_documents(&paths);
        tracing::debug!(files = files.len(), "Discovered documents");
        if files.is_empty() {
            return Ok(Exit::success());
        }

        // Format in parallel, then report and write on the main thread in
        // path order.
        let handle = runtime.handle();
        let mut results: Vec<FileResult> = {
            let (tx, rx) = std::sync::mpsc::channel();
            rayon::scope(|scope| {
                for path in files {
                    let tx = tx.clone();
                    let formatter = &formatter;
                    let request = &request;
                    scope.spawn(move |_| {
                        let _ = tx.send(format_file(handle, formatter, request, path));
                    });
                }
            });
            drop(tx);
            rx.into_iter().collect()
        };
        results.sort_by(|a, b| a.path.cmp(&b.path));

        let mut summary = Summary::default();
        for result in &results {
            self.report(result, &renderer, &mut summary, args.global.quiet)?;
        }
        Ok(summary.into_exit(self.check))
    }
}

impl Fmt {
    fn format_stdin(
        &self,
        handle: &Handle,
        formatter: &Formatter,
        request: &FormattingRequest,
        renderer: &ReportRenderer,
    ) -> Result<Exit> {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;

        let result = format_source(handle, formatter, request, "<stdin>".into(), source);
        let diagnostics = render_diagnostics(&result, renderer);
        for output in &diagnostics {
            eprintln!("{output}\n");
        }
        let formatted = result.outcome?;

        if self.check {
            if formatted == result.source {
                return Ok(Exit::success());
            }
            print!("{}", unified_diff(&result.path, &result.source, &formatted));
            return Ok(Exit::error().with_message("Would reformat <stdin>."));
        }
        print!("{formatted}");
        if diagnostics.is_empty() || request.allow_preexisting_diagnostics {
            Ok(Exit::success())
        } else {
            Ok(Exit::error())
        }
    }

    fn report(
        &self,
        result: &FileResult,
        renderer: &ReportRenderer,
        summary: &mut Summary,
        quiet: bool,
    ) -> Result<()> {
        let diagnostics = render_diagnostics(result, renderer);
        if !diagnostics.is_empty() {
            if !quiet {
                for output in &diagnostics {
                    println!("{output}\n");
                }
            }
            summary.syntax_errors += diagnostics.len();
            summary.broken_files += 1;
        }

        let formatted = match &result.outcome {
            Ok(formatted) => formatted,
            Err(error) => {
                eprintln!("{}: {error:#}", result.path);
                summary.failed += 1;
                return Ok(());
            }
        };
        if *formatted == result.source {
            return Ok(());
        }

        summary.changed += 1;
        if self.check {
            if !quiet {
                print!("{}", unified_diff(&result.path, &result.source, formatted));
            }
        } else {
            std::fs::write(&result.path, formatted)
                .with_context(|| format!("Failed to write {}", result.path))?;
            tracing::debug!(path = %result.path, "Reformatted");
        }
        Ok(())
    }
}

/// One document, read and formatted on a worker thread.
struct FileResult {
    path: Utf8PathBuf,
    source: String,
    diagnostics: Vec<SyntaxDiagnostic>,
    outcome: Result<String>,
}

fn format_file(
    handle: &Handle,
    formatter: &Formatter,
    request: &FormattingRequest,
    path: Utf8PathBuf,
) -> FileResult {
    match std::fs::read_to_string(&path) {
        Ok(source) => format_source(handle, formatter, request, path, source),
        Err(error) => FileResult {
            outcome: Err(anyhow::Error::new(error).context("Failed to read file")),
            path,
            source: String::new(),
            diagnostics: Vec::new(),
        },
    }
}

fn format_source(
    handle: &Handle,
    formatter: &Formatter,
    request: &FormattingRequest,
    path: Utf8PathBuf,
    source: String,
) -> FileResult {
    let diagnostics = parse_document(&source).diagnostics().to_vec();
    let outcome = handle
        .block_on(formatter.format_text(&source, request, &CancellationToken::new()))
        .map_err(anyhow::Error::from);
    FileResult {
        path,
        source,
        diagnostics,
        outcome,
    }
}

fn render_diagnostics(result: &FileResult, renderer: &ReportRenderer) -> Vec<String> {
    result
        .diagnostics
        .iter()
        .map(|diagnostic| {
            let message = diagnostic.error.to_string();
            let label = match diagnostic.language() {
                Language::Markup => "in markup",
                Language::Code => "in code",
            };
            let report = Report::error(
                &result.source,
                result.path.as_str(),
                diagnostic.code(),
                &message,
                diagnostic.span,
            )
            .label(label);
            renderer.render(&report)
        })
        .collect()
}

fn unified_diff(path: &Utf8Path, old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(path.as_str(), path.as_str())
        .to_string()
}

#[derive(Debug, Default)]
struct Summary {
    changed: usize,
    failed: usize,
    syntax_errors: usize,
    broken_files: usize,
}

impl Summary {
    fn into_exit(self, check: bool) -> Exit {
        let plural = |count: usize| if count == 1 { "" } else { "s" };

        if self.failed > 0 {
            return Exit::error().with_message(format!(
                "Failed to format {} file{}.",
                self.failed,
                plural(self.failed)
            ));
        }
        if check && self.changed > 0 {
            return Exit::error().with_message(format!(
                "Would reformat {} file{}.",
                self.changed,
                plural(self.changed)
            ));
        }
        if self.syntax_errors > 0 {
            return Exit::error().with_message(format!(
                "Found {} syntax error{} in {} file{}.",
                self.syntax_errors,
                plural(self.syntax_errors),
                self.broken_files,
                plural(self.broken_files)
            ));
        }
        if check {
            Exit::success()
        } else {
            Exit::success().with_message(format!(
                "Reformatted {} file{}.",
                self.changed,
                plural(self.changed)
            ))
        }
    }
}

fn pick_renderer() -> ReportRenderer {
    if std::io::stdout().is_terminal() {
        ReportRenderer::styled()
    } else {
        ReportRenderer::plain()
    }
}

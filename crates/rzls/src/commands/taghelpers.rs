use std::fmt::Write as _;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use rzls_symbols::Compilation;
use rzls_taghelpers::TagHelperDescriptor;
use rzls_taghelpers::TagHelperDiscovery;

use crate::args::Args;
use crate::cli::Session;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Taghelpers {
    /// Compilation snapshot (JSON) to scan.
    compilation: Utf8PathBuf,

    /// Print the descriptors as JSON.
    #[arg(long)]
    json: bool,

    /// Only report tag helpers defined in this assembly.
    #[arg(long, value_name = "NAME")]
    assembly: Option<String>,
}

impl Command for Taghelpers {
    fn execute(&self, _args: &Args, session: &Session) -> Result<Exit> {
        let path = if self.compilation.is_relative() {
            session.project_root.join(&self.compilation)
        } else {
            self.compilation.clone()
        };
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {path}"))?;
        let compilation =
            Compilation::from_json(&json).with_context(|| format!("Failed to load {path}"))?;

        let descriptors = TagHelperDiscovery::default()
            .discover(
                &compilation,
                session.settings.discovery(),
                self.assembly.as_deref(),
            )
            .context("Tag helper discovery failed")?;

        if self.json {
            let output = serde_json::to_string_pretty(&descriptors)
                .context("Failed to serialize descriptors")?;
            println!("{output}");
        } else {
            print!("{}", listing(&descriptors));
        }

        let with_errors = descriptors
            .iter()
            .filter(|descriptor| descriptor.has_errors())
            .count();
        if with_errors > 0 {
            let word = if with_errors == 1 { "descriptor" } else { "descriptors" };
            return Ok(Exit::error().with_message(format!("Found {with_errors} {word} with errors.")));
        }
        Ok(Exit::success())
    }
}

/// One line per descriptor, followed by its diagnostics.
fn listing(descriptors: &[TagHelperDescriptor]) -> String {
    let mut output = String::new();
    for descriptor in descriptors {
        let tags = descriptor
            .tag_matching_rules()
            .iter()
            .map(|rule| rule.tag_name())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            output,
            "{:<22} {} <{tags}> ({} attributes)",
            descriptor.kind().as_str(),
            descriptor.display_name(),
            descriptor.bound_attributes().len(),
        );
        for diagnostic in descriptor.all_diagnostics() {
            let _ = writeln!(output, "    {}: {diagnostic}", diagnostic.diagnostic_code());
        }
    }
    output
}

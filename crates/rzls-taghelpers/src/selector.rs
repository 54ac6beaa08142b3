//! Parser for the required-attribute selector strings of reflected tag
//! helpers: `name`, `prefix*`, `[name]`, `[name=value]`, `[name^=value]`
//! and `[name$=value]`, separated by commas.

use crate::builder::RequiredAttributeBuilder;
use crate::NameComparison;
use crate::TagHelperDiagnostic;
use crate::ValueComparison;

#[derive(Debug, Default)]
pub struct ParsedSelector {
    pub attributes: Vec<RequiredAttributeBuilder>,
    pub diagnostics: Vec<TagHelperDiagnostic>,
}

#[must_use]
pub fn parse_required_attributes(selector: &str) -> ParsedSelector {
    let mut parsed = ParsedSelector::default();
    for entry in split_entries(selector) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match parse_entry(entry) {
            Ok(attribute) => parsed.attributes.push(attribute),
            Err(reason) => {
                tracing::debug!(selector = entry, reason, "Malformed required attribute");
                parsed
                    .diagnostics
                    .push(TagHelperDiagnostic::InvalidRequiredAttributeSelector {
                        selector: entry.to_string(),
                        reason: reason.to_string(),
                    });
            }
        }
    }
    parsed
}

/// Split on commas outside brackets and quotes.
fn split_entries(selector: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote: Option<char> = None;
    for (index, c) in selector.char_indices() {
        match (c, quote) {
            (c, Some(open)) if c == open => quote = None,
            (_, Some(_)) => {}
            ('\'' | '"', None) if in_brackets => quote = Some(c),
            ('[', None) => in_brackets = true,
            (']', None) => in_brackets = false,
            (',', None) if !in_brackets => {
                entries.push(&selector[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    entries.push(&selector[start..]);
    entries
}

fn parse_entry(entry: &str) -> Result<RequiredAttributeBuilder, &'static str> {
    let mut attribute = RequiredAttributeBuilder::default();

    let Some(inner) = entry.strip_prefix('[') else {
        if entry.contains(['[', ']', '=']) {
            return Err("attribute values must be written inside brackets");
        }
        match entry.strip_suffix('*') {
            Some(prefix) => {
                attribute
                    .set_name(prefix.trim())
                    .set_name_comparison(NameComparison::PrefixMatch);
            }
            None => {
                attribute.set_name(entry);
            }
        }
        return Ok(attribute);
    };

    let Some(inner) = inner.strip_suffix(']') else {
        return Err("missing closing ']'");
    };

    let Some(operator_start) = inner.find(['=', '^', '$', '~', '|', '*']) else {
        attribute.set_name(inner.trim());
        return Ok(attribute);
    };

    let name = inner[..operator_start].trim();
    let rest = &inner[operator_start..];
    let (comparison, value) = if let Some(value) = rest.strip_prefix("^=") {
        (ValueComparison::PrefixMatch, value)
    } else if let Some(value) = rest.strip_prefix("$=") {
        (ValueComparison::SuffixMatch, value)
    } else if let Some(value) = rest.strip_prefix('=') {
        (ValueComparison::FullMatch, value)
    } else {
        return Err("unsupported operator, expected '=', '^=' or '$='");
    };

    let value = unquote(value.trim())?;
    attribute.set_name(name).set_value(value, comparison);
    Ok(attribute)
}

fn unquote(value: &str) -> Result<&str, &'static str> {
    let Some(open) = value.chars().next().filter(|c| *c == '\'' || *c == '"') else {
        if value.contains(['\'', '"']) {
            return Err("quotes must surround the whole value");
        }
        return Ok(value);
    };
    match value[1..].strip_suffix(open) {
        Some(inner) if !inner.contains(open) => Ok(inner),
        _ => Err("unterminated quoted value"),
    }
}

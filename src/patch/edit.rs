//! In-memory text edits.

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::config::{EditSpec, VALUE_GROUP};
use crate::settings::ThemeSettings;

/// What happened to a single edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    /// The text changed.
    Applied,
    /// Matched, but the value was already current.
    Unchanged,
    /// The pattern did not match anywhere.
    NoMatch,
    /// The line number is past the end of the file.
    OutOfRange,
}

impl EditOutcome {
    /// True for outcomes worth a warning.
    pub const fn is_miss(self) -> bool {
        matches!(self, Self::NoMatch | Self::OutOfRange)
    }
}

/// Report for one edit of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditReport {
    pub index: usize,
    /// Short description of what the edit addresses.
    pub locator: String,
    pub outcome: EditOutcome,
    /// Previous value (first match, or the old line).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Rendered replacement value.
    pub after: String,
    /// Number of spans replaced.
    pub replacements: usize,
}

#[derive(Debug, Clone)]
enum Locator {
    Pattern { regex: Regex, all: bool },
    Line(usize),
}

/// An [`EditSpec`] with its regex compiled.
#[derive(Debug, Clone)]
pub struct CompiledEdit {
    locator: Locator,
    template: String,
}

impl CompiledEdit {
    /// Compile an edit. Errors carry a human-readable reason.
    pub fn compile(spec: &EditSpec) -> Result<Self, String> {
        let locator = match spec {
            EditSpec::Pattern { pattern, all, .. } => {
                let regex = Regex::new(pattern).map_err(|e| e.to_string())?;
                if !regex.capture_names().any(|n| n == Some(VALUE_GROUP)) {
                    return Err(format!("missing (?P<{VALUE_GROUP}>...) group"));
                }
                Locator::Pattern { regex, all: *all }
            }
            EditSpec::Line { line: 0, .. } => return Err("line numbers start at 1".to_string()),
            EditSpec::Line { line, .. } => Locator::Line(*line),
        };
        Ok(Self {
            locator,
            template: spec.template().to_string(),
        })
    }

    pub fn describe(&self) -> String {
        match &self.locator {
            Locator::Pattern { regex, .. } => format!("pattern {}", regex.as_str()),
            Locator::Line(line) => format!("line {line}"),
        }
    }

    /// Apply to `text`, returning the new text and a report.
    pub fn apply(&self, index: usize, text: &str, settings: &ThemeSettings) -> (String, EditReport) {
        let value = settings.render(&self.template);
        let (new_text, outcome, before, replacements) = match &self.locator {
            Locator::Pattern { regex, all } => replace_value_group(regex, *all, text, &value),
            Locator::Line(line) => replace_line(*line, text, &value),
        };
        trace!(index, ?outcome, replacements, "Applied edit");

        let report = EditReport {
            index,
            locator: self.describe(),
            outcome,
            before,
            after: value,
            replacements,
        };
        (new_text, report)
    }
}

fn replace_value_group(
    regex: &Regex,
    all: bool,
    text: &str,
    value: &str,
) -> (String, EditOutcome, Option<String>, usize) {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut before = None;
    let mut replacements = 0;
    let mut changed = false;

    for caps in regex.captures_iter(text) {
        // The group may be optional within the pattern
        let Some(m) = caps.name(VALUE_GROUP) else {
            continue;
        };
        if before.is_none() {
            before = Some(m.as_str().to_string());
        }
        changed |= m.as_str() != value;
        out.push_str(&text[last..m.start()]);
        out.push_str(value);
        last = m.end();
        replacements += 1;
        if !all {
            break;
        }
    }
    out.push_str(&text[last..]);

    let outcome = if replacements == 0 {
        EditOutcome::NoMatch
    } else if changed {
        EditOutcome::Applied
    } else {
        EditOutcome::Unchanged
    };
    (out, outcome, before, replacements)
}

fn replace_line(line: usize, text: &str, value: &str) -> (String, EditOutcome, Option<String>, usize) {
    let mut out = String::with_capacity(text.len() + value.len());
    let mut before = None;

    for (i, chunk) in text.split_inclusive('\n').enumerate() {
        if i + 1 != line {
            out.push_str(chunk);
            continue;
        }
        let body_len = chunk
            .strip_suffix("\r\n")
            .or_else(|| chunk.strip_suffix('\n'))
            .map_or(chunk.len(), str::len);
        let (body, ending) = chunk.split_at(body_len);
        before = Some(body.to_string());
        out.push_str(value);
        out.push_str(ending);
    }

    match before {
        None => (text.to_string(), EditOutcome::OutOfRange, None, 0),
        Some(old) if old == value => (out, EditOutcome::Unchanged, Some(old), 1),
        Some(old) => (out, EditOutcome::Applied, Some(old), 1),
    }
}

/// Apply edits in order, each seeing the previous edit's output.
pub fn apply_edits(
    text: &str,
    edits: &[CompiledEdit],
    settings: &ThemeSettings,
) -> (String, Vec<EditReport>) {
    let mut current = text.to_string();
    let mut reports = Vec::with_capacity(edits.len());
    for (index, edit) in edits.iter().enumerate() {
        let (next, report) = edit.apply(index, &current, settings);
        current = next;
        reports.push(report);
    }
    (current, reports)
}

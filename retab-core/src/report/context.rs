//! Repeater contexts and location resolution
//!
//! A [`RepeaterContext`] is one active iteration/aggregation scope, created
//! when the interpreter enters a `Repeater` or `Total` schema element and
//! destroyed when it exits. The [`RepeaterStack`] holds the active contexts
//! innermost-last and owns the location resolution algorithm: splicing
//! iteration indices into declared paths and computing field/total values.

use crate::error::ReportError;
use crate::xml::XmlFile;

/// One active iteration or aggregation scope.
///
/// Lifecycle: created with its iteration counter at the variant's initial
/// value, advanced by [`iterate`](Self::iterate) once per repetition of the
/// owning element's body, dropped when the element is exited.
///
/// Basic counts from 1 because its index becomes a 1-based positional path
/// predicate; File counts from 0 because its index selects a document from
/// the 0-based Document Set. The body of a repeater always runs once before
/// the first `iterate` call, so a Basic repeater over an absent location
/// still produces one (empty) pass. Both behaviors are intentional and
/// pinned by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeaterContext {
    /// Iterates the nodes matching a location inside the current document
    Basic {
        path: String,
        iteration: usize,
        bound: usize,
    },
    /// Iterates the Document Set itself; the path is a symbolic label
    File {
        label: String,
        iteration: usize,
        last: usize,
    },
    /// Aggregates matches of a location within the current iteration scope
    Total { path: String },
    /// Aggregates matches across every document; the path is a symbolic label
    SpecialTotal { label: String },
}

impl RepeaterContext {
    pub fn basic(path: impl Into<String>, bound: usize) -> Self {
        RepeaterContext::Basic {
            path: path.into(),
            iteration: 1,
            bound,
        }
    }

    pub fn file(label: impl Into<String>, file_count: usize) -> Self {
        RepeaterContext::File {
            label: label.into(),
            iteration: 0,
            last: file_count.saturating_sub(1),
        }
    }

    pub fn total(path: impl Into<String>) -> Self {
        RepeaterContext::Total { path: path.into() }
    }

    pub fn special_total(label: impl Into<String>) -> Self {
        RepeaterContext::SpecialTotal {
            label: label.into(),
        }
    }

    /// The declared location path or symbolic label, fixed at creation
    pub fn path(&self) -> &str {
        match self {
            RepeaterContext::Basic { path, .. } | RepeaterContext::Total { path } => path,
            RepeaterContext::File { label, .. } | RepeaterContext::SpecialTotal { label } => label,
        }
    }

    /// The current iteration value; totals are single-pass and report 0
    pub fn iteration(&self) -> usize {
        match self {
            RepeaterContext::Basic { iteration, .. }
            | RepeaterContext::File { iteration, .. } => *iteration,
            RepeaterContext::Total { .. } | RepeaterContext::SpecialTotal { .. } => 0,
        }
    }

    /// Advance to the next iteration. `None` signals exhaustion; the caller
    /// stops repeating the body once this returns `None`.
    pub fn iterate(&mut self) -> Option<usize> {
        match self {
            RepeaterContext::Basic {
                iteration, bound, ..
            } => {
                if *iteration >= *bound {
                    None
                } else {
                    *iteration += 1;
                    Some(*iteration)
                }
            }
            RepeaterContext::File {
                iteration, last, ..
            } => {
                if *iteration >= *last {
                    None
                } else {
                    *iteration += 1;
                    Some(*iteration)
                }
            }
            RepeaterContext::Total { .. } | RepeaterContext::SpecialTotal { .. } => None,
        }
    }

    fn is_file(&self) -> bool {
        matches!(self, RepeaterContext::File { .. })
    }

    fn is_total(&self) -> bool {
        matches!(
            self,
            RepeaterContext::Total { .. } | RepeaterContext::SpecialTotal { .. }
        )
    }
}

/// The ordered collection of active contexts, innermost last.
///
/// Depth always equals the nesting depth of unclosed `Repeater`/`Total`
/// schema elements; the interpreter pushes on enter and pops on exit.
#[derive(Debug, Default)]
pub struct RepeaterStack {
    frames: Vec<RepeaterContext>,
}

impl RepeaterStack {
    pub fn new() -> Self {
        RepeaterStack::default()
    }

    pub fn push(&mut self, context: RepeaterContext) {
        self.frames.push(context);
    }

    pub fn pop(&mut self) -> Option<RepeaterContext> {
        self.frames.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&RepeaterContext> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut RepeaterContext> {
        self.frames.last_mut()
    }

    /// Iteration index of the innermost active File context, which selects
    /// the document that Basic bounds and field values are computed against.
    pub fn file_iteration(&self) -> Option<usize> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.is_file())
            .map(RepeaterContext::iteration)
    }

    /// Rewrite `location` with explicit iteration indices: for each active
    /// context innermost-first whose declared path occurs in the string,
    /// insert `[iteration]` after the first occurrence. This turns a
    /// schema-relative path into the index-qualified path of the current
    /// repetition. Total contexts contribute no index and are skipped when
    /// `skip_totals` is set.
    fn splice(&self, location: &str, skip_totals: bool) -> String {
        let mut updated = location.to_string();
        for frame in self.frames.iter().rev() {
            if skip_totals && frame.is_total() {
                continue;
            }
            let path = frame.path();
            if path.is_empty() {
                continue;
            }
            if let Some(start) = updated.find(path) {
                let end = start + path.len();
                updated.insert_str(end, &format!("[{}]", frame.iteration()));
            }
        }
        updated
    }

    /// Resolve a location path to its value for the current scope.
    ///
    /// Dispatches on the innermost context; with no context active, scans the
    /// Document Set in order and takes the first document that matches at
    /// all. A location that matches nothing resolves to the empty string.
    pub fn resolve(
        &self,
        location: &str,
        documents: &[XmlFile],
    ) -> Result<String, ReportError> {
        match self.top() {
            None => {
                for file in documents {
                    let matches = file.document().select(location)?;
                    if let Some(first) = matches.first() {
                        return Ok(first.inner_text());
                    }
                }
                Ok(String::new())
            }
            Some(RepeaterContext::Basic { .. }) => {
                let spliced = self.splice(location, false);
                let index = self.file_iteration().unwrap_or(0);
                let Some(file) = documents.get(index) else {
                    return Ok(String::new());
                };
                let matches = file.document().select(&spliced)?;
                Ok(matches
                    .first()
                    .map(|element| element.inner_text())
                    .unwrap_or_default())
            }
            Some(RepeaterContext::File { iteration, .. }) => {
                let Some(file) = documents.get(*iteration) else {
                    return Ok(String::new());
                };
                let matches = file.document().select(location)?;
                Ok(matches
                    .first()
                    .map(|element| element.inner_text())
                    .unwrap_or_default())
            }
            Some(RepeaterContext::Total { path }) => {
                let spliced = self.splice(location, true);
                let index = self.file_iteration().unwrap_or(0);
                let Some(file) = documents.get(index) else {
                    return Ok(String::new());
                };
                let matches = file.document().select(&spliced)?;
                if matches.is_empty() {
                    return Ok(String::new());
                }
                if location.contains(path.as_str()) {
                    Ok(aggregate(
                        matches.iter().map(|element| element.inner_text()),
                    ))
                } else {
                    // Splicing already pinned the exact node; no aggregation.
                    Ok(matches[0].inner_text())
                }
            }
            Some(RepeaterContext::SpecialTotal { .. }) => {
                let mut values = Vec::new();
                for file in documents {
                    for element in file.document().select(location)? {
                        values.push(element.inner_text());
                    }
                }
                Ok(aggregate(values.into_iter()))
            }
        }
    }
}

/// Sum every value that parses as an integer or float; if nothing numeric is
/// seen, fall back to the last non-empty text. The whole-number formatting
/// rule applies to the final sum, not per term.
fn aggregate<I: Iterator<Item = String>>(values: I) -> String {
    let mut total = 0.0_f64;
    let mut numeric = false;
    let mut fallback = String::new();

    for value in values {
        let trimmed = value.trim();
        if let Ok(int_value) = trimmed.parse::<i64>() {
            total += int_value as f64;
            numeric = true;
        } else if let Ok(float_value) = trimmed.parse::<f64>() {
            total += float_value;
            numeric = true;
        } else if !value.is_empty() {
            fallback = value;
        } else {
            log::debug!("skipping empty value in total aggregation");
        }
    }

    if numeric {
        format_total(total)
    } else {
        fallback
    }
}

fn format_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{:.0}", total)
    } else {
        total.to_string()
    }
}

//! The recursive schema walker
//!
//! Performs a depth-first pre/post-order traversal of the schema tree,
//! translating structural elements into repetition control (via the
//! [`RepeaterStack`]) and sink events. One interpreter serves one report run;
//! construct a fresh one per run.

use crate::error::ReportError;
use crate::report::context::{RepeaterContext, RepeaterStack};
use crate::report::output::ReportOutput;
use crate::xml::dom::{Element, XmlNode};
use crate::xml::XmlFile;

/// Reserved `special` value on `Field` elements: emits the current file name
const FILE_NAME_FIELD: &str = "_FileName";

/// Walks a schema document against a Document Set, emitting sink events.
pub struct ReportInterpreter<'a> {
    documents: &'a [XmlFile],
    stack: RepeaterStack,
}

impl<'a> ReportInterpreter<'a> {
    pub fn new(documents: &'a [XmlFile]) -> Self {
        ReportInterpreter {
            documents,
            stack: RepeaterStack::new(),
        }
    }

    /// Interpret `schema` and stream the report into `output`.
    ///
    /// The sink is not flushed here. Callers flush only after this returns
    /// `Ok`, so a failed run never leaves a partial report behind.
    pub fn run(
        &mut self,
        schema: &XmlFile,
        output: &mut dyn ReportOutput,
    ) -> Result<(), ReportError> {
        log::info!(
            "generating report from schema '{}' over {} document(s)",
            schema.name(),
            self.documents.len()
        );
        let nodes = schema.document().nodes();
        for (index, node) in nodes.iter().enumerate() {
            self.visit(node, &nodes[..index], output)?;
        }
        debug_assert!(
            self.stack.is_empty(),
            "repeater stack must unwind to empty after a full walk"
        );
        Ok(())
    }

    /// Visit one schema node: enter, children (repeated if this node pushed
    /// a repeating context), exit. `preceding` are the earlier siblings,
    /// needed for `Total` attribute inheritance.
    fn visit(
        &mut self,
        node: &XmlNode,
        preceding: &[XmlNode],
        output: &mut dyn ReportOutput,
    ) -> Result<(), ReportError> {
        let pushed = self.on_enter(node, preceding, output)?;

        if let XmlNode::Element(element) = node {
            if !element.children().is_empty() {
                if element.name() == "Repeater" && pushed {
                    // One full pass over the children per iteration,
                    // including the first.
                    loop {
                        self.visit_children(element, output)?;
                        let more = self.stack.top_mut().and_then(RepeaterContext::iterate);
                        if more.is_none() {
                            break;
                        }
                    }
                } else {
                    self.visit_children(element, output)?;
                }
            }
        }

        self.on_exit(node, pushed, output);
        Ok(())
    }

    fn visit_children(
        &mut self,
        element: &Element,
        output: &mut dyn ReportOutput,
    ) -> Result<(), ReportError> {
        let children = element.children();
        for (index, child) in children.iter().enumerate() {
            self.visit(child, &children[..index], output)?;
        }
        Ok(())
    }

    /// Dispatch on the element kind; returns whether a context was pushed so
    /// the exit handler pops exactly what this pushed.
    fn on_enter(
        &mut self,
        node: &XmlNode,
        preceding: &[XmlNode],
        output: &mut dyn ReportOutput,
    ) -> Result<bool, ReportError> {
        let element = match node {
            XmlNode::Element(element) => element,
            XmlNode::Text(text) => {
                output.process_text(text);
                return Ok(false);
            }
        };

        match element.name() {
            "Repeater" => {
                if let Some(location) = element.attribute("location") {
                    let bound = self.file_local_bound(location)?;
                    log::debug!("entering repeater over '{}' (bound {})", location, bound);
                    self.stack.push(RepeaterContext::basic(location, bound));
                    Ok(true)
                } else if let Some(label) = element.attribute("special") {
                    log::debug!(
                        "entering file repeater '{}' over {} document(s)",
                        label,
                        self.documents.len()
                    );
                    self.stack
                        .push(RepeaterContext::file(label, self.documents.len()));
                    Ok(true)
                } else {
                    Err(ReportError::UnsupportedConfig {
                        element: "Repeater".to_string(),
                        message: "requires a 'location' or 'special' attribute".to_string(),
                    })
                }
            }
            "Field" => {
                if let Some(location) = element.attribute("location") {
                    let value = self.stack.resolve(location, self.documents)?;
                    output.enter_field(&value);
                } else if element.attribute("special") == Some(FILE_NAME_FIELD) {
                    output.enter_field(&self.current_file_name());
                }
                Ok(false)
            }
            "Total" => {
                if let Some(location) = element.attribute("location") {
                    self.stack.push(RepeaterContext::total(location));
                    Ok(true)
                } else if let Some(label) = element.attribute("special") {
                    self.stack.push(RepeaterContext::special_total(label));
                    Ok(true)
                } else if let Some(repeater) = preceding_repeater(preceding) {
                    if let Some(location) = repeater.attribute("location") {
                        self.stack.push(RepeaterContext::total(location));
                        Ok(true)
                    } else if let Some(label) = repeater.attribute("special") {
                        self.stack.push(RepeaterContext::special_total(label));
                        Ok(true)
                    } else {
                        Ok(false)
                    }
                } else {
                    log::warn!(
                        "Total element has no attributes and no preceding sibling Repeater"
                    );
                    Ok(false)
                }
            }
            "NewLine" => {
                output.enter_newline();
                Ok(false)
            }
            // Header and unknown elements are structural only; their
            // children are visited once with no events of their own.
            _ => Ok(false),
        }
    }

    fn on_exit(&mut self, node: &XmlNode, pushed: bool, output: &mut dyn ReportOutput) {
        let element = match node {
            XmlNode::Element(element) => element,
            XmlNode::Text(_) => return,
        };
        match element.name() {
            "Repeater" => {
                if pushed {
                    self.stack.pop();
                }
                output.exit_repeater();
            }
            "Total" => {
                if pushed {
                    self.stack.pop();
                }
                output.exit_total();
            }
            "Field" => output.exit_field(),
            "Header" => output.exit_header(),
            "NewLine" => output.exit_newline(),
            _ => {}
        }
    }

    /// Match count of `location` in the document the innermost File context
    /// selects (the first document when none is active). This is the
    /// iteration bound of a Basic repeater.
    fn file_local_bound(&self, location: &str) -> Result<usize, ReportError> {
        let index = self.stack.file_iteration().unwrap_or(0);
        match self.documents.get(index) {
            Some(file) => Ok(file.document().select(location)?.len()),
            None => Ok(0),
        }
    }

    fn current_file_name(&self) -> String {
        let index = self.stack.file_iteration().unwrap_or(0);
        self.documents
            .get(index)
            .map(|file| file.name().to_string())
            .unwrap_or_default()
    }
}

/// Nearest preceding sibling `Repeater` that carries a usable attribute.
///
/// Scans siblings only, never ancestors; the first match walking backward
/// wins. A `Total` without attributes inherits its scope from this element.
fn preceding_repeater(preceding: &[XmlNode]) -> Option<&Element> {
    preceding.iter().rev().find_map(|node| match node {
        XmlNode::Element(element)
            if element.name() == "Repeater"
                && (element.attribute("location").is_some()
                    || element.attribute("special").is_some()) =>
        {
            Some(element)
        }
        _ => None,
    })
}

//! Owned XML node tree
//!
//! Documents are parsed once from a quick-xml event stream into an owned tree
//! and are read-only afterwards. Text is trimmed during parsing, so
//! whitespace-only nodes between elements never appear in the tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ReportError;
use crate::xml::path;

/// A node in the document tree: an element or a run of text
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        }
    }
}

/// An element with its attributes and ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the named attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements in document order, skipping text nodes
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Concatenated text of this element and all its descendants
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// A parsed document: the ordered list of top-level nodes
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse a complete document from source text.
    pub fn parse(source: &str) -> Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut open: Vec<Element> = Vec::new();
        let mut top: Vec<XmlNode> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    open.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(XmlNode::Element(element), &mut open, &mut top);
                }
                Event::End(_) => {
                    // The reader enforces balanced tags, so there is always
                    // an open element here on well-formed input.
                    if let Some(element) = open.pop() {
                        attach(XmlNode::Element(element), &mut open, &mut top);
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(quick_xml::Error::from)?;
                    if !text.is_empty() {
                        attach(XmlNode::Text(text.into_owned()), &mut open, &mut top);
                    }
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    attach(XmlNode::Text(text), &mut open, &mut top);
                }
                Event::Eof => break,
                // Declarations, comments, doctypes and processing
                // instructions carry no report-relevant content.
                _ => {}
            }
        }

        Ok(XmlDocument { nodes: top })
    }

    /// Top-level nodes in document order
    pub fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    /// Evaluate a location path, returning every matching element in
    /// document order. No match is an empty vec, never an error; only an
    /// unparsable path fails.
    pub fn select(&self, location: &str) -> Result<Vec<&Element>, ReportError> {
        path::select(self, location)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(node: XmlNode, open: &mut Vec<Element>, top: &mut Vec<XmlNode>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

//! Error types for document loading and report generation
//!
//! The two enums mirror the two fatal failure classes: a document that cannot
//! be brought into memory ([`LoadError`]) and a schema that asks for something
//! the engine cannot do ([`ReportError`]). A location path that matches no
//! nodes is neither — resolution defines that case as the empty string.

use std::fmt;

/// Errors raised while loading an XML document into memory
#[derive(Debug, Clone)]
pub enum LoadError {
    /// The file could not be read
    Io { path: String, message: String },
    /// The file is not well-formed XML
    Xml { path: String, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, message } => {
                write!(f, "failed to read '{}': {}", path, message)
            }
            LoadError::Xml { path, message } => {
                write!(f, "'{}' is not well-formed XML: {}", path, message)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Errors raised while interpreting a schema
#[derive(Debug, Clone)]
pub enum ReportError {
    /// A schema element requests an unsupported construction, e.g. a
    /// `Repeater` without a `location` or `special` attribute
    UnsupportedConfig { element: String, message: String },
    /// A location path could not be parsed as a query
    MalformedPath { path: String, message: String },
    /// Writing the finished report failed
    Io(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::UnsupportedConfig { element, message } => {
                write!(f, "unsupported configuration on '{}': {}", element, message)
            }
            ReportError::MalformedPath { path, message } => {
                write!(f, "malformed location path '{}': {}", path, message)
            }
            ReportError::Io(message) => write!(f, "report output error: {}", message),
        }
    }
}

impl std::error::Error for ReportError {}

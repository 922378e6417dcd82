//! Loading XML files into queryable documents

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::xml::dom::XmlDocument;

/// A named, parsed XML document; the unit of the Document Set.
///
/// The file name (not the full path) is what a `Field` with
/// `special="_FileName"` emits into the report.
#[derive(Debug, Clone)]
pub struct XmlFile {
    name: String,
    path: PathBuf,
    document: XmlDocument,
}

impl XmlFile {
    /// Load and parse the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let document = XmlDocument::parse(&source).map_err(|e| LoadError::Xml {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(XmlFile {
            name,
            path: path.to_path_buf(),
            document,
        })
    }

    /// Build a document directly from source text, under a given name.
    /// Used by tests and callers that already hold the XML in memory.
    pub fn from_source(name: &str, source: &str) -> Result<Self, LoadError> {
        let document = XmlDocument::parse(source).map_err(|e| LoadError::Xml {
            path: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(XmlFile {
            name: name.to_string(),
            path: PathBuf::from(name),
            document,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }
}

//! Shared helpers for schema interpretation tests
#![allow(dead_code)]

use retab_core::{CsvOutput, ReportInterpreter, ReportError, XmlFile};

/// Build a Document Set from (name, source) pairs.
pub fn docs(sources: &[(&str, &str)]) -> Vec<XmlFile> {
    sources
        .iter()
        .map(|(name, source)| XmlFile::from_source(name, source).unwrap())
        .collect()
}

/// Interpret `schema` over `documents` and return the accumulated lines.
pub fn run(schema: &str, documents: &[XmlFile]) -> Vec<String> {
    try_run(schema, documents).unwrap()
}

pub fn try_run(schema: &str, documents: &[XmlFile]) -> Result<Vec<String>, ReportError> {
    let schema = XmlFile::from_source("schema.xml", schema).unwrap();
    let mut output = CsvOutput::new();
    ReportInterpreter::new(documents).run(&schema, &mut output)?;
    Ok(output.lines().to_vec())
}

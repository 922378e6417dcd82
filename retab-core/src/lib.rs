//! Report engine for retab
//!
//! This crate turns a set of XML data documents into a flat delimited report
//! under the control of a schema document. The schema is itself XML: its
//! elements (`Header`, `Repeater`, `Field`, `Total`, `NewLine`, literal text)
//! are interpreted at runtime against the loaded documents.
//!
//! The pieces, leaves first:
//!
//! - [`xml`] — the owned document tree, location-path queries, and file loading
//! - [`report::context`] — the four repeater context variants and the stack of
//!   active iteration/aggregation scopes, including location resolution
//! - [`report::interpreter`] — the recursive schema walker
//! - [`report::output`] — the structural event sink and its CSV implementation
//!
//! This is a pure library: it never touches the process environment, argv or
//! stdout. The `retab` binary in `retab-cli` provides the shell around it.

pub mod error;
pub mod report;
pub mod xml;

pub use error::{LoadError, ReportError};
pub use report::context::{RepeaterContext, RepeaterStack};
pub use report::interpreter::ReportInterpreter;
pub use report::output::{create_output, CsvOutput, ReportOutput};
pub use xml::XmlFile;

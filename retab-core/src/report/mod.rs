//! Schema interpretation and report emission

pub mod context;
pub mod interpreter;
pub mod output;

pub use context::{RepeaterContext, RepeaterStack};
pub use interpreter::ReportInterpreter;
pub use output::{create_output, CsvOutput, ReportOutput};

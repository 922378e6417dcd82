//! Command-line interface for retab
//!
//! Generates a delimited report from a set of XML data files under the
//! control of a schema document.
//!
//! Usage:
//!   retab `<schema>` [inputs]... [--filter `<regex>`] [--output `<path>`]

mod inputs;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Arg, Command};
use retab_core::{create_output, ReportInterpreter, XmlFile};

fn main() {
    env_logger::init();

    let matches = Command::new("retab")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates CSV reports from XML files, driven by a schema document")
        .arg(
            Arg::new("schema")
                .help("Path to the schema XML document")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("inputs")
                .help("XML files or directories to report over (default: current directory)")
                .num_args(0..)
                .index(2),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .short('f')
                .help("Regex applied to input file names; without it, directories contribute *.xml"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Report output path (default: a timestamped .csv in the working directory)"),
        )
        .get_matches();

    let schema = matches
        .get_one::<String>("schema")
        .expect("schema is required");
    let inputs: Vec<String> = matches
        .get_many::<String>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let filter = matches.get_one::<String>("filter").map(String::as_str);
    let output = matches.get_one::<String>("output").map(PathBuf::from);

    if let Err(e) = run(schema, &inputs, filter, output.as_deref()) {
        log::error!("report generation failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(
    schema: &str,
    inputs: &[String],
    filter: Option<&str>,
    output_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = XmlFile::load(schema)?;

    let paths = inputs::expand_inputs(inputs, filter)?;
    if paths.is_empty() {
        return Err("no input documents matched".into());
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        log::debug!("loading '{}'", path.display());
        documents.push(XmlFile::load(path)?);
    }
    log::info!("loaded {} document(s)", documents.len());

    let mut output = create_output("csv")?;
    ReportInterpreter::new(&documents).run(&schema, output.as_mut())?;

    // Flushed only after a fully successful walk; a failed run leaves no file.
    let written = output.finish(output_path)?;
    println!("Report written to {}", written.display());
    Ok(())
}

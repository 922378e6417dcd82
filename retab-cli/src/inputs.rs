//! Input enumeration and file-name filtering
//!
//! Turns the CLI's mix of files and directories into the ordered list of
//! document paths that becomes the Document Set. Argument order is
//! preserved; entries within a directory are sorted by name so File
//! repeater indices (and the report) are deterministic.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

#[derive(Debug)]
pub enum InputError {
    /// An input path does not exist
    Missing(PathBuf),
    /// A directory could not be listed
    Io { path: PathBuf, message: String },
    /// The --filter argument is not a valid regex
    BadFilter { pattern: String, message: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Missing(path) => {
                write!(f, "input file or directory not found: '{}'", path.display())
            }
            InputError::Io { path, message } => {
                write!(f, "failed to list '{}': {}", path.display(), message)
            }
            InputError::BadFilter { pattern, message } => {
                write!(f, "invalid filter '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Expand input arguments into document paths. With no inputs given, the
/// current directory is scanned. Without a filter, directories contribute
/// their `.xml` files and explicit files must carry a `.xml` extension;
/// with one, file names are matched against the regex instead.
pub fn expand_inputs(inputs: &[String], filter: Option<&str>) -> Result<Vec<PathBuf>, InputError> {
    let filter = match filter {
        Some(pattern) => Some(Regex::new(pattern).map_err(|e| InputError::BadFilter {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?),
        None => None,
    };

    let defaulted;
    let inputs: &[String] = if inputs.is_empty() {
        log::info!("no inputs given, scanning the current directory");
        defaulted = [".".to_string()];
        &defaulted
    } else {
        inputs
    };

    let mut paths = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            paths.extend(list_directory(path, filter.as_ref())?);
        } else if path.is_file() {
            if matches_name(path, filter.as_ref()) {
                paths.push(path.to_path_buf());
            }
        } else {
            return Err(InputError::Missing(path.to_path_buf()));
        }
    }
    Ok(paths)
}

fn list_directory(dir: &Path, filter: Option<&Regex>) -> Result<Vec<PathBuf>, InputError> {
    let entries = fs::read_dir(dir).map_err(|e| InputError::Io {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| InputError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_file() && matches_name(&path, filter) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn matches_name(path: &Path, filter: Option<&Regex>) -> bool {
    let name = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => name,
        None => return false,
    };
    match filter {
        Some(regex) => regex.is_match(name),
        None => path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "<Data/>").unwrap();
        path
    }

    #[test]
    fn directories_contribute_sorted_xml_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.xml");
        touch(dir.path(), "a.xml");
        touch(dir.path(), "notes.txt");

        let paths =
            expand_inputs(&[dir.path().to_string_lossy().into_owned()], None).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.xml", "b.xml"]);
    }

    #[test]
    fn argument_order_is_preserved_across_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let second = touch(dir.path(), "second.xml");
        let first = touch(dir.path(), "first.xml");

        let paths = expand_inputs(
            &[
                second.to_string_lossy().into_owned(),
                first.to_string_lossy().into_owned(),
            ],
            None,
        )
        .unwrap();
        assert_eq!(paths, [second, first]);
    }

    #[test]
    fn filter_overrides_the_xml_extension_rule() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "report_jan.xml");
        touch(dir.path(), "report_feb.xml");
        touch(dir.path(), "other.xml");

        let paths = expand_inputs(
            &[dir.path().to_string_lossy().into_owned()],
            Some("^report_"),
        )
        .unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn explicit_non_xml_files_are_skipped_without_a_filter() {
        let dir = tempfile::tempdir().unwrap();
        let txt = touch(dir.path(), "data.txt");

        let paths = expand_inputs(&[txt.to_string_lossy().into_owned()], None).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn missing_inputs_are_reported() {
        let err = expand_inputs(&["/no/such/path".to_string()], None).unwrap_err();
        assert!(matches!(err, InputError::Missing(_)));
    }

    #[test]
    fn bad_filter_is_reported() {
        let err = expand_inputs(&[".".to_string()], Some("(")).unwrap_err();
        assert!(matches!(err, InputError::BadFilter { .. }));
    }
}

//! Input selection: named files or stdin

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder path meaning "read standard input"
pub const STDIN_PLACEHOLDER: &str = "-";

/// Errors detected before any scanning starts
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Standard input ('-') can only be scanned once")]
    StdinTwice,
}

/// One opened trace source
pub struct Input {
    /// Display name (file path or `<stdin>`)
    pub name: String,
    pub reader: Box<dyn BufRead>,
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PLACEHOLDER
}

/// Open every requested input up front so that a bad argument fails before
/// any trace is scanned. No paths means stdin.
pub fn open_inputs(paths: &[PathBuf]) -> Result<Vec<Input>, InputError> {
    if paths.is_empty() {
        return Ok(vec![stdin_input()]);
    }

    if paths.iter().filter(|p| is_stdin(p)).count() > 1 {
        return Err(InputError::StdinTwice);
    }

    paths
        .iter()
        .map(|path| {
            if is_stdin(path) {
                return Ok(stdin_input());
            }
            let file = File::open(path).map_err(|source| InputError::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Input {
                name: path.display().to_string(),
                reader: Box::new(BufReader::new(file)),
            })
        })
        .collect()
}

fn stdin_input() -> Input {
    Input {
        name: "<stdin>".to_string(),
        reader: Box::new(io::stdin().lock()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_paths_means_stdin() {
        let inputs = open_inputs(&[]).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "<stdin>");
    }

    #[test]
    fn test_stdin_twice_is_rejected() {
        let paths = vec![PathBuf::from("-"), PathBuf::from("-")];
        assert!(matches!(open_inputs(&paths), Err(InputError::StdinTwice)));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.log");
        let err = open_inputs(&[missing.clone()]).err().unwrap();
        match err {
            InputError::Open { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_files_open_in_order() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        writeln!(a, "first").unwrap();
        let b = tempfile::NamedTempFile::new().unwrap();
        let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let mut inputs = open_inputs(&paths).unwrap();
        assert_eq!(inputs[0].name, a.path().display().to_string());
        let mut line = String::new();
        inputs[0].reader.read_line(&mut line).unwrap();
        assert_eq!(line, "first\n");
    }
}

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod experiment;
pub mod library;
pub mod truth;

pub use experiment::ExperimentRun;
pub use library::{extract_identifiers, index_identifiers};
pub use truth::load_truth;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Opens a text file, transparently decoding `.gz`.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(path.display().to_string()));
    }
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn split_csv_row(line: &str) -> Vec<&str> {
    line.split(',').map(|f| f.trim()).collect()
}

/// Calls `f` with the 1-based line number and fields of every non-blank row.
pub fn for_each_csv_row<F>(path: &Path, title_line: bool, mut f: F) -> Result<(), InputError>
where
    F: FnMut(usize, &[&str]) -> Result<(), InputError>,
{
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut line_no = 0usize;
    let mut skipped_title = !title_line;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() {
            continue;
        }
        if !skipped_title {
            skipped_title = true;
            continue;
        }
        let fields = split_csv_row(line);
        f(line_no, &fields)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;

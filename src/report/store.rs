use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::report::{ReportError, ReportRecord};

const RECORD_MAGIC: &[u8; 8] = b"KIRAACQ\0";
const RECORD_VERSION: u32 = 1;
pub const RECORD_EXT: &str = "rec";

impl ReportRecord {
    /// `{split:.3}-{model}-{metric}-top{N}.rec`
    pub fn default_file_name(&self) -> String {
        format!(
            "{:.3}-{}-{}-top{}.{}",
            self.split(),
            self.model(),
            self.metric(),
            self.top_n(),
            RECORD_EXT
        )
    }

    /// Writes the record to `path`, or to its default name in the working
    /// directory, and returns the path written.
    pub fn persist(&self, path: Option<&Path>) -> Result<PathBuf, ReportError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(self.default_file_name()),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let payload = rmp_serde::to_vec_named(self)?;
        let mut w = BufWriter::new(File::create(&path)?);
        w.write_all(RECORD_MAGIC)?;
        w.write_all(&RECORD_VERSION.to_le_bytes())?;
        w.write_all(&payload)?;
        w.flush()?;

        crate::debug!("wrote {} bytes to {}", payload.len() + 12, path.display());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let bytes = fs::read(path)?;
        let Some((magic, rest)) = bytes.split_first_chunk::<8>() else {
            return Err(ReportError::BadHeader(format!(
                "{} is too short",
                path.display()
            )));
        };
        if magic != RECORD_MAGIC {
            return Err(ReportError::BadHeader(format!(
                "{} has an unknown magic",
                path.display()
            )));
        }
        let Some((version, payload)) = rest.split_first_chunk::<4>() else {
            return Err(ReportError::BadHeader(format!(
                "{} is truncated",
                path.display()
            )));
        };
        let version = u32::from_le_bytes(*version);
        if version != RECORD_VERSION {
            return Err(ReportError::BadHeader(format!(
                "{} has unsupported version {}",
                path.display(),
                version
            )));
        }
        Ok(rmp_serde::from_slice(payload)?)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/store.rs"]
mod tests;

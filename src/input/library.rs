use std::collections::HashMap;
use std::path::Path;

use crate::input::{InputError, for_each_csv_row};

pub fn extract_identifiers(
    path: &Path,
    id_col: usize,
    title_line: bool,
) -> Result<Vec<String>, InputError> {
    let mut ids = Vec::new();
    for_each_csv_row(path, title_line, |line_no, fields| {
        let id = fields.get(id_col).ok_or_else(|| {
            InputError::Parse(format!(
                "library line {} has no column {} ({} columns)",
                line_no,
                id_col,
                fields.len()
            ))
        })?;
        if id.is_empty() {
            crate::warn!("library line {} has an empty identifier; skipping", line_no);
            return Ok(());
        }
        ids.push(id.to_string());
        Ok(())
    })?;

    if ids.is_empty() {
        return Err(InputError::Parse(format!(
            "library {} contains no identifiers",
            path.display()
        )));
    }
    Ok(ids)
}

/// Position of every identifier; a repeated identifier maps to its last row.
pub fn index_identifiers(ids: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        map.insert(id.clone(), i);
    }
    map
}

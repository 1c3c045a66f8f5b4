use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::context::sheet::{Sheet, SheetError};

/// Loads the role catalog from the configured spreadsheet column.
///
/// An absent or zero-byte file yields an empty catalog so the service can still
/// start. A file that exists but cannot be read, or lacks the configured column,
/// is an error.
pub fn load_roles(path: &Path, column: &str) -> Result<Vec<String>, SheetError> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Role spreadsheet not found at {}. Continuing with empty roles.",
                path.display()
            );
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(SheetError::Open {
                path: path.to_path_buf(),
                source: calamine::Error::Io(e),
            })
        }
    };
    if size == 0 {
        warn!("Role spreadsheet {} is empty", path.display());
        return Ok(Vec::new());
    }

    let sheet = Sheet::open(path)?;
    let roles = roles_from_sheet(&sheet, column)?;
    info!("Loaded {} roles from {}", roles.len(), path.display());
    Ok(roles)
}

pub fn roles_from_sheet(sheet: &Sheet, column: &str) -> Result<Vec<String>, SheetError> {
    if sheet.is_empty() {
        return Ok(Vec::new());
    }
    let index = sheet.column(column)?;
    Ok(dedup_preserving_order(sheet.column_values(index).flatten()))
}

/// Drops repeated values, keeping the first occurrence of each.
pub fn dedup_preserving_order<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

use serde_json::Value;
use tracing::debug;

use crate::error::ViewerError;
use crate::grid::column_union;
use crate::value;

/// File name for downloading the current document text verbatim.
pub const DOCUMENT_FILE_NAME: &str = "data.json";

/// File name for a table export: `<key>.csv`.
pub fn csv_file_name(key: &str) -> String {
    format!("{}.csv", key)
}

/// Renders an object-array as delimited text.
///
/// Columns are the union of member keys across all rows in first-seen
/// order. Missing and null cells are empty; embedded commas in values are
/// replaced with semicolons so the column separator stays unambiguous.
/// Every line, including the header, ends with a newline.
pub fn to_csv(rows: &[Value]) -> Result<String, ViewerError> {
    let columns = column_union(rows);
    let mut out = String::new();
    out.push_str(&columns.join(","));
    out.push('\n');

    for row in rows {
        let mut cells = Vec::with_capacity(columns.len());
        for column in &columns {
            cells.push(csv_cell(row.as_object().and_then(|m| m.get(column)))?);
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    debug!(rows = rows.len(), columns = columns.len(), "table exported");
    Ok(out)
}

fn csv_cell(value: Option<&Value>) -> Result<String, ViewerError> {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(v) if value::is_composite(v) => serde_json::to_string(v)
            .map_err(|e| ViewerError::Export(e.to_string()))?,
        Some(v) => value::canonical_string(v),
    };
    Ok(text.replace(',', ";"))
}

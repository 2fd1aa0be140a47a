use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use super::model::{RawRow, ValuesResponse, json_cell_to_string};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw sheet rows from a local snapshot file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – the values API envelope `{ "values": [[...], ...] }` or a bare array of rows
/// * `.csv`  – one sheet row per line, header row included
///
/// Rows come back untouched, header first, exactly like the remote source.
pub fn load_snapshot(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported snapshot extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON snapshot")?;
    parse_json_rows(&text)
}

/// Parse either a values envelope or a bare `[[...], ...]` array.
pub fn parse_json_rows(text: &str) -> Result<Vec<RawRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match root {
        JsonValue::Object(_) => {
            let resp: ValuesResponse =
                serde_json::from_value(root).context("decoding values envelope")?;
            Ok(resp.values)
        }
        JsonValue::Array(rows) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cells = row
                    .as_array()
                    .with_context(|| format!("Row {i} is not a JSON array"))?;
                Ok(cells.iter().map(json_cell_to_string).collect())
            })
            .collect(),
        _ => bail!("Expected a JSON object with `values` or a top-level array"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows may have different lengths (trailing empty cells are often trimmed
/// by spreadsheet exports), so the reader is flexible.
fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    reader
        .records()
        .enumerate()
        .map(|(row_no, result)| {
            let record = result.with_context(|| format!("CSV row {row_no}"))?;
            Ok(record.iter().map(|c| c.to_string()).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bare_array_and_envelope_agree() {
        let bare = parse_json_rows(r#"[["WAKTU","UNIT"],["2025-01-01 07:00:00","DT-01"]]"#).unwrap();
        let envelope =
            parse_json_rows(r#"{"values":[["WAKTU","UNIT"],["2025-01-01 07:00:00","DT-01"]]}"#)
                .unwrap();
        assert_eq!(bare, envelope);
        assert_eq!(bare[1][1], "DT-01");
    }

    #[test]
    fn rejects_scalar_json() {
        assert!(parse_json_rows("42").is_err());
        assert!(parse_json_rows(r#"[["ok"], 7]"#).is_err());
    }

    #[test]
    fn csv_keeps_header_and_ragged_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "WAKTU,UNIT,VOLUME,LOKASI").unwrap();
        writeln!(file, "2025-01-01 07:00:00,DT-01,40.5,Pit A").unwrap();
        writeln!(file, "2025-01-01 08:00:00,DT-02").unwrap();
        file.flush().unwrap();

        let rows = load_snapshot(file.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "WAKTU");
        assert_eq!(rows[1], vec!["2025-01-01 07:00:00", "DT-01", "40.5", "Pit A"]);
        assert_eq!(rows[2].len(), 2);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}

use serde::Deserialize;
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// RawRow – one spreadsheet row as returned by the data source
// ---------------------------------------------------------------------------

/// Ordered string cells, e.g. `[timestamp, unit, volume, location]`.
pub type RawRow = Vec<String>;

/// Envelope returned by the values endpoint: `{ "range": ..., "values": [[...], ...] }`.
///
/// `values` is omitted by the API when the range is empty, so it defaults to
/// an empty vector.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValuesResponse {
    #[serde(default, deserialize_with = "deserialize_rows")]
    pub values: Vec<RawRow>,
}

fn deserialize_rows<'de, D>(deserializer: D) -> Result<Vec<RawRow>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let rows: Option<Vec<Vec<JsonValue>>> = Option::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .iter()
        .map(|row| row.iter().map(json_cell_to_string).collect())
        .collect())
}

/// Stringify a single JSON cell. Unformatted sheets may hand back numbers
/// or booleans; those keep their JSON text, null becomes an empty cell.
pub fn json_cell_to_string(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// FieldMapping – which column holds what
// ---------------------------------------------------------------------------

/// Column layout of a fuel log sheet.
///
/// The sheets share the same pipeline and only differ in where the volume
/// lives and what the trailing text column means (a site name or an
/// equipment tag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub timestamp: usize,
    pub unit: usize,
    pub volume: usize,
    pub secondary: usize,
    /// Column header shown for `secondary` in the table.
    pub secondary_label: String,
}

impl FieldMapping {
    /// `WAKTU | UNIT | VOLUME | LOKASI` log sheet.
    pub fn location() -> Self {
        Self {
            timestamp: 0,
            unit: 1,
            volume: 2,
            secondary: 3,
            secondary_label: "Location".to_string(),
        }
    }

    /// `WAKTU | UNIT | VOLUME | EPC` log sheet.
    pub fn equipment() -> Self {
        Self {
            secondary_label: "EPC".to_string(),
            ..Self::location()
        }
    }

    /// Default A1 range for this layout.
    pub fn default_range(&self) -> &'static str {
        "Log!A:D"
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::location()
    }
}

// ---------------------------------------------------------------------------
// TransactionRecord – one normalized refuelling
// ---------------------------------------------------------------------------

/// A normalized fuel transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// 1-based position in the sheet (header excluded), before newest-first reordering.
    pub id: usize,
    /// Raw `"YYYY-MM-DD HH:MM:SS"` cell.
    pub timestamp: String,
    pub date: String,
    pub time: String,
    pub unit: String,
    /// Litres.
    pub volume: f64,
    /// Site name or equipment tag, depending on the sheet.
    pub secondary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_envelope_without_values_is_empty() {
        let resp: ValuesResponse =
            serde_json::from_str(r#"{"range":"Log!A1:D1","majorDimension":"ROWS"}"#).unwrap();
        assert!(resp.values.is_empty());
    }

    #[test]
    fn values_envelope_stringifies_cells() {
        let resp: ValuesResponse = serde_json::from_str(
            r#"{"values":[["WAKTU","UNIT","VOLUME","LOKASI"],["2025-01-02 08:00:00","DT-01",12.5,null]]}"#,
        )
        .unwrap();
        assert_eq!(resp.values.len(), 2);
        assert_eq!(resp.values[1], vec!["2025-01-02 08:00:00", "DT-01", "12.5", ""]);
    }

    #[test]
    fn equipment_layout_only_changes_label() {
        let loc = FieldMapping::location();
        let epc = FieldMapping::equipment();
        assert_eq!(epc.volume, loc.volume);
        assert_eq!(epc.secondary, loc.secondary);
        assert_eq!(epc.secondary_label, "EPC");
    }
}

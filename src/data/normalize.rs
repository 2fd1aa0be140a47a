use super::model::{FieldMapping, RawRow, TransactionRecord};

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// Parse a volume cell into litres.
///
/// Accepts the leading numeric prefix of the cell (so `"12.5 L"` is `12.5`).
/// Missing, empty, non-numeric or non-finite input yields `0.0`; a bad cell
/// never fails the batch.
pub fn parse_volume(cell: Option<&str>) -> f64 {
    let Some(text) = cell else {
        return 0.0;
    };
    let text = text.trim_start();
    let prefix = &text[..numeric_prefix_len(text)];
    match prefix.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Length in bytes of the longest `[+-]?digits[.digits][e[+-]digits]` prefix.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    // Exponent only counts when followed by at least one digit.
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// Split `"2025-01-02 08:15:00"` into `("2025-01-02", "08:15:00")` on the first space.
pub fn split_timestamp(timestamp: &str) -> (String, String) {
    match timestamp.split_once(' ') {
        Some((date, time)) => (date.to_string(), time.to_string()),
        None => (timestamp.to_string(), String::new()),
    }
}

fn cell(row: &RawRow, idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Turn raw sheet rows into transaction records, newest first.
///
/// * the first row is the header and is skipped
/// * `id` is the 1-based data row position in the sheet
/// * rows with an empty timestamp are dropped
pub fn normalize_rows(rows: &[RawRow], mapping: &FieldMapping) -> Vec<TransactionRecord> {
    let mut records: Vec<TransactionRecord> = rows
        .iter()
        .skip(1)
        .enumerate()
        .filter_map(|(i, row)| {
            let timestamp = cell(row, mapping.timestamp);
            if timestamp.is_empty() {
                return None;
            }
            let (date, time) = split_timestamp(&timestamp);
            Some(TransactionRecord {
                id: i + 1,
                timestamp,
                date,
                time,
                unit: cell(row, mapping.unit),
                volume: parse_volume(row.get(mapping.volume).map(String::as_str)),
                secondary: cell(row, mapping.secondary),
            })
        })
        .collect();

    records.reverse();
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn parse_volume_defaults_to_zero() {
        assert_eq!(parse_volume(Some("abc")), 0.0);
        assert_eq!(parse_volume(Some("")), 0.0);
        assert_eq!(parse_volume(None), 0.0);
        assert_eq!(parse_volume(Some(".")), 0.0);
        assert_eq!(parse_volume(Some("-")), 0.0);
    }

    #[test]
    fn parse_volume_reads_numbers() {
        assert_eq!(parse_volume(Some("12.5")), 12.5);
        assert_eq!(parse_volume(Some("  40")), 40.0);
        assert_eq!(parse_volume(Some("12.5 L")), 12.5);
        assert_eq!(parse_volume(Some(".5")), 0.5);
        assert_eq!(parse_volume(Some("1e2")), 100.0);
        assert_eq!(parse_volume(Some("3e")), 3.0);
        // comma is not a decimal separator
        assert_eq!(parse_volume(Some("1,5")), 1.0);
    }

    #[test]
    fn split_timestamp_on_first_space() {
        assert_eq!(
            split_timestamp("2025-01-02 08:15:00"),
            ("2025-01-02".to_string(), "08:15:00".to_string())
        );
        assert_eq!(split_timestamp("2025-01-02"), ("2025-01-02".to_string(), String::new()));
        assert_eq!(
            split_timestamp("2025-01-02 08:15 WIB"),
            ("2025-01-02".to_string(), "08:15 WIB".to_string())
        );
    }

    #[test]
    fn normalize_skips_header_drops_blank_and_reverses() {
        let rows = vec![
            row(&["WAKTU", "UNIT", "VOLUME", "LOKASI"]),
            row(&["2025-01-01 07:00:00", "DT-01", "10", "Pit A"]),
            row(&["", "DT-02", "5", "Pit B"]),
            row(&["2025-01-02 09:30:00", "DT-02", "abc"]),
            row(&[]),
        ];
        let records = normalize_rows(&rows, &FieldMapping::location());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 3);
        assert_eq!(records[0].unit, "DT-02");
        assert_eq!(records[0].volume, 0.0);
        assert_eq!(records[0].secondary, "");
        assert_eq!(records[0].date, "2025-01-02");
        assert_eq!(records[0].time, "09:30:00");

        assert_eq!(records[1].id, 1);
        assert_eq!(records[1].volume, 10.0);
        assert_eq!(records[1].secondary, "Pit A");
    }

    #[test]
    fn normalize_header_only_is_empty() {
        let rows = vec![row(&["WAKTU", "UNIT", "VOLUME", "LOKASI"])];
        assert!(normalize_rows(&rows, &FieldMapping::location()).is_empty());
        assert!(normalize_rows(&[], &FieldMapping::location()).is_empty());
    }

    #[test]
    fn normalize_follows_mapping() {
        let mapping = FieldMapping {
            timestamp: 0,
            unit: 1,
            volume: 3,
            secondary: 2,
            secondary_label: "EPC".to_string(),
        };
        let rows = vec![
            row(&["WAKTU", "UNIT", "EPC", "VOLUME"]),
            row(&["2025-03-04 10:00:00", "EX-7", "EPC-12", "55.25"]),
        ];
        let records = normalize_rows(&rows, &mapping);
        assert_eq!(records[0].volume, 55.25);
        assert_eq!(records[0].secondary, "EPC-12");
    }

    #[test]
    fn unfiltered_view_is_the_normalized_set() {
        use crate::data::filter::{Period, UnitFilter, filtered_indices};

        let rows = vec![
            row(&["WAKTU", "UNIT", "VOLUME", "LOKASI"]),
            row(&["2025-01-01 07:00:00", "DT-01", "10", "Pit A"]),
            row(&["", "DT-02", "5", "Pit B"]),
            row(&["01/02/2025 08:00", "LV-21", "7.5", "Workshop"]),
            row(&["2025-01-03 09:30:00", "DT-02", "n/a"]),
        ];
        let records = normalize_rows(&rows, &FieldMapping::location());
        let ids: Vec<usize> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 1]);

        let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let indices = filtered_indices(&records, Period::All, &UnitFilter::All, today);
        assert_eq!(indices, (0..records.len()).collect::<Vec<_>>());

        let visible: Vec<TransactionRecord> = indices.iter().map(|&i| records[i].clone()).collect();
        assert_eq!(visible, records);
    }
}

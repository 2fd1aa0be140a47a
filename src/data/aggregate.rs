use std::collections::{BTreeMap, HashMap, HashSet};

use super::model::TransactionRecord;

/// Litres delivered to one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVolume {
    pub name: String,
    pub volume: f64,
}

/// Litres delivered on one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DateVolume {
    pub date: String,
    pub volume: f64,
}

/// Statistics and chart series for a filtered record set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub total_volume: f64,
    pub total_transactions: usize,
    pub unique_units: usize,
    /// `0.0` for an empty set.
    pub average_volume: f64,
    /// First-seen unit order, volumes rounded to cents.
    pub volume_by_unit: Vec<UnitVolume>,
    /// Ascending by date string, volumes rounded to cents.
    pub volume_by_date: Vec<DateVolume>,
}

/// Aggregate records in iteration order. Sums are unrounded; only the chart
/// series are rounded, per bucket.
pub fn summarize<'a>(records: impl IntoIterator<Item = &'a TransactionRecord>) -> Summary {
    let mut total_volume = 0.0;
    let mut total_transactions = 0usize;
    let mut units: HashSet<&str> = HashSet::new();

    let mut unit_slots: HashMap<&str, usize> = HashMap::new();
    let mut by_unit: Vec<(&str, f64)> = Vec::new();
    let mut by_date: BTreeMap<&str, f64> = BTreeMap::new();

    for r in records {
        total_volume += r.volume;
        total_transactions += 1;
        units.insert(r.unit.as_str());

        let slot = *unit_slots.entry(r.unit.as_str()).or_insert_with(|| {
            by_unit.push((r.unit.as_str(), 0.0));
            by_unit.len() - 1
        });
        by_unit[slot].1 += r.volume;

        *by_date.entry(r.date.as_str()).or_insert(0.0) += r.volume;
    }

    let average_volume = if total_transactions > 0 {
        total_volume / total_transactions as f64
    } else {
        0.0
    };

    Summary {
        total_volume,
        total_transactions,
        unique_units: units.len(),
        average_volume,
        volume_by_unit: by_unit
            .into_iter()
            .map(|(name, v)| UnitVolume {
                name: name.to_string(),
                volume: round_cents(v),
            })
            .collect(),
        volume_by_date: by_date
            .into_iter()
            .map(|(date, v)| DateVolume {
                date: date.to_string(),
                volume: round_cents(v),
            })
            .collect(),
    }
}

/// Round to two decimals, half away from zero, on the value as it prints.
///
/// Works on the shortest decimal rendering so `2.005` (stored as
/// `2.00499999…`) rounds to `2.01` like the figure a user typed.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if value == 0.0 {
        return 0.0;
    }
    let text = value.abs().to_string();
    let Some((int_part, frac)) = text.split_once('.') else {
        return value;
    };
    if frac.len() <= 2 {
        return value;
    }
    let truncated: f64 = match format!("{int_part}.{}", &frac[..2]).parse() {
        Ok(v) => v,
        Err(_) => return value,
    };
    let mut hundredths = (truncated * 100.0).round();
    if frac.as_bytes()[2] >= b'5' {
        hundredths += 1.0;
    }
    if hundredths == 0.0 {
        // no "-0.00 L"
        return 0.0;
    }
    (hundredths / 100.0).copysign(value)
}

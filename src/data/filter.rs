use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

use super::model::TransactionRecord;

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Time window applied to the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Today,
    Yesterday,
    /// Last 7 days, open-ended towards the future.
    Week,
    /// Since the same day of the previous month, open-ended towards the future.
    Month,
    All,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Today,
        Period::Yesterday,
        Period::Week,
        Period::Month,
        Period::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Yesterday => "yesterday",
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Yesterday => "Yesterday",
            Period::Week => "Last 7 days",
            Period::Month => "Last 30 days",
            Period::All => "All data",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Period::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

/// Unit selector: the `all` sentinel or one exact unit id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnitFilter {
    #[default]
    All,
    Unit(String),
}

impl UnitFilter {
    pub fn matches(&self, unit: &str) -> bool {
        match self {
            UnitFilter::All => true,
            UnitFilter::Unit(u) => u == unit,
        }
    }
}

impl fmt::Display for UnitFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitFilter::All => write!(f, "All units"),
            UnitFilter::Unit(u) => write!(f, "{u}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Date predicate
// ---------------------------------------------------------------------------

enum DateBound {
    Any,
    Exactly(String),
    OnOrAfter(NaiveDate),
}

impl DateBound {
    fn for_period(period: Period, today: NaiveDate) -> Self {
        match period {
            Period::All => DateBound::Any,
            Period::Today => DateBound::Exactly(iso(today)),
            Period::Yesterday => DateBound::Exactly(iso(today - Days::new(1))),
            Period::Week => DateBound::OnOrAfter(today - Days::new(7)),
            Period::Month => DateBound::OnOrAfter(month_ago(today)),
        }
    }

    fn matches(&self, date: &str) -> bool {
        match self {
            DateBound::Any => true,
            DateBound::Exactly(day) => date == day,
            // Unparseable dates never satisfy a lower bound.
            DateBound::OnOrAfter(min) => parse_date(date).is_some_and(|d| d >= *min),
        }
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Same day number in the previous month. Days past the end of that month
/// overflow into the next one (31 Mar → 3 Mar in a non-leap year).
pub fn month_ago(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(today.day() - 1))))
        .unwrap_or(NaiveDate::MIN)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records inside `period` and matching `unit`, in order.
///
/// `today` is the local calendar date the period is anchored on.
pub fn filtered_indices(
    records: &[TransactionRecord],
    period: Period,
    unit: &UnitFilter,
    today: NaiveDate,
) -> Vec<usize> {
    let bound = DateBound::for_period(period, today);
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| bound.matches(&r.date) && unit.matches(&r.unit))
        .map(|(i, _)| i)
        .collect()
}

/// Distinct unit ids of the full record set, first-seen order.
pub fn unit_options(records: &[TransactionRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.unit.as_str()))
        .map(|r| r.unit.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: usize, date: &str, unit: &str) -> TransactionRecord {
        TransactionRecord {
            id,
            timestamp: format!("{date} 08:00:00"),
            date: date.to_string(),
            time: "08:00:00".to_string(),
            unit: unit.to_string(),
            volume: 10.0,
            secondary: String::new(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn today_and_yesterday_are_exact() {
        let today = day("2025-06-15");
        let records = vec![
            rec(1, "2025-06-15", "A"),
            rec(2, "2025-06-14", "A"),
            rec(3, "2025-06-16", "A"),
        ];
        assert_eq!(filtered_indices(&records, Period::Today, &UnitFilter::All, today), vec![0]);
        assert_eq!(
            filtered_indices(&records, Period::Yesterday, &UnitFilter::All, today),
            vec![1]
        );
    }

    #[test]
    fn yesterday_crosses_month_boundary() {
        let records = vec![rec(1, "2025-02-28", "A")];
        assert_eq!(
            filtered_indices(&records, Period::Yesterday, &UnitFilter::All, day("2025-03-01")),
            vec![0]
        );
    }

    #[test]
    fn week_is_inclusive_of_seventh_day() {
        let today = day("2025-06-15");
        let records = vec![
            rec(1, "2025-06-08", "A"),
            rec(2, "2025-06-07", "A"),
            rec(3, "2025-06-20", "A"),
        ];
        // future-dated records have no upper bound
        assert_eq!(filtered_indices(&records, Period::Week, &UnitFilter::All, today), vec![0, 2]);
    }

    #[test]
    fn month_uses_calendar_arithmetic() {
        assert_eq!(month_ago(day("2025-06-15")), day("2025-05-15"));
        assert_eq!(month_ago(day("2025-01-10")), day("2024-12-10"));
        assert_eq!(month_ago(day("2025-03-31")), day("2025-03-03"));
        assert_eq!(month_ago(day("2024-03-31")), day("2024-03-02"));

        let records = vec![rec(1, "2025-05-15", "A"), rec(2, "2025-05-14", "A")];
        assert_eq!(
            filtered_indices(&records, Period::Month, &UnitFilter::All, day("2025-06-15")),
            vec![0]
        );
    }

    #[test]
    fn unparseable_dates_only_pass_all() {
        let today = day("2025-06-15");
        let records = vec![rec(1, "15/06/2025", "A"), rec(2, "", "A")];
        assert!(filtered_indices(&records, Period::Week, &UnitFilter::All, today).is_empty());
        assert!(filtered_indices(&records, Period::Month, &UnitFilter::All, today).is_empty());
        assert_eq!(filtered_indices(&records, Period::All, &UnitFilter::All, today), vec![0, 1]);
    }

    #[test]
    fn unit_and_period_compose() {
        let today = day("2025-06-15");
        let records = vec![
            rec(1, "2025-06-15", "A"),
            rec(2, "2025-06-15", "B"),
            rec(3, "2025-06-01", "A"),
        ];
        let unit = UnitFilter::Unit("A".to_string());
        assert_eq!(filtered_indices(&records, Period::Today, &unit, today), vec![0]);
        assert_eq!(filtered_indices(&records, Period::All, &unit, today), vec![0, 2]);
        assert!(filtered_indices(
            &records,
            Period::All,
            &UnitFilter::Unit("a".to_string()),
            today
        )
        .is_empty());
    }

    #[test]
    fn all_all_keeps_everything_in_order() {
        let records = vec![rec(3, "x", "B"), rec(2, "2025-01-01", "A"), rec(1, "", "")];
        assert_eq!(
            filtered_indices(&records, Period::All, &UnitFilter::All, day("2025-06-15")),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn unit_options_first_seen_order() {
        let records = vec![
            rec(1, "2025-06-15", "B"),
            rec(2, "2025-06-15", "A"),
            rec(3, "2025-06-15", "B"),
        ];
        assert_eq!(unit_options(&records), vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn period_ids_round_trip() {
        for p in Period::ALL {
            assert_eq!(Period::from_str(p.as_str()), Some(p));
        }
        assert_eq!(Period::from_str("decade"), None);
    }
}

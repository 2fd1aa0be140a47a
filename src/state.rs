use chrono::{DateTime, Local, NaiveDate};

use crate::color::UnitColors;
use crate::data::aggregate::{Summary, summarize};
use crate::data::filter::{Period, UnitFilter, filtered_indices, unit_options};
use crate::data::model::TransactionRecord;
use crate::prefs::ThemeChoice;
use crate::refresh::FetchOutcome;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Data acquisition phase, derived from the flags in [`AppState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// First fetch still running and nothing to show yet.
    InitialLoading,
    Ready,
    /// A background fetch is in flight; current data stays visible.
    Refreshing,
    /// Last fetch failed; previous data (possibly none) stays visible.
    Error,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current record set, newest first. Replaced wholesale on every successful fetch.
    pub records: Vec<TransactionRecord>,

    pub period: Period,
    pub unit: UnitFilter,

    /// Indices into `records` passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Statistics of the visible records (cached).
    pub summary: Summary,

    /// Distinct units of the full record set, for the unit selector.
    pub unit_options: Vec<String>,

    pub unit_colors: UnitColors,

    /// Error message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,

    /// Completion time of the last successful fetch.
    pub last_update: Option<DateTime<Local>>,

    /// True until the first fetch completes, whatever its outcome.
    pub loading: bool,

    in_flight: usize,

    pub theme: ThemeChoice,

    /// Local date the period filter is anchored on.
    pub today: NaiveDate,

    /// Header of the secondary text column.
    pub secondary_label: String,

    /// Where the rows come from, for the header.
    pub source_label: String,
}

impl AppState {
    pub fn new(today: NaiveDate, theme: ThemeChoice, secondary_label: &str) -> Self {
        Self {
            records: Vec::new(),
            period: Period::default(),
            unit: UnitFilter::default(),
            visible_indices: Vec::new(),
            summary: Summary::default(),
            unit_options: Vec::new(),
            unit_colors: UnitColors::default(),
            error: None,
            last_update: None,
            loading: true,
            in_flight: 0,
            theme,
            today,
            secondary_label: secondary_label.to_string(),
            source_label: String::new(),
        }
    }

    pub fn phase(&self) -> LoadPhase {
        if self.loading && self.records.is_empty() {
            LoadPhase::InitialLoading
        } else if self.is_refreshing() {
            LoadPhase::Refreshing
        } else if self.error.is_some() {
            LoadPhase::Error
        } else {
            LoadPhase::Ready
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight > 0
    }

    /// A fetch was started.
    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
    }

    /// Apply a completed fetch. Success replaces the record set; failure keeps it.
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = false;

        match outcome.result {
            Ok(records) => {
                self.set_records(records);
                self.error = None;
                self.last_update = Some(outcome.completed_at);
            }
            Err(e) => {
                log::error!("Error fetching data: {e:#}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Account for a fetch whose result no longer applies, e.g. one started
    /// against a source that has since been replaced.
    pub fn discard_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Ingest a new record set, rebuild unit options and colours, refilter.
    pub fn set_records(&mut self, records: Vec<TransactionRecord>) {
        self.unit_options = unit_options(&records);
        self.unit_colors = UnitColors::new(&self.unit_options);
        self.records = records;
        self.refilter();
    }

    pub fn set_period(&mut self, period: Period) {
        if self.period != period {
            self.period = period;
            self.refilter();
        }
    }

    pub fn set_unit(&mut self, unit: UnitFilter) {
        if self.unit != unit {
            self.unit = unit;
            self.refilter();
        }
    }

    /// Move the period anchor, e.g. after midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        if self.today != today {
            self.today = today;
            self.refilter();
        }
    }

    /// Recompute `visible_indices` and `summary` after any input change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.records, self.period, &self.unit, self.today);
        self.summary = summarize(self.visible_records());
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.visible_indices.iter().map(|&i| &self.records[i])
    }
}

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::data::model::{FieldMapping, TransactionRecord};
use crate::data::normalize::normalize_rows;
use crate::data::source::{DataSource, FetchError};

// ---------------------------------------------------------------------------
// RefreshScheduler – fixed-rate timer driven by the frame loop
// ---------------------------------------------------------------------------

/// Decides when the next background fetch is due.
///
/// The clock is passed in, so the frame loop (or a test) owns time. The first
/// `poll` fires immediately, later ones once per `interval`. After `dispose`
/// it never fires again.
#[derive(Debug)]
pub struct RefreshScheduler {
    interval: Duration,
    next_due: Option<Instant>,
    disposed: bool,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            disposed: false,
        }
    }

    /// Returns `true` when a fetch should start now.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        match self.next_due {
            None => {
                self.next_due = Some(now + self.interval);
                true
            }
            Some(due) if now >= due => {
                // Missed ticks (e.g. window hidden) collapse into one fetch.
                let mut next = due + self.interval;
                while next <= now {
                    next += self.interval;
                }
                self.next_due = Some(next);
                true
            }
            Some(_) => false,
        }
    }

    /// How long the frame loop may sleep before polling again.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if self.disposed {
            return None;
        }
        Some(
            self.next_due
                .map(|due| due.saturating_duration_since(now))
                .unwrap_or(Duration::ZERO),
        )
    }

    /// Cancel the timer for good.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.next_due = None;
    }
}

// ---------------------------------------------------------------------------
// FetchWorker – runs fetches off the UI thread
// ---------------------------------------------------------------------------

/// Result of one completed fetch.
#[derive(Debug)]
pub struct FetchOutcome {
    pub result: Result<Vec<TransactionRecord>, FetchError>,
    pub completed_at: DateTime<Local>,
    /// Source generation the fetch was started against.
    pub generation: u64,
}

/// Spawns one thread per fetch and collects outcomes in completion order.
///
/// Fetches are neither de-duplicated nor cancelled; whichever finishes last
/// is applied last. Every started fetch yields exactly one outcome, even when
/// its thread cannot be spawned.
pub struct FetchWorker {
    source: Arc<dyn DataSource>,
    mapping: FieldMapping,
    generation: u64,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn DataSource>, mapping: FieldMapping) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            mapping,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Swap the data source. In-flight fetches of the old source still report
    /// back, but [`is_current`](Self::is_current) no longer holds for them.
    pub fn set_source(&mut self, source: Arc<dyn DataSource>) {
        self.source = source;
        self.generation += 1;
    }

    /// Whether `outcome` came from the source currently in use.
    pub fn is_current(&self, outcome: &FetchOutcome) -> bool {
        outcome.generation == self.generation
    }

    /// Start a fetch. `on_done` runs on the worker thread after the outcome is queued.
    pub fn spawn(&self, on_done: impl FnOnce() + Send + 'static) {
        let source = Arc::clone(&self.source);
        let mapping = self.mapping.clone();
        let tx = self.tx.clone();
        let generation = self.generation;

        let spawned = thread::Builder::new()
            .name("bbm-fetch".to_string())
            .spawn(move || {
                let result = source.fetch().map(|rows| {
                    let records = normalize_rows(&rows, &mapping);
                    log::info!(
                        "Fetched {} rows, {} records from {}",
                        rows.len(),
                        records.len(),
                        source.describe()
                    );
                    records
                });
                let outcome = FetchOutcome {
                    result,
                    completed_at: Local::now(),
                    generation,
                };
                if tx.send(outcome).is_err() {
                    log::debug!("Fetch finished after the dashboard closed");
                }
                on_done();
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn fetch thread: {e}");
            self.queue_failure(FetchError::Spawn(e));
        }
    }

    /// Report a fetch that never ran, so the caller still sees it finish.
    fn queue_failure(&self, error: FetchError) {
        let outcome = FetchOutcome {
            result: Err(error),
            completed_at: Local::now(),
            generation: self.generation,
        };
        // rx lives in self, so this cannot fail
        let _ = self.tx.send(outcome);
    }

    /// All outcomes that arrived since the last call, in completion order.
    pub fn drain(&self) -> Vec<FetchOutcome> {
        self.rx.try_iter().collect()
    }
}

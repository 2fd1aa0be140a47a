use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::loader::load_snapshot;
use super::model::{RawRow, ValuesResponse};

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a fetch produced no rows. The `Display` text is what the banner shows.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch data from Google Sheets")]
    Status(reqwest::StatusCode),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Could not read snapshot: {0:#}")]
    Snapshot(anyhow::Error),
    #[error("No data source configured (set BBM_SPREADSHEET_ID and BBM_API_KEY, or open a snapshot)")]
    NotConfigured,
    #[error("Could not start background fetch: {0}")]
    Spawn(std::io::Error),
}

// ---------------------------------------------------------------------------
// DataSource – anything that returns sheet rows
// ---------------------------------------------------------------------------

/// A read-only source of raw rows, header row first.
///
/// Called from worker threads, hence `Send + Sync`.
pub trait DataSource: Send + Sync {
    /// Short human-readable origin shown in the header.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Vec<RawRow>, FetchError>;
}

/// Google Sheets values API.
pub struct SheetsSource {
    client: reqwest::blocking::Client,
    spreadsheet_id: String,
    range: String,
    api_key: String,
}

impl SheetsSource {
    pub fn new(spreadsheet_id: &str, range: &str, api_key: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Request URL without the key.
    pub fn url(&self) -> String {
        format!("{SHEETS_ENDPOINT}/{}/values/{}", self.spreadsheet_id, self.range)
    }
}

impl DataSource for SheetsSource {
    fn describe(&self) -> String {
        format!("Google Sheets · {}", self.range)
    }

    fn fetch(&self) -> Result<Vec<RawRow>, FetchError> {
        let response = self
            .client
            .get(self.url())
            .query(&[("key", self.api_key.as_str())])
            .send()?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body: ValuesResponse = response.json()?;
        Ok(body.values)
    }
}

/// Local `.json` / `.csv` snapshot, re-read on every fetch.
pub struct SnapshotSource {
    pub path: PathBuf,
}

impl DataSource for SnapshotSource {
    fn describe(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!("Snapshot · {name}")
    }

    fn fetch(&self) -> Result<Vec<RawRow>, FetchError> {
        load_snapshot(&self.path).map_err(FetchError::Snapshot)
    }
}

/// Placeholder used until credentials or a snapshot are provided.
pub struct UnconfiguredSource;

impl DataSource for UnconfiguredSource {
    fn describe(&self) -> String {
        "Not configured".to_string()
    }

    fn fetch(&self) -> Result<Vec<RawRow>, FetchError> {
        Err(FetchError::NotConfigured)
    }
}

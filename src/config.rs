use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::data::filter::Period;
use crate::data::model::FieldMapping;

const DEFAULT_REFRESH_SECS: u64 = 30;
const DEFAULT_PREFS_PATH: &str = "bbm-dashboard.json";

/// Where rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Sheets {
        spreadsheet_id: String,
        range: String,
        api_key: String,
    },
    Snapshot(PathBuf),
    Unconfigured,
}

/// Configuration loaded from environment variables (optionally via `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub mapping: FieldMapping,
    pub refresh_interval: Duration,
    /// Period selected at startup.
    pub initial_period: Period,
    pub prefs_path: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// * `BBM_SNAPSHOT` wins over the Sheets settings when both are set.
    /// * `BBM_SPREADSHEET_ID` + `BBM_API_KEY` select the remote source; `BBM_RANGE`
    ///   defaults to the layout's range.
    /// * `BBM_LAYOUT` is `location` (default) or `epc`; `BBM_VOLUME_COLUMN` and
    ///   `BBM_SECONDARY_COLUMN` override its column indices (0-based).
    /// * `BBM_PERIOD` picks the initial period (`today` by default).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut mapping = match var("BBM_LAYOUT").as_deref() {
            None | Some("location") => FieldMapping::location(),
            Some("epc") => FieldMapping::equipment(),
            Some(other) => bail!("BBM_LAYOUT must be `location` or `epc`, got `{other}`"),
        };
        if let Some(col) = var("BBM_VOLUME_COLUMN") {
            mapping.volume = col
                .parse()
                .with_context(|| format!("BBM_VOLUME_COLUMN is not a column index: `{col}`"))?;
        }
        if let Some(col) = var("BBM_SECONDARY_COLUMN") {
            mapping.secondary = col
                .parse()
                .with_context(|| format!("BBM_SECONDARY_COLUMN is not a column index: `{col}`"))?;
        }

        let source = match (var("BBM_SNAPSHOT"), var("BBM_SPREADSHEET_ID"), var("BBM_API_KEY")) {
            (Some(path), _, _) => SourceConfig::Snapshot(PathBuf::from(path)),
            (None, Some(spreadsheet_id), Some(api_key)) => SourceConfig::Sheets {
                spreadsheet_id,
                range: var("BBM_RANGE").unwrap_or_else(|| mapping.default_range().to_string()),
                api_key,
            },
            (None, Some(_), None) => bail!("BBM_SPREADSHEET_ID is set but BBM_API_KEY is missing"),
            _ => SourceConfig::Unconfigured,
        };

        let refresh_secs = match var("BBM_REFRESH_SECS") {
            Some(s) => s
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .with_context(|| format!("BBM_REFRESH_SECS must be a positive integer, got `{s}`"))?,
            None => DEFAULT_REFRESH_SECS,
        };

        let initial_period = match var("BBM_PERIOD") {
            Some(p) => Period::from_str(&p).with_context(|| {
                format!("BBM_PERIOD must be one of today, yesterday, week, month, all; got `{p}`")
            })?,
            None => Period::default(),
        };

        let prefs_path = var("BBM_PREFS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH));

        Ok(Self {
            source,
            mapping,
            refresh_interval: Duration::from_secs(refresh_secs),
            initial_period,
            prefs_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.source, SourceConfig::Unconfigured);
        assert_eq!(cfg.mapping, FieldMapping::location());
        assert_eq!(cfg.refresh_interval, Duration::from_secs(30));
        assert_eq!(cfg.initial_period, Period::Today);
        assert_eq!(cfg.prefs_path, PathBuf::from("bbm-dashboard.json"));
    }

    #[test]
    fn sheets_source_with_default_range() {
        let cfg = load(&[("BBM_SPREADSHEET_ID", "abc"), ("BBM_API_KEY", "k")]).unwrap();
        assert_eq!(
            cfg.source,
            SourceConfig::Sheets {
                spreadsheet_id: "abc".to_string(),
                range: "Log!A:D".to_string(),
                api_key: "k".to_string(),
            }
        );
    }

    #[test]
    fn snapshot_wins() {
        let cfg = load(&[
            ("BBM_SNAPSHOT", "data.csv"),
            ("BBM_SPREADSHEET_ID", "abc"),
            ("BBM_API_KEY", "k"),
        ])
        .unwrap();
        assert_eq!(cfg.source, SourceConfig::Snapshot(PathBuf::from("data.csv")));
    }

    #[test]
    fn epc_layout_with_overrides() {
        let cfg = load(&[
            ("BBM_LAYOUT", "epc"),
            ("BBM_VOLUME_COLUMN", "3"),
            ("BBM_SECONDARY_COLUMN", "2"),
        ])
        .unwrap();
        assert_eq!(cfg.mapping.secondary_label, "EPC");
        assert_eq!(cfg.mapping.volume, 3);
        assert_eq!(cfg.mapping.secondary, 2);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(load(&[("BBM_LAYOUT", "tank")]).is_err());
        assert!(load(&[("BBM_REFRESH_SECS", "0")]).is_err());
        assert!(load(&[("BBM_REFRESH_SECS", "soon")]).is_err());
        assert!(load(&[("BBM_VOLUME_COLUMN", "C")]).is_err());
        assert!(load(&[("BBM_SPREADSHEET_ID", "abc")]).is_err());
        assert!(load(&[("BBM_PERIOD", "decade")]).is_err());
    }

    #[test]
    fn initial_period_from_env() {
        let cfg = load(&[("BBM_PERIOD", "week")]).unwrap();
        assert_eq!(cfg.initial_period, Period::Week);
    }

    #[test]
    fn blank_values_are_ignored() {
        let cfg = load(&[("BBM_REFRESH_SECS", "  "), ("BBM_SNAPSHOT", "")]).unwrap();
        assert_eq!(cfg.refresh_interval, Duration::from_secs(30));
        assert_eq!(cfg.source, SourceConfig::Unconfigured);
    }
}

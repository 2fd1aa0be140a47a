/// Data layer: core types, fetching, normalizing, filtering and aggregation.
///
/// Architecture:
/// ```text
///  Google Sheets / .json / .csv snapshot
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  fetch → Vec<RawRow> (header first)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  FieldMapping → Vec<TransactionRecord>, newest first
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  period + unit predicates → visible indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  totals, per-unit and per-day series
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod source;

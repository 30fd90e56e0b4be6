/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → RecordTable (required columns checked)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordTable │  Vec<Record>, column index, read-only
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  grouping, quartiles, density, bins
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;

/// Data layer: core types, loading, and per-species grouping.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Record>, file order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  distinct labels → SpeciesGroup per label
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;

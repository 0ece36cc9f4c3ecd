/// Data layer: table model, loading, and row filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  null / not-null predicates → row indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

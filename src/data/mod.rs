/// Data layer: core types, loading, filtering and summary statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet  (uploaded bytes)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Schema (name → numeric | categorical), Vec<Row>
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │   │  stats    │  overview + describe()
///   └──────────┘   └──────────┘
///   domains, allow-lists → filtered Table
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

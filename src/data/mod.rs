/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        built-in sample
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                  ┌──────────┐
///   │  loader   │  parse file     │  sample   │
///   └──────────┘                  └──────────┘
///        └──────────────┬───────────────┘
///                       ▼
///                ┌────────────┐
///                │  Dataset    │  Arc<[Observation]>, loaded once
///                └────────────┘
///                       │
///                       ▼
///                ┌────────────┐
///                │  filter     │  species selection → DatasetView
///                └────────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;

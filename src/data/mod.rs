/// Data layer: core types, loading, filtering and the derived view.
///
/// Architecture:
/// ```text
///  bundled csv / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ Arc<Dataset>  │  Vec<Record>, shared read-only
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FilteredView  │  FilterState → cached indices
///   └──────────────┘
///        │
///        ├──► stats   (value boxes)
///        └──► grid    (table filters) ──► export
/// ```

pub mod export;
pub mod filter;
pub mod grid;
pub mod loader;
pub mod model;
pub mod stats;
pub mod view;

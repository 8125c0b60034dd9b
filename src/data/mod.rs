/// Data layer: header resolution, cell cleaning, loading and merging.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  loader   │────▶│  header   │  logical field → source column
///   └──────────┘      └──────────┘
///        │            ┌──────────┐
///        │───────────▶│  clean    │  missing tokens, numeric coercion
///        │            └──────────┘
///        ▼
///   ┌───────────────────┐
///   │ PatientCollection  │  Vec<PatientRecord>, onset always present
///   └───────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  merge    │  fill absent fields from a donor-keyed table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  sex predicates → visible indices (viewer)
///   └──────────┘
/// ```

pub mod clean;
pub mod error;
pub mod filter;
pub mod header;
pub mod loader;
pub mod merge;
pub mod model;

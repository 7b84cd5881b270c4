/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  clean price + rating, drop bad rows → ProductTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ProductTable  │  Vec<ProductRecord>, source order, read-only
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  price interval + rating floor → FilteredView (indices)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

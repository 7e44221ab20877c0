/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  synthetic / .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  LanguageSource + LoadChannel (worker thread)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Atlas    │  Vec<Language>, family index
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────────────┐
///   │ region / family / features │  pure aggregations → plain maps
///   └────────────────────────────┘
/// ```
pub mod analysis;
pub mod family;
pub mod features;
pub mod loader;
pub mod model;
pub mod region;
pub mod source;
pub mod synthetic;

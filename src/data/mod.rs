/// Data layer: coercion, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  survey .csv (',' or ';')
///        │
///        ▼
///   ┌──────────┐   ┌──────────┐
///   │  loader   │──▶│  coerce   │  numeric cells → Measure, POINT → lat/lon
///   └──────────┘   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CleanedTable  │  immutable, shared behind Arc (see cache)
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  topic + age group, then locations → Subset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  mean Data_Value per group
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod coerce;
pub mod filter;
pub mod loader;
pub mod model;

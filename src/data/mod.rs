/// Data layer: core types, loading, and view derivation.
///
/// Architecture:
/// ```text
///  final_renewables_dataset.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → EnergyTable (cached per process)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ EnergyTable   │  Vec<CountryYearRecord>, (country, year) index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  pure derivations → snapshot, shares, rankings
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod views;

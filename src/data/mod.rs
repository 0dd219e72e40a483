/// Data layer: run identity, loading, indexing and selection.
///
/// Architecture:
/// ```text
///  naca_2412_i-3.dat  naca_2412_i5.dat  ...
///        │
///        ▼
///   ┌──────────┐
///   │   name    │  filename stem → (airfoil, angle)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  table → TimeSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetIndex  │  reynolds → airfoil → angle → Curve
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  airfoil / angle predicates → selected curves
///   └──────────┘
/// ```

pub mod filter;
pub mod index;
pub mod loader;
pub mod model;
pub mod name;

pub use index::DatasetIndex;
pub use loader::{SeriesLoader, TableLoader};
pub use model::{AirfoilId, Curve, OrderedF64, Sample, TimeSeries};

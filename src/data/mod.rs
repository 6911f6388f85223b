/// Data layer: cube model, loading, and window queries.
///
/// Architecture:
/// ```text
///  band directory / .json / .csv manifest
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  list bands → read headers → decode into one buffer
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ SpectralCube  │  Array3<T> [row, col, band], band metadata
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  window   │  linear index → s × s × bands read-only view
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod window;

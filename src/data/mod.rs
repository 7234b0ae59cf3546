/// Data layer: core types, artifact loading, scaling and classification.
///
/// Architecture:
/// ```text
///  scaler.json     classifier.json
///        │               │
///        ▼               ▼
///   ┌──────────────────────────┐
///   │  loader                  │  envelope check → Artifacts
///   └──────────────────────────┘
///        │               │
///        ▼               ▼
///   ┌──────────┐   ┌────────────┐
///   │  scaler   │   │ classifier │  FeatureRecord → ScaledVector → label
///   └──────────┘   └────────────┘
/// ```

pub mod classifier;
pub mod loader;
pub mod model;
pub mod scaler;

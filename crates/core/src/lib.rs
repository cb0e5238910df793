//! Storecast core: deterministic per-store sales forecasting
//!
//! Reproduces the training-time feature transformation bit-for-bit at
//! inference time and serves predictions against a hot-swappable model
//! artifact.
//!
//! Modules:
//! - `record`: per-store, per-day input records
//! - `schema`: persisted feature schema (column order and vocabularies)
//! - `features`: calendar/promotion/competition derivers and the assembler
//! - `gbdt`: tree-ensemble regressor evaluation
//! - `artifact`: persisted model artifact bundling regressor and schema
//! - `handle`: atomically swappable model handle
//! - `predictor`: prediction serving (filter, assemble, infer, invert)
//! - `errors`: error taxonomy shared by the service boundaries

pub mod artifact;
pub mod errors;
pub mod features;
pub mod gbdt;
pub mod handle;
pub mod predictor;
pub mod record;
pub mod schema;

pub use artifact::ModelArtifact;
pub use errors::ForecastError;
pub use features::FeatureAssembler;
pub use gbdt::{GbdtModel, RegressionTree, TreeNode};
pub use handle::{ActiveModel, ModelHandle};
pub use predictor::{ModelSnapshot, PredictionService};
pub use record::StoreDayRecord;
pub use schema::{CategoricalBlock, CategoricalField, FeatureSchema, NumericColumn};

/// Crate version string for health and metrics reporting
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

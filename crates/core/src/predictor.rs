//! Prediction serving: filter, assemble, infer, invert

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::features::FeatureAssembler;
use crate::handle::{ActiveModel, ModelHandle};
use crate::record::StoreDayRecord;

/// Identity of the currently served model, for health and reload reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSnapshot {
    pub fingerprint: String,
    pub loaded_at: u64,
    pub source: String,
    pub tree_count: usize,
    pub feature_count: usize,
}

impl From<&ActiveModel> for ModelSnapshot {
    fn from(active: &ActiveModel) -> Self {
        Self {
            fingerprint: active.fingerprint.clone(),
            loaded_at: active.loaded_at,
            source: active.source.display().to_string(),
            tree_count: active.artifact.model.num_trees(),
            feature_count: active.artifact.schema.width(),
        }
    }
}

/// Serves sales predictions against a hot-swappable model artifact.
pub struct PredictionService {
    handle: ModelHandle,
    model_path: PathBuf,
}

impl PredictionService {
    /// Load the initial artifact. Failure here is fatal to the caller;
    /// the service never exists without a usable model.
    pub fn new(model_path: impl Into<PathBuf>) -> Result<Self> {
        let model_path = model_path.into();
        let handle = ModelHandle::load(&model_path)?;
        Ok(Self { handle, model_path })
    }

    /// Predict sales for the open records of a batch.
    ///
    /// Closed records (open != 1) produce no prediction and never reach the
    /// model; an empty filtered set returns an empty vector without touching
    /// the model. Output order matches the filtered input order. The whole
    /// call runs against one artifact snapshot, so a concurrent reload can
    /// never tear a batch across two models.
    pub fn predict(&self, records: &[StoreDayRecord]) -> Result<Vec<f64>> {
        let open: Vec<&StoreDayRecord> = records.iter().filter(|r| r.is_open()).collect();
        if open.is_empty() {
            return Ok(Vec::new());
        }

        let active = self.handle.get();
        let assembler = FeatureAssembler::new(&active.artifact.schema);
        let matrix = assembler.assemble_batch(&open)?;
        let log_scores = active.artifact.predict(&matrix)?;

        debug!(
            batch = records.len(),
            scored = log_scores.len(),
            fingerprint = %active.fingerprint,
            "prediction batch served"
        );

        // The model is trained on log1p(sales); invert per element.
        Ok(log_scores.into_iter().map(f64::exp_m1).collect())
    }

    /// Swap in a freshly loaded artifact from the configured path.
    ///
    /// On failure the previous model keeps serving.
    pub fn reload_model(&self) -> Result<ModelSnapshot> {
        let active = self.handle.reload(&self.model_path)?;
        Ok(ModelSnapshot::from(active.as_ref()))
    }

    /// Identity of the model currently serving. No side effects.
    pub fn model_snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::from(self.handle.get().as_ref())
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

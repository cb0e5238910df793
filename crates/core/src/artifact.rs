//! Persisted model artifact: regressor and schema, one file, one unit
//!
//! The artifact bundles the trained ensemble with the feature schema it was
//! trained against, so the column contract can never drift from the model
//! that expects it. Artifacts are immutable once loaded and replaced
//! wholesale on reload.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ForecastError, Result};
use crate::features::FeatureMatrix;
use crate::gbdt::GbdtModel;
use crate::schema::FeatureSchema;

/// Artifact format version this build reads and writes
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub schema: FeatureSchema,
    pub model: GbdtModel,
}

impl ModelArtifact {
    pub fn new(schema: FeatureSchema, model: GbdtModel) -> Self {
        Self {
            version: FORMAT_VERSION,
            schema,
            model,
        }
    }

    /// Validate version, schema and ensemble structure.
    pub fn validate(&self) -> Result<()> {
        if self.version != FORMAT_VERSION {
            return Err(ForecastError::Validation(format!(
                "unsupported artifact version {}",
                self.version
            )));
        }
        if self.schema.width() == 0 {
            return Err(ForecastError::Validation(
                "schema has no columns".to_string(),
            ));
        }
        if !self.schema.competition_distance_median.is_finite() {
            return Err(ForecastError::Validation(
                "competition distance median is not finite".to_string(),
            ));
        }
        self.model.validate(self.schema.width())
    }

    /// Predict log-scale outputs for an assembled feature matrix.
    ///
    /// Every row must match the schema width exactly; a mismatch means the
    /// assembly and the model disagree about the column contract and the
    /// whole call fails.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        let expected = self.schema.width();
        let mut out = Vec::with_capacity(matrix.len());
        for row in matrix {
            if row.len() != expected {
                return Err(ForecastError::SchemaMismatch {
                    expected,
                    actual: row.len(),
                });
            }
            let score = self.model.score(row);
            if !score.is_finite() {
                return Err(ForecastError::Inference(format!(
                    "model produced a non-finite score ({score})"
                )));
            }
            out.push(score);
        }
        Ok(out)
    }

    /// Save the artifact as JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate an artifact from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&json)?;
        artifact.validate()?;
        Ok(artifact)
    }
}

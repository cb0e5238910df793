//! Atomically swappable handle over the loaded model artifact

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tracing::info;

use crate::artifact::ModelArtifact;
use crate::errors::{ForecastError, Result};

/// A fully loaded artifact plus its load-time identity.
#[derive(Debug, Clone)]
pub struct ActiveModel {
    pub artifact: ModelArtifact,
    /// blake3 fingerprint of the artifact file bytes, hex-encoded
    pub fingerprint: String,
    /// Unix seconds at load time
    pub loaded_at: u64,
    pub source: PathBuf,
}

/// Owns the model artifact currently being served.
///
/// Construction is the only Unloaded→Loaded transition: a handle cannot exist
/// without a loaded model, so startup load failure surfaces as a constructor
/// error. `get` hands out an owned snapshot; in-flight predictions keep using
/// the snapshot they started with across any number of reloads. `reload`
/// loads and validates the replacement completely before the single pointer
/// swap, so a failed reload leaves the prior model serving untouched.
#[derive(Debug)]
pub struct ModelHandle {
    active: RwLock<Arc<ActiveModel>>,
}

impl ModelHandle {
    /// Load the initial artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let active = load_active(path)?;
        info!(
            fingerprint = %active.fingerprint,
            source = %path.display(),
            trees = active.artifact.model.num_trees(),
            "model loaded"
        );
        Ok(Self {
            active: RwLock::new(Arc::new(active)),
        })
    }

    /// Snapshot of the currently served model.
    pub fn get(&self) -> Arc<ActiveModel> {
        self.active.read().clone()
    }

    /// Replace the served artifact wholesale, returning the previous one.
    pub fn swap(&self, next: ActiveModel) -> Arc<ActiveModel> {
        let next = Arc::new(next);
        std::mem::replace(&mut *self.active.write(), next)
    }

    /// Load a fresh artifact and swap it in.
    pub fn reload(&self, path: &Path) -> Result<Arc<ActiveModel>> {
        let next = match load_active(path) {
            Ok(next) => next,
            Err(err) => return Err(ForecastError::Reload(err.to_string())),
        };
        let fingerprint = next.fingerprint.clone();
        let prev = self.swap(next);
        info!(old = %prev.fingerprint, new = %fingerprint, "model swapped");
        Ok(self.get())
    }
}

fn load_active(path: &Path) -> Result<ActiveModel> {
    let bytes = std::fs::read(path)?;
    let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
    artifact.validate()?;

    let fingerprint = hex::encode(blake3::hash(&bytes).as_bytes());
    let loaded_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    Ok(ActiveModel {
        artifact,
        fingerprint,
        loaded_at,
        source: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::{GbdtModel, RegressionTree, TreeNode};
    use crate::schema::FeatureSchema;

    fn write_artifact(path: &Path, leaf: f64) {
        let schema = FeatureSchema::training_default(2330.0);
        let model = GbdtModel::new(vec![RegressionTree::new(vec![TreeNode::leaf(leaf)])], 0.0);
        ModelArtifact::new(schema, model).save_json(path).unwrap();
    }

    #[test]
    fn loads_initial_artifact() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_artifact(file.path(), 5.0);

        let handle = ModelHandle::load(file.path()).unwrap();
        let active = handle.get();
        assert_eq!(active.fingerprint.len(), 64);
        assert_eq!(active.source, file.path());
    }

    #[test]
    fn missing_file_fails_construction() {
        assert!(ModelHandle::load(Path::new("/nonexistent/active.json")).is_err());
    }

    #[test]
    fn reload_swaps_fingerprint() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_artifact(file.path(), 5.0);
        let handle = ModelHandle::load(file.path()).unwrap();
        let before = handle.get().fingerprint.clone();

        write_artifact(file.path(), 6.0);
        handle.reload(file.path()).unwrap();

        assert_ne!(handle.get().fingerprint, before);
    }

    #[test]
    fn failed_reload_keeps_previous_model() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_artifact(file.path(), 5.0);
        let handle = ModelHandle::load(file.path()).unwrap();
        let before = handle.get().fingerprint.clone();

        std::fs::write(file.path(), b"not an artifact").unwrap();
        let err = handle.reload(file.path()).unwrap_err();
        assert!(matches!(err, ForecastError::Reload(_)));

        assert_eq!(handle.get().fingerprint, before);
    }

    #[test]
    fn snapshot_survives_swap() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_artifact(file.path(), 5.0);
        let handle = ModelHandle::load(file.path()).unwrap();

        let pinned = handle.get();
        write_artifact(file.path(), 6.0);
        handle.reload(file.path()).unwrap();

        // The earlier snapshot still scores with the old leaf.
        let width = pinned.artifact.schema.width();
        let scores = pinned.artifact.predict(&vec![vec![0.0; width]]).unwrap();
        assert_eq!(scores, vec![5.0]);
    }
}

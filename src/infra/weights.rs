// ============================================================
// Layer 6 - Weight Store
// ============================================================
// Loads pretrained weights into a Classifier and saves trained
// ones, using Burn's CompactRecorder (MessagePack + gzip,
// half precision).
//
// File naming convention:
//   pretrained/
//     alexnet.mpk.gz      ← ImageNet AlexNet, 1000-class head
//     base-model.mpk.gz   ← base model, 10-class head
//
// Loading is type-checked: a file whose tensors do not match the
// architecture fails with TrainError::Pretrained.

use std::path::PathBuf;

use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::domain::error::TrainError;
use crate::ml::model::Classifier;

const EXTENSION: &str = "mpk.gz";

pub struct WeightStore {
    dir: PathBuf,
}

impl WeightStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path (without extension) of the pretrained file for `model`
    fn pretrained_stem<B: Backend>(&self, model: &Classifier<B>) -> PathBuf {
        self.dir.join(model.model_name().as_str())
    }

    /// Load pretrained weights into `model`, whose architecture and
    /// head size must match the stored record.
    pub fn load<B: Backend>(
        &self,
        model:  Classifier<B>,
        device: &B::Device,
    ) -> Result<Classifier<B>, TrainError> {
        let stem = self.pretrained_stem(&model);
        tracing::info!("Loading pretrained weights from '{}.{EXTENSION}'", stem.display());

        let record = CompactRecorder::new()
            .load(stem.clone(), device)
            .map_err(|e| {
                TrainError::Pretrained(format!(
                    "cannot load '{}.{EXTENSION}': {e:?}",
                    stem.display()
                ))
            })?;

        Ok(model.load_record(record))
    }

    /// Save `model` to `stem` + `.mpk.gz`, returning the full path
    pub fn save<B: Backend>(
        model: &Classifier<B>,
        stem:  impl Into<PathBuf>,
    ) -> Result<PathBuf, TrainError> {
        let stem = stem.into();
        CompactRecorder::new()
            .record(model.clone().into_record(), stem.clone())
            .map_err(|e| {
                TrainError::Io(std::io::Error::other(format!(
                    "cannot save weights to '{}': {e:?}",
                    stem.display()
                )))
            })?;

        let path = stem.with_extension(EXTENSION);
        tracing::debug!("Saved weights to '{}'", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model_name::ModelName;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_save_then_load_restores_outputs() {
        let dir    = tempfile::tempdir().unwrap();
        let device = Default::default();
        let probe  = Tensor::<TestBackend, 4>::ones([1, 3, 32, 32], &device);

        let trained = Classifier::<TestBackend>::init(ModelName::BaseModel, 10, &device);
        let path = WeightStore::save(&trained, dir.path().join("base-model")).unwrap();
        assert!(path.exists());

        let fresh    = Classifier::<TestBackend>::init(ModelName::BaseModel, 10, &device);
        let restored = WeightStore::new(dir.path()).load(fresh, &device).unwrap();

        let expected: Vec<f32> = trained.forward(probe.clone()).into_data().to_vec().unwrap();
        let actual:   Vec<f32> = restored.forward(probe).into_data().to_vec().unwrap();
        for (a, e) in actual.iter().zip(&expected) {
            // half-precision storage
            assert!((a - e).abs() < 1e-2, "{a} vs {e}");
        }
    }

    #[test]
    fn test_missing_file_is_pretrained_error() {
        let dir    = tempfile::tempdir().unwrap();
        let device = Default::default();
        let model  = Classifier::<TestBackend>::init(ModelName::BaseModel, 10, &device);
        let result = WeightStore::new(dir.path()).load(model, &device);
        assert!(matches!(result, Err(TrainError::Pretrained(_))));
    }
}

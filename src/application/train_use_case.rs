// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates one training run as three phases:
//
//   Initializing  validate config, resolve model name and device,
//                 build data loaders, model, SGD optimizer,
//                 cross-entropy loss and an empty MetricsRecord
//
//   Running       for epoch in 0..epochs:
//                   train pass (timed) → print train line
//                   eval pass          → print test line
//                   adjust learning rate
//                   append the five metrics to the record
//
//   Finalizing    write the record through the RecordSink
//                 (and the final weights with --save-model)
//
// Any error aborts the run immediately. The record is only
// written in Finalizing, so an aborted run leaves nothing behind.

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use burn::{
    backend::{Autodiff, Wgpu},
    nn::loss::CrossEntropyLossConfig,
    tensor::backend::AutodiffBackend,
};

use crate::data::{
    cifar::{Cifar10Source, CIFAR10_URL, NUM_CLASSES},
    provider::DatasetProvider,
};
use crate::domain::{
    error::TrainError,
    model_name::ModelName,
    record::MetricsRecord,
    traits::{ImageSource, RecordSink},
};
use crate::infra::{
    device::{ensure_usable, select_device},
    progress,
    record_store::{record_filename, JsonRecordSink},
    weights::WeightStore,
};
use crate::ml::{
    model::{Classifier, ModelFactory},
    optimizer::sgd,
    schedule::adjust_learning_rate,
    trainer::{evaluate_autodiff, train_epoch},
};

type TrainBackend = Autodiff<Wgpu>;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every parameter of a run, resolved once at startup and passed
// by reference to whatever needs it.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs:        usize,
    pub batch_size:    usize,
    /// Device selector: GPU index, "cpu" or "auto"
    pub gpu:           String,
    pub model_name:    String,
    pub pretrained:    bool,
    pub learning_rate: f64,
    pub data_dir:      PathBuf,
    /// CIFAR-10 archive URL, used only when `data_dir` has no copy
    pub dataset_url:   String,
    pub log_dir:       PathBuf,
    pub weights_dir:   PathBuf,
    pub num_workers:   usize,
    /// Shuffle seed for the train loader; random when unset
    pub seed:          Option<u64>,
    pub save_model:    bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs:        100,
            batch_size:    256,
            gpu:           "3".to_string(),
            model_name:    "alexnet".to_string(),
            pretrained:    false,
            learning_rate: 0.1,
            data_dir:      PathBuf::from("./data"),
            dataset_url:   CIFAR10_URL.to_string(),
            log_dir:       PathBuf::from("log"),
            weights_dir:   PathBuf::from("pretrained"),
            num_workers:   4,
            seed:          None,
            save_model:    false,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.epochs == 0 {
            return Err(TrainError::Configuration("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(TrainError::Configuration("batch size must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainError::Configuration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run on the configured wgpu device, reading CIFAR-10 from
    /// `data_dir` and writing the record under `log_dir`.
    pub fn execute(&self) -> Result<MetricsRecord> {
        let cfg = &self.config;
        cfg.validate()?;

        let device = select_device(&cfg.gpu)?;
        ensure_usable(&device)?;
        let source = Cifar10Source::new(&cfg.data_dir).with_url(&cfg.dataset_url);

        prepare_log_dir(cfg)?;

        run_training::<TrainBackend>(cfg, &source, &JsonRecordSink, device)
    }
}

fn prepare_log_dir(cfg: &TrainConfig) -> Result<()> {
    std::fs::create_dir_all(&cfg.log_dir)
        .with_context(|| format!("Cannot create log directory '{}'", cfg.log_dir.display()))
}

/// The whole run on backend `B`: Initializing → Running → Finalizing.
pub fn run_training<B: AutodiffBackend>(
    cfg:    &TrainConfig,
    source: &dyn ImageSource,
    sink:   &dyn RecordSink,
    device: B::Device,
) -> Result<MetricsRecord> {
    // ── Initializing ──────────────────────────────────────────────────────────
    cfg.validate()?;
    let model_name: ModelName = cfg.model_name.parse()?;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    tracing::info!("Initializing {} run: {} epochs, seed {}", model_name, cfg.epochs, seed);

    let loaders = DatasetProvider::new(cfg.batch_size, cfg.num_workers, seed)
        .load::<B>(model_name, source, &device)
        .context("Failed to prepare CIFAR-10")?;

    let factory   = ModelFactory::new(WeightStore::new(&cfg.weights_dir));
    let mut model = factory.build::<B>(&cfg.model_name, NUM_CLASSES, cfg.pretrained, &device)?;
    let mut optim = sgd::<B, Classifier<B>>(cfg.learning_rate);
    let train_loss = CrossEntropyLossConfig::new().init(&device);
    let test_loss  = CrossEntropyLossConfig::new().init(&device);
    let mut learning_rate = cfg.learning_rate;

    let started = chrono::Local::now().naive_local();
    let mut record = MetricsRecord::new(
        cfg.batch_size,
        cfg.learning_rate,
        cfg.pretrained,
        record_filename(&cfg.log_dir, model_name, started),
        format!("Model: {model_name}\n"),
    );

    // ── Running ───────────────────────────────────────────────────────────────
    for epoch in 0..cfg.epochs {
        let epoch_start = Instant::now();
        let (trained, train) = train_epoch(&*loaders.train, model, &train_loss, &mut optim)
            .with_context(|| format!("Training failed in epoch {epoch}"))?;
        model = trained;
        let train_time = epoch_start.elapsed().as_secs_f64();
        println!("{}", progress::train_line(epoch, cfg.epochs, &train, train_time));

        let test = evaluate_autodiff(&*loaders.test, &model, &test_loss)
            .with_context(|| format!("Evaluation failed in epoch {epoch}"))?;
        println!("{}", progress::test_line(epoch, cfg.epochs, &test));

        learning_rate = adjust_learning_rate(&mut optim, learning_rate, epoch);
        record.push_epoch(&train, &test, train_time);
    }

    // ── Finalizing ────────────────────────────────────────────────────────────
    let path = sink.save(&record).context("Failed to write metrics record")?;
    if cfg.save_model {
        let weights = WeightStore::save(&model, path.with_extension(""))?;
        tracing::info!("Final weights written to '{}'", weights.display());
    }

    tracing::info!("Training complete: record at '{}'", path.display());
    Ok(record)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cifar::InMemorySource;
    use burn::backend::NdArray;

    type TestBackend = Autodiff<NdArray>;

    fn small_config(log_dir: &std::path::Path, epochs: usize) -> TrainConfig {
        TrainConfig {
            epochs,
            batch_size:  4,
            model_name:  "base-model".to_string(),
            log_dir:     log_dir.to_path_buf(),
            num_workers: 1,
            seed:        Some(42),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let cfg = TrainConfig { batch_size: 0, ..TrainConfig::default() };
        assert!(matches!(cfg.validate(), Err(TrainError::Configuration(_))));
    }

    #[test]
    fn test_run_records_every_epoch() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = small_config(dir.path(), 3);
        let source = InMemorySource::synthetic(8, 8);

        let record = run_training::<TestBackend>(&cfg, &source, &JsonRecordSink, Default::default())
            .unwrap();

        assert_eq!(record.epochs(), 3);
        assert_eq!(record.train_loss.len(), 3);
        assert_eq!(record.train_acc.len(),  3);
        assert_eq!(record.test_loss.len(),  3);
        assert_eq!(record.test_acc.len(),   3);
        assert_eq!(record.epoch_time.len(), 3);
        for acc in record.train_acc.iter().chain(&record.test_acc) {
            assert!((0.0..=1.0).contains(acc));
        }
        for loss in record.train_loss.iter().chain(&record.test_loss) {
            assert!(loss.is_finite() && *loss >= 0.0);
        }
        assert_eq!(record.batch_size, 4);
        assert_eq!(record.base_lr, 0.1);
        assert_eq!(record.description, "Model: base-model\n");

        let written = std::path::Path::new(&record.filename);
        assert!(written.starts_with(dir.path()));
        assert!(written.exists());
    }

    #[test]
    fn test_save_model_writes_weights_next_to_record() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig { save_model: true, ..small_config(dir.path(), 1) };
        let source = InMemorySource::synthetic(4, 4);

        let record = run_training::<TestBackend>(&cfg, &source, &JsonRecordSink, Default::default())
            .unwrap();
        let weights = PathBuf::from(&record.filename).with_extension("mpk.gz");
        assert!(weights.exists());
    }

    #[test]
    fn test_unknown_model_aborts_before_training() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig { model_name: "vgg16".to_string(), ..small_config(dir.path(), 1) };
        let source = InMemorySource::synthetic(4, 4);

        let err = run_training::<TestBackend>(&cfg, &source, &JsonRecordSink, Default::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrainError>(),
            Some(TrainError::UnsupportedModel(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_log_dir_fails_at_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = small_config(&dir.path().join("missing"), 1);
        let source = InMemorySource::synthetic(4, 4);

        let err = run_training::<TestBackend>(&cfg, &source, &JsonRecordSink, Default::default())
            .unwrap_err();
        assert!(err
            .chain()
            .any(|e| matches!(e.downcast_ref::<TrainError>(), Some(TrainError::Io(_)))));
    }
}

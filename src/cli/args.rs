// ============================================================
// Layer 1 - CLI Arguments
// ============================================================
// All run parameters as --flags. clap's derive macros generate
// help text, defaults and type conversion; the application layer
// only ever sees the TrainConfig these convert into.

use std::path::PathBuf;

use clap::{ArgAction, Args};

use crate::application::train_use_case::TrainConfig;
use crate::data::cifar::CIFAR10_URL;

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Number of full passes through the training set
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Number of images per batch
    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// Device: GPU index, "cpu" or "auto"
    #[arg(long, default_value = "3")]
    pub gpu: String,

    /// Architecture to train: alexnet or base-model
    #[arg(long, default_value = "alexnet")]
    pub model_name: String,

    /// Start from pretrained weights (true / false)
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub pretrained: bool,

    /// Base learning rate; divided by 10 every 10 epochs
    #[arg(long = "lr", default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Where CIFAR-10 is downloaded and unpacked
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// CIFAR-10 binary archive to download when data-dir is empty
    #[arg(long, default_value = CIFAR10_URL)]
    pub dataset_url: String,

    /// Where the metrics record is written
    #[arg(long, default_value = "log")]
    pub log_dir: PathBuf,

    /// Directory holding <model-name>.mpk.gz pretrained weights
    #[arg(long, default_value = "pretrained")]
    pub weights_dir: PathBuf,

    /// Threads running the per-image transform of each batch
    #[arg(long, default_value_t = 4)]
    pub num_workers: usize,

    /// Shuffle seed (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also write the final weights next to the metrics record
    #[arg(long)]
    pub save_model: bool,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            epochs:        a.epochs,
            batch_size:    a.batch_size,
            gpu:           a.gpu,
            model_name:    a.model_name,
            pretrained:    a.pretrained,
            learning_rate: a.learning_rate,
            data_dir:      a.data_dir,
            dataset_url:   a.dataset_url,
            log_dir:       a.log_dir,
            weights_dir:   a.weights_dir,
            num_workers:   a.num_workers,
            seed:          a.seed,
            save_model:    a.save_model,
        }
    }
}

// ============================================================
// Layer 3 - Error Taxonomy
// ============================================================
// Every failure a training run can hit. None of these are caught
// or retried anywhere: the first one aborts the run, and because
// the metrics record is only written at the very end, an aborted
// run leaves no record behind.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainError {
    /// A configuration value is outside its valid range
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The dataset could not be downloaded, unpacked or decoded
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    /// The model name is not one of the supported identifiers
    #[error("Unsupported model '{0}' (expected one of: alexnet, base-model)")]
    UnsupportedModel(String),

    /// The requested accelerator could not be selected
    #[error("Device error: {0}")]
    Device(String),

    /// Pretrained weights are missing or do not fit the architecture
    #[error("Pretrained weights error: {0}")]
    Pretrained(String),

    /// A training or evaluation pass saw no batches at all
    #[error("Epoch produced no batches ({0} split is empty)")]
    EmptyEpoch(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

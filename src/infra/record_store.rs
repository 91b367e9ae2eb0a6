// ============================================================
// Layer 6 - Record Store
// ============================================================
// Writes the finished MetricsRecord as pretty-printed JSON to
// the filename it carries:
//
//   log/<model>_<YY-MM-DD-HH-MM-SS>.json
//
// The sink never creates directories; a missing or read-only
// log directory surfaces as TrainError::Io. With second-level
// timestamps two runs practically never collide, so an existing
// file is simply overwritten.

use std::{fs, path::{Path, PathBuf}};

use chrono::NaiveDateTime;

use crate::domain::{
    error::TrainError,
    model_name::ModelName,
    record::MetricsRecord,
    traits::RecordSink,
};

pub const TIMESTAMP_FORMAT: &str = "%y-%m-%d-%H-%M-%S";

/// `<log_dir>/<model>_<timestamp>.json`
pub fn record_filename(log_dir: &Path, model: ModelName, started: NaiveDateTime) -> String {
    log_dir
        .join(format!("{}_{}.json", model, started.format(TIMESTAMP_FORMAT)))
        .to_string_lossy()
        .into_owned()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRecordSink;

impl RecordSink for JsonRecordSink {
    fn save(&self, record: &MetricsRecord) -> Result<PathBuf, TrainError> {
        let path = PathBuf::from(&record.filename);
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)?;
        tracing::info!("Saved metrics record ({} epochs) to '{}'", record.epochs(), path.display());
        Ok(path)
    }
}

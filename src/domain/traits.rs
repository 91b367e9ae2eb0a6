// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The two seams where the trainer touches the outside world:
// where images come from, and where the finished record goes.
// The application layer only sees these traits, so tests can
// swap in an in-memory image set and a temp-dir sink.

use std::path::PathBuf;

use crate::domain::{error::TrainError, record::MetricsRecord};

/// Which half of the dataset to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test  => "test",
        }
    }
}

/// One undecoded 32×32 RGB image as stored by CIFAR-10:
/// 1024 red bytes, then 1024 green, then 1024 blue (row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub pixels: Vec<u8>,
    pub label:  usize,
}

impl RawImage {
    pub const SIDE:  usize = 32;
    pub const BYTES: usize = 3 * Self::SIDE * Self::SIDE;

    pub fn new(pixels: Vec<u8>, label: usize) -> Self {
        Self { pixels, label }
    }
}

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Anything that can hand over the labelled images of a split.
///
/// Implementations:
///   - Cifar10Source → downloads and decodes the CIFAR-10 binaries
///   - InMemorySource → fixed images, used by tests
pub trait ImageSource {
    fn load_split(&self, split: Split) -> Result<Vec<RawImage>, TrainError>;
}

// ─── RecordSink ───────────────────────────────────────────────────────────────
/// Durable storage for a finished metrics record.
pub trait RecordSink {
    /// Persist the record, returning the path it was written to
    fn save(&self, record: &MetricsRecord) -> Result<PathBuf, TrainError>;
}

// ============================================================
// Layer 4 - CIFAR-10 Source
// ============================================================
// Downloads, unpacks and decodes the CIFAR-10 binary release.
//
// Layout on disk after the first run:
//   data/
//     cifar-10-binary.tar.gz       ← downloaded archive
//     cifar-10-batches-bin/
//       data_batch_1.bin … data_batch_5.bin   ← 50 000 train images
//       test_batch.bin                        ← 10 000 test images
//
// Binary record format (3073 bytes each):
//   [label: 1 byte][red: 1024 bytes][green: 1024 bytes][blue: 1024 bytes]
//
// The download only happens when the extracted directory is
// missing, so subsequent runs are fully offline.
//
// Both steps publish by rename: the archive is written as
// `.part` first, and extraction happens in a staging directory
// whose `cifar-10-batches-bin/` is moved into place at the end.
// `cifar-10-batches-bin/` therefore only exists when complete.
// An archive that fails to unpack is deleted and fetched again.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::domain::{
    error::TrainError,
    traits::{ImageSource, RawImage, Split},
};

pub const CIFAR10_URL: &str = "https://www.cs.toronto.edu/~kriz/cifar-10-binary.tar.gz";

/// Number of CIFAR-10 classes
pub const NUM_CLASSES: usize = 10;

const ARCHIVE_NAME: &str = "cifar-10-binary.tar.gz";
const BATCHES_DIR:  &str = "cifar-10-batches-bin";
const STAGING_DIR:  &str = "cifar-10-batches-bin.staging";
const RECORD_BYTES: usize = 1 + RawImage::BYTES;

pub struct Cifar10Source {
    data_dir: PathBuf,
    url:      String,
}

impl Cifar10Source {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), url: CIFAR10_URL.to_string() }
    }

    /// Point the downloader at a mirror instead of the default URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn batches_dir(&self) -> PathBuf {
        self.data_dir.join(BATCHES_DIR)
    }

    fn split_files(&self, split: Split) -> Vec<PathBuf> {
        let dir = self.batches_dir();
        match split {
            Split::Train => (1..=5)
                .map(|i| dir.join(format!("data_batch_{i}.bin")))
                .collect(),
            Split::Test => vec![dir.join("test_batch.bin")],
        }
    }

    /// Make sure the extracted batch files exist, downloading and
    /// unpacking the archive on first use.
    pub fn ensure_available(&self) -> Result<(), TrainError> {
        if self.batches_dir().is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.data_dir)?;

        let archive = self.data_dir.join(ARCHIVE_NAME);
        if archive.exists() {
            tracing::info!("CIFAR-10 archive already present at '{}'", archive.display());
            match self.extract(&archive) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!("Discarding unusable archive '{}': {e}", archive.display());
                    fs::remove_file(&archive)?;
                }
            }
        }

        self.download(&archive)?;
        if let Err(e) = self.extract(&archive) {
            fs::remove_file(&archive)?;
            return Err(e);
        }
        Ok(())
    }

    /// Unpack `archive` into a staging directory and move its
    /// batch directory into place.
    fn extract(&self, archive: &Path) -> Result<(), TrainError> {
        let staging = self.data_dir.join(STAGING_DIR);
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        tracing::info!("Extracting '{}'", archive.display());
        let result = extract_tar_gz(archive, &staging).and_then(|()| {
            let unpacked = staging.join(BATCHES_DIR);
            if !unpacked.is_dir() {
                return Err(TrainError::DataUnavailable(format!(
                    "archive '{}' did not contain '{BATCHES_DIR}/'",
                    archive.display()
                )));
            }
            fs::rename(&unpacked, self.batches_dir())?;
            Ok(())
        });

        if let Err(e) = fs::remove_dir_all(&staging) {
            tracing::warn!("Could not remove '{}': {e}", staging.display());
        }
        result
    }

    fn download(&self, target: &Path) -> Result<(), TrainError> {
        tracing::info!("Downloading CIFAR-10 from {}", self.url);

        let unavailable = |e: reqwest::Error| {
            TrainError::DataUnavailable(format!("download from {} failed: {e}", self.url))
        };
        let bytes = reqwest::blocking::get(&self.url)
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(unavailable)?;

        // `target` only appears once the archive is complete
        let partial = target.with_extension("part");
        fs::write(&partial, &bytes)?;
        fs::rename(&partial, target)?;

        tracing::info!("Downloaded {} bytes", bytes.len());
        Ok(())
    }
}

impl ImageSource for Cifar10Source {
    fn load_split(&self, split: Split) -> Result<Vec<RawImage>, TrainError> {
        self.ensure_available()?;

        let mut images = Vec::new();
        for path in self.split_files(split) {
            let bytes = fs::read(&path).map_err(|e| {
                TrainError::DataUnavailable(format!("cannot read '{}': {e}", path.display()))
            })?;
            let batch = parse_batch(&bytes, &path)?;
            tracing::debug!("Decoded {} images from '{}'", batch.len(), path.display());
            images.extend(batch);
        }

        tracing::info!("Loaded {} {} images", images.len(), split.as_str());
        Ok(images)
    }
}

/// Decode one CIFAR-10 binary batch file.
/// `origin` is only used in error messages.
pub fn parse_batch(bytes: &[u8], origin: &Path) -> Result<Vec<RawImage>, TrainError> {
    if bytes.is_empty() || bytes.len() % RECORD_BYTES != 0 {
        return Err(TrainError::DataUnavailable(format!(
            "'{}' is {} bytes, not a positive multiple of {RECORD_BYTES}",
            origin.display(),
            bytes.len()
        )));
    }

    bytes
        .chunks_exact(RECORD_BYTES)
        .enumerate()
        .map(|(i, record)| {
            let label = record[0] as usize;
            if label >= NUM_CLASSES {
                return Err(TrainError::DataUnavailable(format!(
                    "'{}' record {i} has label {label}",
                    origin.display()
                )));
            }
            Ok(RawImage::new(record[1..].to_vec(), label))
        })
        .collect()
}

fn extract_tar_gz(archive: &Path, output_dir: &Path) -> Result<(), TrainError> {
    let file = File::open(archive)?;
    Archive::new(GzDecoder::new(file))
        .unpack(output_dir)
        .map_err(|e| {
            TrainError::DataUnavailable(format!("cannot unpack '{}': {e}", archive.display()))
        })
}

// ─── In-memory source ─────────────────────────────────────────────────────────
/// Fixed train/test images, so the pipeline can run without the network.
#[cfg(test)]
pub struct InMemorySource {
    pub train: Vec<RawImage>,
    pub test:  Vec<RawImage>,
}

#[cfg(test)]
impl InMemorySource {
    /// `n` images per split. Label k images are a flat colour whose
    /// red channel encodes k, so a model can actually learn them.
    pub fn synthetic(n_train: usize, n_test: usize) -> Self {
        let make = |n: usize| {
            (0..n)
                .map(|i| {
                    let label = i % NUM_CLASSES;
                    let mut pixels = vec![0u8; RawImage::BYTES];
                    pixels[..1024].fill((label * 25) as u8);
                    pixels[1024..2048].fill(128);
                    pixels[2048..].fill((255 - label * 25) as u8);
                    RawImage::new(pixels, label)
                })
                .collect()
        };
        Self { train: make(n_train), test: make(n_test) }
    }
}

#[cfg(test)]
impl ImageSource for InMemorySource {
    fn load_split(&self, split: Split) -> Result<Vec<RawImage>, TrainError> {
        Ok(match split {
            Split::Train => self.train.clone(),
            Split::Test  => self.test.clone(),
        })
    }
}

// ============================================================
// Layer 3 - Metrics Record
// ============================================================
// The single artifact a training run produces. Created empty
// when the run starts, appended to once per epoch, written once
// when the run ends. Never read back during the run.
//
// The five per-epoch sequences are only ever extended together
// through push_epoch(), so they always have the same length.

use serde::{Deserialize, Serialize};

/// Loss and accuracy of one pass over a split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    /// Summed per-batch loss divided by the number of batches
    pub mean_loss: f64,
    /// Correct predictions divided by the number of examples, in [0, 1]
    pub accuracy:  f64,
    pub correct:   usize,
    pub total:     usize,
    pub batches:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub train_loss:  Vec<f64>,
    pub train_acc:   Vec<f64>,
    pub test_loss:   Vec<f64>,
    pub test_acc:    Vec<f64>,
    /// Wall time of each training pass, in seconds
    pub epoch_time:  Vec<f64>,

    pub batch_size:  usize,
    pub base_lr:     f64,
    pub pretrained:  bool,
    /// Where the record is written, e.g. `log/alexnet_26-10-18-09-30-00.json`
    pub filename:    String,
    pub description: String,
}

impl MetricsRecord {
    pub fn new(
        batch_size:  usize,
        base_lr:     f64,
        pretrained:  bool,
        filename:    impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            train_loss:  Vec::new(),
            train_acc:   Vec::new(),
            test_loss:   Vec::new(),
            test_acc:    Vec::new(),
            epoch_time:  Vec::new(),
            batch_size,
            base_lr,
            pretrained,
            filename:    filename.into(),
            description: description.into(),
        }
    }

    /// Append the metrics of one finished epoch
    pub fn push_epoch(&mut self, train: &EpochStats, test: &EpochStats, epoch_time: f64) {
        self.train_loss.push(train.mean_loss);
        self.train_acc.push(train.accuracy);
        self.test_loss.push(test.mean_loss);
        self.test_acc.push(test.accuracy);
        self.epoch_time.push(epoch_time);
    }

    /// Number of epochs recorded so far
    pub fn epochs(&self) -> usize {
        self.train_loss.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(loss: f64, acc: f64) -> EpochStats {
        EpochStats { mean_loss: loss, accuracy: acc, correct: 0, total: 0, batches: 1 }
    }

    #[test]
    fn test_new_record_is_empty() {
        let r = MetricsRecord::new(256, 0.1, false, "log/x.json", "Model: alexnet\n");
        assert_eq!(r.epochs(), 0);
        assert_eq!(r.batch_size, 256);
        assert!(!r.pretrained);
    }

    #[test]
    fn test_sequences_grow_together() {
        let mut r = MetricsRecord::new(4, 0.1, true, "log/x.json", "");
        for epoch in 0..3 {
            r.push_epoch(&stats(2.0 - epoch as f64 * 0.5, 0.3), &stats(1.9, 0.25), 1.5);
            let n = epoch + 1;
            assert_eq!(r.train_loss.len(), n);
            assert_eq!(r.train_acc.len(),  n);
            assert_eq!(r.test_loss.len(),  n);
            assert_eq!(r.test_acc.len(),   n);
            assert_eq!(r.epoch_time.len(), n);
        }
        assert_eq!(r.train_loss, vec![2.0, 1.5, 1.0]);
    }
}

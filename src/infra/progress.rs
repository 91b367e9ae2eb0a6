// Fixed-width per-epoch console lines:
//
//   [Epoch:   3/100][Train Loss: 1.23456][Train Acc: 0.54321][Epoch Time: 42.000]
//   [Epoch:   3/100][Test Loss: 1.34567][Test Acc: 0.50000]

use crate::domain::record::EpochStats;

pub fn train_line(epoch: usize, epochs: usize, stats: &EpochStats, seconds: f64) -> String {
    format!(
        "[Epoch: {:>3}/{:>3}][Train Loss: {:5.5}][Train Acc: {:5.5}][Epoch Time: {:3.3}]",
        epoch, epochs, stats.mean_loss, stats.accuracy, seconds
    )
}

pub fn test_line(epoch: usize, epochs: usize, stats: &EpochStats) -> String {
    format!(
        "[Epoch: {:>3}/{:>3}][Test Loss: {:5.5}][Test Acc: {:5.5}]",
        epoch, epochs, stats.mean_loss, stats.accuracy
    )
}

// Step decay: the learning rate is divided by DECAY_FACTOR after
// every DECAY_EVERY-th epoch (epoch indices 9, 19, 29, …).

use crate::ml::optimizer::ScheduledOptimizer;

pub const DECAY_EVERY:  usize = 10;
pub const DECAY_FACTOR: f64   = 10.0;

/// Rate to use after finishing `epoch` (0-based)
pub fn next_learning_rate(current_lr: f64, epoch: usize) -> f64 {
    if (epoch + 1) % DECAY_EVERY == 0 {
        current_lr / DECAY_FACTOR
    } else {
        current_lr
    }
}

/// Compute the next rate and write it to every parameter group
pub fn adjust_learning_rate<B, M, O>(
    optimizer:  &mut ScheduledOptimizer<B, M, O>,
    current_lr: f64,
    epoch:      usize,
) -> f64 {
    let lr = next_learning_rate(current_lr, epoch);
    if lr != current_lr {
        tracing::info!(
            "Epoch {}: learning rate {} → {} ({} param groups)",
            epoch, current_lr, lr, optimizer.param_groups().len()
        );
    }
    optimizer.set_learning_rate(lr);
    lr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{model::Classifier, optimizer::sgd};
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_decay_every_ten_epochs() {
        let mut lr = 0.1;
        for epoch in 0..25 {
            let next = next_learning_rate(lr, epoch);
            match epoch {
                9  => assert!(close(next, 0.01)),
                19 => assert!(close(next, 0.001)),
                _  => assert_eq!(next, lr),
            }
            lr = next;
        }
        assert!(close(lr, 0.001));
    }

    #[test]
    fn test_adjust_updates_every_param_group() {
        let mut optim = sgd::<TestBackend, Classifier<TestBackend>>(0.1);

        let lr = adjust_learning_rate(&mut optim, 0.1, 9);
        assert!(close(lr, 0.01));
        assert!(optim.param_groups().iter().all(|g| close(g.lr, 0.01)));

        let lr = adjust_learning_rate(&mut optim, lr, 10);
        assert!(close(lr, 0.01));
        assert!(close(optim.learning_rate(), 0.01));
    }
}

// ============================================================
// Layer 5 - Training and Evaluation Steps
// ============================================================
// One pass over a DataLoader each:
//
//   train_epoch: forward → cross-entropy → backward → SGD step,
//                per batch, on the autodiff backend
//   evaluate:    forward → cross-entropy, on the inner backend
//                (model.valid()): no gradients, dropout disabled
//
// Both report
//   mean_loss = Σ batch losses / number of batches
//   accuracy  = correct predictions / number of examples
//
// Key Burn insight:
//   - argmax(1) returns [batch, 1], so flatten before .equal()

use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    nn::loss::CrossEntropyLoss,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::batcher::ImageBatch;
use crate::domain::{error::TrainError, record::EpochStats};
use crate::ml::{model::Classifier, optimizer::ScheduledOptimizer};

#[derive(Default)]
struct Accumulator {
    loss_sum: f64,
    batches:  usize,
    correct:  usize,
    total:    usize,
}

impl Accumulator {
    fn add(&mut self, loss: f64, correct: usize, examples: usize) {
        self.loss_sum += loss;
        self.batches  += 1;
        self.correct  += correct;
        self.total    += examples;
    }

    fn finish(self, split: &'static str) -> Result<EpochStats, TrainError> {
        if self.batches == 0 || self.total == 0 {
            return Err(TrainError::EmptyEpoch(split));
        }
        Ok(EpochStats {
            mean_loss: self.loss_sum / self.batches as f64,
            accuracy:  self.correct as f64 / self.total as f64,
            correct:   self.correct,
            total:     self.total,
            batches:   self.batches,
        })
    }
}

/// Number of rows whose highest logit is the target class
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    let predictions = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predictions
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

/// One training pass. The model is moved through the optimizer
/// each step and handed back with its updated parameters.
pub fn train_epoch<B, O>(
    loader:    &dyn DataLoader<ImageBatch<B>>,
    mut model: Classifier<B>,
    loss_fn:   &CrossEntropyLoss<B>,
    optimizer: &mut ScheduledOptimizer<B, Classifier<B>, O>,
) -> Result<(Classifier<B>, EpochStats), TrainError>
where
    B: AutodiffBackend,
    O: Optimizer<Classifier<B>, B>,
{
    let mut acc = Accumulator::default();

    for batch in loader.iter() {
        let examples = batch.targets.dims()[0];
        let logits   = model.forward(batch.images);
        let loss     = loss_fn.forward(logits.clone(), batch.targets.clone());

        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
        acc.add(loss_val, count_correct(logits, batch.targets), examples);

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optimizer.step(model, grads);
    }

    let stats = acc.finish("train")?;
    tracing::debug!(
        "Train pass: {} batches, {}/{} correct",
        stats.batches, stats.correct, stats.total
    );
    Ok((model, stats))
}

/// One evaluation pass. Pass the result of `model.valid()`;
/// the model is only borrowed and never changes.
pub fn evaluate<B: Backend>(
    loader:  &dyn DataLoader<ImageBatch<B>>,
    model:   &Classifier<B>,
    loss_fn: &CrossEntropyLoss<B>,
) -> Result<EpochStats, TrainError> {
    let mut acc = Accumulator::default();

    for batch in loader.iter() {
        let examples = batch.targets.dims()[0];
        let logits   = model.forward(batch.images);
        let loss: f64 = loss_fn
            .forward(logits.clone(), batch.targets.clone())
            .into_scalar()
            .elem::<f64>();
        acc.add(loss, count_correct(logits, batch.targets), examples);
    }

    let stats = acc.finish("test")?;
    tracing::debug!(
        "Eval pass: {} batches, {}/{} correct",
        stats.batches, stats.correct, stats.total
    );
    Ok(stats)
}

/// Evaluate an autodiff model through its inference-only view
pub fn evaluate_autodiff<B: AutodiffBackend>(
    loader:  &dyn DataLoader<ImageBatch<B::InnerBackend>>,
    model:   &Classifier<B>,
    loss_fn: &CrossEntropyLoss<B::InnerBackend>,
) -> Result<EpochStats, TrainError> {
    evaluate(loader, &model.valid(), loss_fn)
}

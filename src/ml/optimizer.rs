// ============================================================
// Layer 5 - Scheduled Optimizer
// ============================================================
// Burn optimizers are stateless about the learning rate: it is
// passed into every step() call. This wrapper owns that rate as
// a list of parameter groups, so the schedule has one place to
// write the new rate and the training step one place to read it.
//
// Plain SGD: θ = θ - lr * ∇θ (no momentum, no weight decay)

use std::marker::PhantomData;

use burn::{
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, SgdConfig},
    tensor::backend::AutodiffBackend,
};

/// A set of parameters sharing one learning rate
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGroup {
    pub name: &'static str,
    pub lr:   f64,
}

pub struct ScheduledOptimizer<B, M, O> {
    inner:        O,
    param_groups: Vec<ParamGroup>,
    _module:      PhantomData<(B, M)>,
}

impl<B, M, O> ScheduledOptimizer<B, M, O> {
    /// Wrap `inner` with a single group covering every parameter
    pub fn new(inner: O, lr: f64) -> Self {
        Self {
            inner,
            param_groups: vec![ParamGroup { name: "all", lr }],
            _module:      PhantomData,
        }
    }

    pub fn param_groups(&self) -> &[ParamGroup] {
        &self.param_groups
    }

    /// Current rate of the first group
    pub fn learning_rate(&self) -> f64 {
        self.param_groups[0].lr
    }

    /// Apply `lr` to every parameter group
    pub fn set_learning_rate(&mut self, lr: f64) {
        for group in &mut self.param_groups {
            group.lr = lr;
            tracing::debug!("Param group '{}': lr = {}", group.name, lr);
        }
    }
}

impl<B, M, O> ScheduledOptimizer<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    O: Optimizer<M, B>,
{
    /// One gradient-descent update. Consumes the gradients, so nothing
    /// carries over into the next batch.
    pub fn step(&mut self, module: M, grads: GradientsParams) -> M {
        let lr = self.learning_rate();
        self.inner.step(lr, module, grads)
    }
}

/// Plain SGD over every parameter of `M`
pub fn sgd<B, M>(lr: f64) -> ScheduledOptimizer<B, M, impl Optimizer<M, B>>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
{
    ScheduledOptimizer::new(SgdConfig::new().init::<B, M>(), lr)
}

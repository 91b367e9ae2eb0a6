// ============================================================
// Layer 4 - Image Batcher
// ============================================================
// Implements Burn's Batcher trait: runs the model transform over
// every raw image of a batch, stacks the results into one
// [batch, 3, side, side] tensor and the labels into a [batch]
// Int tensor on the target device.
//
// The per-image transform (resize, crop, normalise) is the
// expensive part of loading, so it runs on a rayon pool of
// `num_workers` threads. Batch composition and order are left
// entirely to the DataLoader.

use std::sync::Arc;

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::data::transform::ImageTransform;
use crate::domain::{error::TrainError, traits::RawImage};

#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// shape: [batch_size, 3, side, side]
    pub images:  Tensor<B, 4>,
    /// shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Thread pool shared by the train and test batchers
pub fn transform_pool(num_workers: usize) -> Result<Arc<ThreadPool>, TrainError> {
    ThreadPoolBuilder::new()
        .num_threads(num_workers.max(1))
        .thread_name(|i| format!("transform-{i}"))
        .build()
        .map(Arc::new)
        .map_err(|e| {
            TrainError::Configuration(format!("cannot start {num_workers} transform threads: {e}"))
        })
}

#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    device:    B::Device,
    transform: ImageTransform,
    pool:      Arc<ThreadPool>,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device, transform: ImageTransform, pool: Arc<ThreadPool>) -> Self {
        Self { device, transform, pool }
    }
}

impl<B: Backend> Batcher<RawImage, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<RawImage>) -> ImageBatch<B> {
        let batch_size = items.len();
        let side       = self.transform.output_side();

        // collect() keeps item order
        let transformed: Vec<Vec<f32>> = self.pool.install(|| {
            items.par_iter().map(|raw| self.transform.apply(raw)).collect()
        });
        let pixels: Vec<f32> = transformed.into_iter().flatten().collect();
        let labels: Vec<i32> = items
            .iter()
            .map(|item| item.label as i32)
            .collect();

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([batch_size, 3, side, side]);
        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        ImageBatch { images, targets }
    }
}

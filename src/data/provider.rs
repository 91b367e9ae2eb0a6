// ============================================================
// Layer 4 - Dataset Provider
// ============================================================
// Builds the train and test DataLoaders for one model:
//
//   ImageSource ──► InMemDataset<RawImage> ──► DataLoader
//                                               └─ ImageBatcher (model transform)
//
// The train loader is shuffled, and Burn reshuffles it every
// time iter() is called, i.e. once per epoch. The test loader
// keeps dataset order.
//
// Each loader runs on exactly one loader thread: Burn batches
// and shuffles every loader thread's partition separately.
// `num_workers` sizes the transform pool inside the batcher.
//
// Train batches live on the autodiff backend; test batches on
// its inner backend, so evaluation carries no autodiff overhead.

use std::sync::Arc;

use burn::{
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::InMemDataset,
    },
    tensor::backend::AutodiffBackend,
};

use crate::data::{
    batcher::{transform_pool, ImageBatch, ImageBatcher},
    transform::ImageTransform,
};
use crate::domain::{
    error::TrainError,
    model_name::ModelName,
    traits::{ImageSource, Split},
};

const LOADER_THREADS: usize = 1;

pub struct DataLoaders<B: AutodiffBackend> {
    pub train: Arc<dyn DataLoader<ImageBatch<B>>>,
    pub test:  Arc<dyn DataLoader<ImageBatch<B::InnerBackend>>>,
}

pub struct DatasetProvider {
    batch_size:  usize,
    num_workers: usize,
    seed:        u64,
}

impl DatasetProvider {
    pub fn new(batch_size: usize, num_workers: usize, seed: u64) -> Self {
        Self { batch_size, num_workers, seed }
    }

    pub fn load<B: AutodiffBackend>(
        &self,
        model:  ModelName,
        source: &dyn ImageSource,
        device: &B::Device,
    ) -> Result<DataLoaders<B>, TrainError> {
        let transform = ImageTransform::for_model(model);
        let side      = transform.output_side();

        let train_images = non_empty(source.load_split(Split::Train)?, Split::Train)?;
        let test_images  = non_empty(source.load_split(Split::Test)?,  Split::Test)?;
        let train_examples = train_images.len();
        let test_examples  = test_images.len();

        let pool = transform_pool(self.num_workers)?;

        let train = DataLoaderBuilder::new(ImageBatcher::<B>::new(device.clone(), transform, pool.clone()))
            .batch_size(self.batch_size)
            .shuffle(self.seed)
            .num_workers(LOADER_THREADS)
            .build(InMemDataset::new(train_images));

        let test = DataLoaderBuilder::new(ImageBatcher::<B::InnerBackend>::new(device.clone(), transform, pool))
            .batch_size(self.batch_size)
            .num_workers(LOADER_THREADS)
            .build(InMemDataset::new(test_images));

        tracing::info!(
            "Data ready for {}: {} train / {} test images at {}x{}, batch size {}, {} transform threads",
            model, train_examples, test_examples, side, side, self.batch_size, self.num_workers,
        );

        Ok(DataLoaders { train, test })
    }
}

fn non_empty<T>(items: Vec<T>, split: Split) -> Result<Vec<T>, TrainError> {
    if items.is_empty() {
        return Err(TrainError::DataUnavailable(format!("{} split has no images", split.as_str())));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::data::cifar::InMemorySource;
    use burn::{
        backend::{Autodiff, NdArray},
        prelude::Backend,
    };

    type TestBackend = Autodiff<NdArray>;

    #[test]
    fn test_loaders_match_model_input_shape() {
        let source = InMemorySource::synthetic(6, 3);
        let device = Default::default();
        let provider = DatasetProvider::new(4, 1, 7);

        for model in ModelName::ALL {
            let side = model.input_size();
            let loaders = provider.load::<TestBackend>(model, &source, &device).unwrap();
            let train: Vec<_> = loaders.train.iter().collect();
            assert_eq!(train.len(), 2); // 4 + remainder 2
            assert_eq!(train[0].images.dims(), [4, 3, side, side]);
            assert_eq!(train[1].images.dims(), [2, 3, side, side]);

            let test: Vec<_> = loaders.test.iter().collect();
            assert_eq!(test.len(), 1);
            assert_eq!(test[0].images.dims(), [3, 3, side, side]);
        }
    }

    fn default_workers() -> usize {
        TrainConfig::default().num_workers
    }

    fn epoch_labels<B: Backend>(loader: &dyn DataLoader<ImageBatch<B>>) -> Vec<Vec<i64>> {
        loader
            .iter()
            .map(|batch| batch.targets.into_data().convert::<i64>().to_vec().unwrap())
            .collect()
    }

    #[test]
    fn test_test_loader_keeps_order_and_batch_sizes() {
        // Labels are 0..9, one image each
        let source = InMemorySource::synthetic(4, 10);
        let device = Default::default();
        let loaders = DatasetProvider::new(4, default_workers(), 1)
            .load::<TestBackend>(ModelName::BaseModel, &source, &device)
            .unwrap();

        for _ in 0..3 {
            assert_eq!(
                epoch_labels(&*loaders.test),
                vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]]
            );
        }
    }

    #[test]
    fn test_train_loader_reshuffles_every_epoch() {
        let source = InMemorySource::synthetic(10, 2);
        let device = Default::default();
        let loaders = DatasetProvider::new(2, default_workers(), 11)
            .load::<TestBackend>(ModelName::BaseModel, &source, &device)
            .unwrap();

        let epochs: Vec<Vec<Vec<i64>>> = (0..20).map(|_| epoch_labels(&*loaders.train)).collect();

        for batches in &epochs {
            // Fixed-size batches, each epoch a permutation of all ten images
            assert!(batches.iter().all(|b| b.len() == 2));
            let mut seen: Vec<i64> = batches.concat();
            seen.sort();
            assert_eq!(seen, (0..10).collect::<Vec<i64>>());
        }

        assert_ne!(epochs[0], epochs[1]);

        // Batches draw from the whole dataset, not from one contiguous slice
        let spread = epochs
            .iter()
            .flatten()
            .any(|b| (b[0] - b[1]).abs() >= 5);
        assert!(spread);
    }

    #[test]
    fn test_empty_split_is_data_unavailable() {
        let source = InMemorySource::synthetic(0, 3);
        let device = Default::default();
        let result = DatasetProvider::new(4, 1, 1)
            .load::<TestBackend>(ModelName::BaseModel, &source, &device);
        assert!(matches!(result, Err(TrainError::DataUnavailable(_))));
    }
}

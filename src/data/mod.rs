// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// From CIFAR-10 binaries on disk to device-resident batches:
//
//   Cifar10Source     → downloads / decodes raw 32×32 images
//       │
//       ▼
//   InMemDataset      → Burn's in-memory Dataset over raw images
//       │
//       ▼
//   ImageBatcher      → per-model transform (ImageTransform) on a
//                       rayon pool, stacked into [N, 3, H, W] tensors
//       │
//       ▼
//   DatasetProvider   → wires both splits into DataLoaders

/// Downloads and decodes the CIFAR-10 binary release
pub mod cifar;

/// Per-model resize / crop / normalisation
pub mod transform;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Builds the train / test DataLoaders
pub mod provider;

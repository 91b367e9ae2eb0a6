// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// Everything that builds, runs or updates a network:
//
//   alexnet.rs    - AlexNet (torchvision layout, 224×224 input)
//   base_model.rs - small LeNet-style CNN (32×32 input)
//   model.rs      - Classifier enum + ModelFactory
//   optimizer.rs  - SGD wrapper that owns the learning rate
//   schedule.rs   - step decay (÷10 every 10 epochs)
//   trainer.rs    - training and evaluation passes
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

pub mod alexnet;
pub mod base_model;

/// Closed enum over the supported architectures, and the factory
pub mod model;

pub mod optimizer;
pub mod schedule;

/// One training pass and one evaluation pass over a DataLoader
pub mod trainer;

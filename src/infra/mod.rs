// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the machine rather than the
// model:
//
//   device.rs       - resolves the --gpu selector to a wgpu device
//   weights.rs      - loads pretrained / saves trained weights
//                     with Burn's CompactRecorder
//   record_store.rs - writes the metrics record as JSON
//   progress.rs     - fixed-width per-epoch console lines

pub mod device;
pub mod weights;
pub mod record_store;
pub mod progress;

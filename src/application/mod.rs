// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor math, no file formats.
// The single use case wires config, data, model, optimizer and
// record sink together and drives the epoch loop.

pub mod train_use_case;

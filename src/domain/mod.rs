// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types shared by every other layer: the supported
// model identifiers, the metrics record, the error taxonomy and
// the traits at the I/O seams.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls

pub mod error;
pub mod model_name;
pub mod record;
pub mod traits;

//! Uniform memory layout.
//!
//! Computes byte offsets and sizes for an ordered set of uniform fields so
//! the host-side bytes match what WGSL expects inside a `var<uniform>` struct.
//!
//! Packing is a pure function: all cursor state lives on the stack of a
//! single call, so it can run concurrently from any number of setup threads.

mod pack;
mod wgsl_type;

pub use pack::{pack, AlignedField, Field, PackedLayout, BLOCK_SIZE};
pub use wgsl_type::WgslType;

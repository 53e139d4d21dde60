//! Render and compute pipeline construction.
//!
//! Pipelines are immutable once built. Shader text is opaque to this module
//! apart from an optional generated preamble prepended to it; a malformed
//! shader or a layout mismatch is reported by wgpu's validation as a fatal
//! error and is never retried.

mod compute;
mod render;
mod source;

pub use compute::{ComputePipeline, ComputePipelineDesc};
pub use render::{premul_alpha_blend, RenderPipeline, RenderPipelineDesc};
pub use source::{compose_source, COMPUTE_ENTRY, FRAGMENT_ENTRY, VERTEX_ENTRY};

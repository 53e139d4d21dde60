//! Buffer abstractions.
//!
//! Every buffer owns exactly one `wgpu::Buffer` whose byte length is fixed at
//! creation. The four kinds differ only in default usage flags and in the
//! structured view they expose:
//! - [`VertexBuffer`]: stride, step mode and attribute locations
//! - [`IndexBuffer`]: element width inferred from the source integers
//! - [`UniformBuffer`]: named fields packed by [`crate::layout::pack`]
//! - [`StorageBuffer`]: element struct schema used for shader generation
//!
//! GPU memory is released by an explicit `destroy`, never implicitly by the
//! engine. Destroying twice is a caller error.

mod index;
mod raw;
mod readback;
mod storage;
mod uniform;
mod vertex;

pub use index::{IndexBuffer, IndexBufferDesc};
pub use raw::{BufferContents, BufferDesc, GpuBuffer};
pub use readback::Readback;
pub use storage::{StorageBuffer, StorageBufferDesc, StorageSchema};
pub use uniform::{UniformBuffer, UniformBufferDesc, UniformLayout};
pub use vertex::{VertexAttribute, VertexBuffer, VertexBufferDesc};

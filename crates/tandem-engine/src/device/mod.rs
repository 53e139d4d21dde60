//! GPU device + surface management.
//!
//! This module is the device boundary of the engine:
//! - `GpuContext` owns the adapter/device/queue used by every core type
//! - `Gpu` adds a window surface (swapchain) on top of a context
//! - `GpuFrame` is one acquired surface image to render into

mod context;
mod frame;
mod gpu;
mod init;
mod surface;

pub use context::GpuContext;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;

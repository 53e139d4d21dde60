//! Tandem engine crate.
//!
//! Typed wrappers over wgpu for compute-then-render simulations: a uniform
//! layout packer, buffer and texture abstractions, bind groups that emit
//! their own WGSL interface, pipeline builders, and frame orchestrators that
//! ping-pong state between two storage copies every tick.

pub mod binding;
pub mod buffer;
pub mod core;
pub mod device;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod texture;
pub mod time;
pub mod window;

mod error;

pub use error::{ConfigError, DeviceError, Error, Result};

//! Core app contracts.
//!
//! The stable interface between the winit runtime and the code driving the
//! frame orchestrators, with a consistent per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;

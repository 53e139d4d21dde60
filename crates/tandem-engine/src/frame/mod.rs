//! Frame orchestration: compute passes that advance double-buffered state,
//! followed by render passes that consume it.
//!
//! Ordering contract: every tick encodes its compute work before the render
//! pass that reads it, into one command buffer. The queue's in-order
//! execution is the only synchronization relied upon; there are no host
//! locks. Ticks must not be driven concurrently.

mod debug;
mod fullscreen;
mod orchestrator;
mod ping_pong;
mod texture_frame;

pub use debug::{
    decode as decode_debug, helper_wgsl as debug_helper_wgsl, words_from_bytes, DebugChannel,
    DebugConfig, DebugEntry, DebugLayout, DebugReport, DebugSlot, DebugValue, DEFAULT_MARK,
    TYPE_F32, TYPE_I32, TYPE_U32,
};
pub use fullscreen::{
    FRAME_SAMPLER_VAR, FRAME_TEXTURE_VAR, FULLSCREEN_TEXTURE_WGSL, FULLSCREEN_VERTEX_COUNT,
    FULLSCREEN_VERTEX_WGSL,
};
pub use orchestrator::{FramePassConfig, PingPongConfig, PingPongFrame, RenderStage};
pub use ping_pong::{Phase, PingPong};
pub use texture_frame::{ComputePassDesc, TextureFrame, TextureFrameConfig};

//! Time subsystem.
//!
//! Frame timing and simulation pacing without coupling to the runtime:
//! - one `FrameClock` per window, ticked once per presented frame
//! - one `StepSchedule` per simulation, deciding when a frame also steps

mod frame_clock;
mod step_schedule;

pub use frame_clock::{FrameClock, FrameTime};
pub use step_schedule::{StepSchedule, DEFAULT_STEP_BUDGET};

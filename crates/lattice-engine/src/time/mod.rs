//! Frame timing.
//!
//! - one `FrameClock` per window, `tick()` once per presented frame
//! - one `FpsCounter` per window, fed with each frame's `dt`

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};

//! The host: window, frame loop, clock and input for the meshtext demos.

mod config;
mod frame_clock;
mod input_state;
mod shell;

pub use config::*;
pub use frame_clock::FrameClock;
pub use input_state::{InputState, Key};
pub use shell::*;

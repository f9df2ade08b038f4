//! # chip8-core
//!
//! The CHIP-8 interpreter: a 4K memory / 16 register machine stepped one
//! instruction at a time. Video, audio and keyboard belong to the host,
//! which talks to the core through the [`Machine`] trait.

pub use chip8::Chip8;
pub use constants::{CLOCK_SPEED, TIMER_FREQUENCY};
pub use error::{Chip8Error, Result};
pub use machine::Machine;
pub use state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
pub mod instruction;
mod machine;
pub mod opcode;
mod operations;
pub mod state;

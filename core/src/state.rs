use std::ops::Range;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_SET, FONT_START, KEY_COUNT, MEMORY_SIZE, PROGRAM_START,
    REGISTER_COUNT, STACK_SIZE,
};
use crate::error::{Chip8Error, Result};

/// The FrameBuffer is row-major: pixel (x, y) lives at `y * DISPLAY_WIDTH + x`.
/// Every cell is either 0 or 1.
pub type FrameBuffer = [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) an 8-bit stack pointer; the index of the next free stack slot
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - Both are decremented by the host at 60Hz, never by a CPU cycle
///
/// ## Memory
/// - 16 return addresses of stack
/// - 4096 bytes of addressable memory
///     - the font set sits at `FONT_START`
///     - programs are loaded at `PROGRAM_START`
/// - 64x32 frame buffer
///
/// ## Input
/// - pressed status of keys 0..F, written by the host and only read by the CPU
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub memory: [u8; MEMORY_SIZE],
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: [u16; STACK_SIZE],
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub frame_buffer: FrameBuffer,
    pub keys: [bool; KEY_COUNT],
    pub draw_flag: bool,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + FONT_SET.len()].copy_from_slice(&FONT_SET);

        State {
            memory,
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            stack: [0; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            frame_buffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            keys: [false; KEY_COUNT],
            draw_flag: false,
        }
    }

    /// Puts every field back to its power-on value and reloads the font set.
    pub fn reset(&mut self) {
        *self = State::new();
    }

    /// Bounds-checks `len` bytes of memory starting at `start`.
    pub fn span(&self, start: u16, len: usize) -> Result<Range<usize>> {
        let start = start as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

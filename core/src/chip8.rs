use std::io::Read;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{KEY_COUNT, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Chip8Error, Result};
use crate::instruction::{decode, mnemonic};
use crate::machine::Machine;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the random number generator behind `CXNN`
///
/// Supplies interfaces for:
/// - loading programs from bytes or any reader
/// - advancing the CPU and its timers
/// - pressing and releasing keys
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    rng: StdRng,
}

impl Chip8 {
    /// Creates a machine whose random numbers are seeded from the OS.
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a machine with a reproducible random number sequence.
    pub fn with_seed(seed: u64) -> Self {
        Chip8 {
            state: State::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Load a program from a source file
    ///
    /// # Arguments
    /// * `reader` a reader positioned at the start of a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut program = Vec::with_capacity(MAX_PROGRAM_SIZE);
        reader.read_to_end(&mut program)?;
        self.load(&program)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn sp(&self) -> u8 {
        self.state.sp
    }

    /// The value of register `Vx`. Only the low nibble of `x` names the register.
    pub fn v(&self, x: u8) -> u8 {
        self.state.v[usize::from(x & 0xF)]
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn fetch(&self) -> Result<u16> {
        let pc = self.state.pc as usize;
        if pc > MEMORY_SIZE - 2 {
            return Err(Chip8Error::ProgramCounterOutOfBounds { pc: self.state.pc });
        }
        Ok(u16::from_be_bytes([
            self.state.memory[pc],
            self.state.memory[pc + 1],
        ]))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for Chip8 {
    fn reset(&mut self) {
        self.state.reset();
        debug!("machine reset");
    }

    fn load(&mut self, program: &[u8]) -> Result<()> {
        self.reset();
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::LoadTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + program.len()].copy_from_slice(program);
        debug!("loaded {} byte program at {:#05X}", program.len(), start);
        Ok(())
    }

    /// Advances the CPU by a single cycle
    /// - fails if the pc can't address a whole opcode
    /// - gets, decodes and executes the next opcode
    /// - only keeps the new state if the instruction succeeded
    fn step(&mut self) -> Result<()> {
        let op = self.fetch()?;
        trace!(
            "{:04X} {:<16} pc={:03X} i={:03X} v={:02X?}",
            op,
            mnemonic(op),
            self.state.pc,
            self.state.i,
            self.state.v
        );
        let operation = decode(op)?;
        self.state = operation(&op, &self.state, &mut self.rng)?;
        Ok(())
    }

    fn should_draw(&self) -> bool {
        self.state.draw_flag
    }

    fn clear_draw_flag(&mut self) {
        self.state.draw_flag = false;
    }

    fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    fn keys_mut(&mut self) -> &mut [bool; KEY_COUNT] {
        &mut self.state.keys
    }

    fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }
}

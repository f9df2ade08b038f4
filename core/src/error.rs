use std::io;

use thiserror::Error;

/// Everything that can stop a load or a CPU cycle.
///
/// None of these are transient: they mean the program (or the host) is broken,
/// and the machine should not be stepped again until it is reset.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program is {size} bytes but only {max} bytes fit in memory")]
    LoadTooLarge { size: usize, max: usize },

    #[error("unable to read program: {0}")]
    LoadUnreadable(#[from] io::Error),

    #[error("program counter {pc:#06X} is outside of memory")]
    ProgramCounterOutOfBounds { pc: u16 },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("malformed operand in opcode {opcode:#06X}")]
    MalformedOperand { opcode: u16 },

    #[error("stack overflow calling from {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from {pc:#06X}")]
    StackUnderflow { pc: u16 },

    #[error("memory access at {address:#06X} is out of bounds")]
    MemoryOutOfBounds { address: usize },
}

pub type Result<T> = std::result::Result<T, Chip8Error>;

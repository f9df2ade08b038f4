use rand::RngCore;

use crate::error::{Chip8Error, Result};
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// Executes one decoded instruction against a state, producing its successor.
pub type Operation = fn(op: &dyn Opcode, state: &State, rng: &mut dyn RngCore) -> Result<State>;

/// Selects the correct Operation for a given Opcode
///
/// 5XY_ and 9XY_ require their last nibble to be zero; anything else there is
/// a `MalformedOperand`. Every other word without a match is an `UnknownOpcode`.
pub fn decode(op: u16) -> Result<Operation> {
    let operation: Operation = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => cls,
        (0x0, 0x0, 0xE, 0xE) => ret,
        (0x1, ..) => jump,
        (0x2, ..) => call,
        (0x3, ..) => ske,
        (0x4, ..) => skne,
        (0x5, .., 0x0) => skre,
        (0x5, ..) => return Err(Chip8Error::MalformedOperand { opcode: op }),
        (0x6, ..) => load,
        (0x7, ..) => add,
        (0x8, .., 0x0) => mv,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => add_reg,
        (0x8, .., 0x5) => sub,
        (0x8, .., 0x6) => shr,
        (0x8, .., 0x7) => subn,
        (0x8, .., 0xE) => shl,
        (0x9, .., 0x0) => skrne,
        (0x9, ..) => return Err(Chip8Error::MalformedOperand { opcode: op }),
        (0xA, ..) => loadi,
        (0xB, ..) => jumpi,
        (0xC, ..) => rnd,
        (0xD, ..) => draw,
        (0xE, _, 0x9, 0xE) => skpr,
        (0xE, _, 0xA, 0x1) => skup,
        (0xF, _, 0x0, 0x7) => moved,
        (0xF, _, 0x0, 0xA) => keyd,
        (0xF, _, 0x1, 0x5) => loadd,
        (0xF, _, 0x1, 0x8) => loads,
        (0xF, _, 0x1, 0xE) => addi,
        (0xF, _, 0x2, 0x9) => ldspr,
        (0xF, _, 0x3, 0x3) => bcd,
        (0xF, _, 0x5, 0x5) => stor,
        (0xF, _, 0x6, 0x5) => read,
        _ => return Err(Chip8Error::UnknownOpcode { opcode: op }),
    };
    Ok(operation)
}

/// Renders an opcode in assembly form for trace output, e.g. `LD V0, 0x0A`.
pub fn mnemonic(op: u16) -> String {
    let (x, y, n, nn, nnn) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => "CLS".to_string(),
        (0x0, 0x0, 0xE, 0xE) => "RET".to_string(),
        (0x1, ..) => format!("JP {:#05X}", nnn),
        (0x2, ..) => format!("CALL {:#05X}", nnn),
        (0x3, ..) => format!("SE V{:X}, {:#04X}", x, nn),
        (0x4, ..) => format!("SNE V{:X}, {:#04X}", x, nn),
        (0x5, .., 0x0) => format!("SE V{:X}, V{:X}", x, y),
        (0x6, ..) => format!("LD V{:X}, {:#04X}", x, nn),
        (0x7, ..) => format!("ADD V{:X}, {:#04X}", x, nn),
        (0x8, .., 0x0) => format!("LD V{:X}, V{:X}", x, y),
        (0x8, .., 0x1) => format!("OR V{:X}, V{:X}", x, y),
        (0x8, .., 0x2) => format!("AND V{:X}, V{:X}", x, y),
        (0x8, .., 0x3) => format!("XOR V{:X}, V{:X}", x, y),
        (0x8, .., 0x4) => format!("ADD V{:X}, V{:X}", x, y),
        (0x8, .., 0x5) => format!("SUB V{:X}, V{:X}", x, y),
        (0x8, .., 0x6) => format!("SHR V{:X}", x),
        (0x8, .., 0x7) => format!("SUBN V{:X}, V{:X}", x, y),
        (0x8, .., 0xE) => format!("SHL V{:X}", x),
        (0x9, .., 0x0) => format!("SNE V{:X}, V{:X}", x, y),
        (0xA, ..) => format!("LD I, {:#05X}", nnn),
        (0xB, ..) => format!("JP V0, {:#05X}", nnn),
        (0xC, ..) => format!("RND V{:X}, {:#04X}", x, nn),
        (0xD, ..) => format!("DRW V{:X}, V{:X}, {}", x, y, n),
        (0xE, _, 0x9, 0xE) => format!("SKP V{:X}", x),
        (0xE, _, 0xA, 0x1) => format!("SKNP V{:X}", x),
        (0xF, _, 0x0, 0x7) => format!("LD V{:X}, DT", x),
        (0xF, _, 0x0, 0xA) => format!("LD V{:X}, K", x),
        (0xF, _, 0x1, 0x5) => format!("LD DT, V{:X}", x),
        (0xF, _, 0x1, 0x8) => format!("LD ST, V{:X}", x),
        (0xF, _, 0x1, 0xE) => format!("ADD I, V{:X}", x),
        (0xF, _, 0x2, 0x9) => format!("LD F, V{:X}", x),
        (0xF, _, 0x3, 0x3) => format!("LD B, V{:X}", x),
        (0xF, _, 0x5, 0x5) => format!("LD [I], V{:X}", x),
        (0xF, _, 0x6, 0x5) => format!("LD V{:X}, [I]", x),
        _ => format!("??? {:#06X}", op),
    }
}

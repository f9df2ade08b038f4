use rand::{Rng, RngCore};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, GLYPH_SIZE, STACK_SIZE};
use crate::error::{Chip8Error, Result};
use crate::opcode::Opcode;
use crate::state::State;

// Each operation returns the successor state. Checks that can fail run before
// anything is copied, so an error never leaves a half-executed instruction.

/// clear
pub fn cls(_op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: state.pc + 0x2,
        frame_buffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop() + 2
pub fn ret(_op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow { pc: state.pc });
    }
    let sp = state.sp - 0x1;
    Ok(State {
        pc: state.stack[sp as usize] + 0x2,
        sp,
        ..*state
    })
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: op.nnn(),
        ..*state
    })
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    if state.sp as usize >= STACK_SIZE {
        return Err(Chip8Error::StackOverflow { pc: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    Ok(State {
        pc: op.nnn(),
        sp: state.sp + 0x1,
        stack,
        ..*state
    })
}

/// Moves the pc past the next instruction when `condition` holds.
fn skip_if(condition: bool, state: &State) -> Result<State> {
    let pc = if condition {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    skip_if(state.v[op.x()] == op.nn(), state)
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    skip_if(state.v[op.x()] != op.nn(), state)
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    skip_if(state.v[op.x()] == state.v[op.y()], state)
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    skip_if(state.v[op.x()] != state.v[op.y()], state)
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let mut v = state.v;
    v[op.x()] = op.nn();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let mut v = state.v;
    v[op.x()] = v[op.x()].wrapping_add(op.nn());
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Applies `f` to a copy of the registers and advances the pc.
///
/// The 8XY_ group writes VF and Vx in a fixed order, so when x or y is 0xF the
/// second write sees the first. `f` must perform its writes in that order.
fn alu(state: &State, f: impl FnOnce(&mut [u8; 16])) -> Result<State> {
    let mut v = state.v;
    f(&mut v);
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let (x, y) = (op.x(), op.y());
    alu(state, |v| v[x] = v[y])
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let (x, y) = (op.x(), op.y());
    alu(state, |v| v[x] |= v[y])
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let (x, y) = (op.x(), op.y());
    alu(state, |v| v[x] &= v[y])
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let (x, y) = (op.x(), op.y());
    alu(state, |v| v[x] ^= v[y])
}

/// Vx += Vy; VF = carry
pub fn add_reg(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let (x, y) = (op.x(), op.y());
    alu(state, |v| {
        let (sum, carry) = v[x].overflowing_add(v[y]);
        v[0xF] = carry as u8;
        v[x] = sum;
    })
}

/// VF = Vx > Vy; Vx -= Vy
/// Equal operands clear VF.
pub fn sub(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let (x, y) = (op.x(), op.y());
    alu(state, |v| {
        v[0xF] = (v[x] > v[y]) as u8;
        v[x] = v[x].wrapping_sub(v[y]);
    })
}

/// VF = lsb(Vx); Vx >>= 1
pub fn shr(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let x = op.x();
    alu(state, |v| {
        v[0xF] = v[x] & 0x1;
        v[x] >>= 1;
    })
}

/// VF = Vy > Vx; Vy -= Vx
/// The difference lands in Vy; Vx keeps its value.
pub fn subn(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let (x, y) = (op.x(), op.y());
    alu(state, |v| {
        v[0xF] = (v[y] > v[x]) as u8;
        v[y] = v[y].wrapping_sub(v[x]);
    })
}

/// VF = msb(Vx); Vx <<= 1
pub fn shl(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let x = op.x();
    alu(state, |v| {
        v[0xF] = (v[x] & 0x80) >> 7;
        v[x] <<= 1;
    })
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: state.pc + 0x2,
        i: op.nnn(),
        ..*state
    })
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.nnn(),
        ..*state
    })
}

/// Vx = rand_byte & nn
pub fn rnd(op: &dyn Opcode, state: &State, rng: &mut dyn RngCore) -> Result<State> {
    let rand_byte: u8 = rng.gen();
    let mut v = state.v;
    v[op.x()] = rand_byte & op.nn();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any lit pixel is turned off.
pub fn draw(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let sprite = state.span(state.i, op.n() as usize)?;
    let origin_x = state.v[op.x()] as usize;
    let origin_y = state.v[op.y()] as usize;

    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    // Reset the flag register (used for collision detection)
    v[0xF] = 0x0;

    for (row, byte) in state.memory[sprite].iter().enumerate() {
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel_value = (byte >> (7 - bit)) & 0x1;
            let cell = &mut frame_buffer[y * DISPLAY_WIDTH + x];
            v[0xF] |= pixel_value & *cell;
            *cell ^= pixel_value;
        }
    }

    Ok(State {
        pc: state.pc + 0x2,
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// Whether the key named by Vx is held. Values past 0xF name no key.
fn key_pressed(op: &dyn Opcode, state: &State) -> bool {
    state
        .keys
        .get(state.v[op.x()] as usize)
        .copied()
        .unwrap_or(false)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    skip_if(key_pressed(op, state), state)
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    skip_if(!key_pressed(op, state), state)
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let mut v = state.v;
    v[op.x()] = state.delay_timer;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Vx = first pressed key
/// With no key held the pc stays put, so the next cycle runs this again.
pub fn keyd(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    match state.keys.iter().position(|&pressed| pressed) {
        Some(key) => {
            let mut v = state.v;
            v[op.x()] = key as u8;
            Ok(State {
                pc: state.pc + 0x2,
                v,
                ..*state
            })
        }
        None => Ok(*state),
    }
}

/// DT = Vx
pub fn loadd(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: state.pc + 0x2,
        delay_timer: state.v[op.x()],
        ..*state
    })
}

/// ST = Vx
pub fn loads(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: state.pc + 0x2,
        sound_timer: state.v[op.x()],
        ..*state
    })
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: state.pc + 0x2,
        i: state.i.wrapping_add(u16::from(state.v[op.x()])),
        ..*state
    })
}

/// I = FONT_START + Vx * 5
/// Set I to the memory address of the glyph for Vx
pub fn ldspr(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    Ok(State {
        pc: state.pc + 0x2,
        i: FONT_START + u16::from(state.v[op.x()]) * GLYPH_SIZE,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// Store the hundreds, tens and ones digits of Vx starting at address i
pub fn bcd(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let target = state.span(state.i, 3)?;
    let value = state.v[op.x()];
    let mut memory = state.memory;
    memory[target].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let target = state.span(state.i, op.x() + 1)?;
    let mut memory = state.memory;
    memory[target].copy_from_slice(&state.v[..=op.x()]);
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]
/// I is left where it was
pub fn read(op: &dyn Opcode, state: &State, _rng: &mut dyn RngCore) -> Result<State> {
    let source = state.span(state.i, op.x() + 1)?;
    let mut v = state.v;
    v[..=op.x()].copy_from_slice(&state.memory[source]);
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

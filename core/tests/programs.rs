//! Runs small programs through the public machine interface

use chip8_core::constants::{DISPLAY_WIDTH, FONT_START};
use chip8_core::{Chip8, Chip8Error, Machine};

fn boot(program: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_seed(0);
    chip8.load(program).unwrap();
    chip8
}

fn run(chip8: &mut Chip8, steps: usize) {
    for _ in 0..steps {
        chip8.step().unwrap();
    }
}

#[test]
fn test_load_then_add() {
    // LD V0, 10 ; ADD V0, 5
    let mut chip8 = boot(&[0x60, 0x0A, 0x70, 0x05]);
    run(&mut chip8, 2);
    assert_eq!(chip8.v(0x0), 15);
    assert_eq!(chip8.pc(), 0x204);
}

#[test]
fn test_sub_with_borrow() {
    // LD VA, 5 ; LD VB, 10 ; SUB VA, VB
    let mut chip8 = boot(&[0x6A, 0x05, 0x6B, 0x0A, 0x8A, 0xB5]);
    run(&mut chip8, 3);
    assert_eq!(chip8.v(0xA), 251);
    assert_eq!(chip8.v(0xF), 0);
}

#[test]
fn test_add_sets_carry() {
    // LD V0, 0xF0 ; LD V1, 0x20 ; ADD V0, V1
    let mut chip8 = boot(&[0x60, 0xF0, 0x61, 0x20, 0x80, 0x14]);
    run(&mut chip8, 3);
    assert_eq!(chip8.v(0x0), 0x10);
    assert_eq!(chip8.v(0xF), 1);
}

#[test]
fn test_draw_flag_after_clear_and_draw() {
    // CLS ; LD I, font ; DRW V0, V0, 5 ; LD V1, 1
    let mut chip8 = boot(&[0x00, 0xE0, 0xA0, 0x50, 0xD0, 0x05, 0x61, 0x01]);
    run(&mut chip8, 3);
    assert!(chip8.should_draw());
    chip8.clear_draw_flag();
    assert!(!chip8.should_draw());
    run(&mut chip8, 1);
    assert!(!chip8.should_draw());
}

#[test]
fn test_overlapping_sprites_collide() {
    // LD I, font ; DRW V0, V1, 5 ; DRW V0, V1, 5
    let mut chip8 = boot(&[0xA0, 0x50, 0xD0, 0x15, 0xD0, 0x15]);
    run(&mut chip8, 2);
    assert_eq!(chip8.v(0xF), 0);
    assert!(chip8.frame_buffer().iter().any(|&p| p == 1));
    run(&mut chip8, 1);
    assert_eq!(chip8.v(0xF), 1);
    assert!(chip8.frame_buffer().iter().all(|&p| p == 0));
}

#[test]
fn test_frame_buffer_is_row_major() {
    // LD V0, 10 ; LD V1, 3 ; LD I, glyph 1 ; DRW V0, V1, 1
    let glyph_one = FONT_START + 5;
    let program = [
        0x60,
        0x0A,
        0x61,
        0x03,
        0xA0 | (glyph_one >> 8) as u8,
        glyph_one as u8,
        0xD0,
        0x11,
    ];
    let mut chip8 = boot(&program);
    run(&mut chip8, 4);
    // top row of "1" is 0x20: a single pixel two columns in
    let lit: Vec<usize> = chip8
        .frame_buffer()
        .iter()
        .enumerate()
        .filter(|(_, &p)| p == 1)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(lit, vec![3 * DISPLAY_WIDTH + 12]);
}

#[test]
fn test_subroutine_round_trip() {
    // 0x200: CALL 0x206 ; 0x202: LD V1, 2 ; 0x204: JP 0x204
    // 0x206: LD V0, 1   ; 0x208: RET
    let mut chip8 = boot(&[
        0x22, 0x06, 0x61, 0x02, 0x12, 0x04, 0x60, 0x01, 0x00, 0xEE,
    ]);
    chip8.step().unwrap();
    assert_eq!(chip8.pc(), 0x206);
    assert_eq!(chip8.sp(), 1);
    run(&mut chip8, 2);
    assert_eq!(chip8.pc(), 0x202);
    assert_eq!(chip8.sp(), 0);
    run(&mut chip8, 3);
    assert_eq!(chip8.pc(), 0x204);
    assert_eq!((chip8.v(0x0), chip8.v(0x1)), (1, 2));
}

#[test]
fn test_runaway_recursion_overflows_stack() {
    // 0x200: CALL 0x200
    let mut chip8 = boot(&[0x22, 0x00]);
    run(&mut chip8, 16);
    assert_eq!(chip8.sp(), 16);
    assert!(matches!(
        chip8.step(),
        Err(Chip8Error::StackOverflow { pc: 0x200 })
    ));
}

#[test]
fn test_wait_for_key_polls() {
    // LD V3, K ; LD V4, 1
    let mut chip8 = boot(&[0xF3, 0x0A, 0x64, 0x01]);
    run(&mut chip8, 5);
    assert_eq!(chip8.pc(), 0x200);
    chip8.set_key(0xB, true);
    chip8.step().unwrap();
    assert_eq!(chip8.v(0x3), 0xB);
    assert_eq!(chip8.pc(), 0x202);
}

#[test]
fn test_key_state_written_by_host() {
    // LD V0, 7 ; SKP V0 ; LD V1, 1 ; LD V2, 1
    let mut chip8 = boot(&[0x60, 0x07, 0xE0, 0x9E, 0x61, 0x01, 0x62, 0x01]);
    chip8.keys_mut()[0x7] = true;
    run(&mut chip8, 3);
    assert_eq!(chip8.v(0x1), 0);
    assert_eq!(chip8.v(0x2), 1);
}

#[test]
fn test_delay_timer_counts_down_between_steps() {
    // LD V0, 3 ; LD DT, V0 ; LD V1, DT
    let mut chip8 = boot(&[0x60, 0x03, 0xF0, 0x15, 0xF1, 0x07]);
    run(&mut chip8, 2);
    chip8.tick_timers();
    chip8.tick_timers();
    chip8.step().unwrap();
    assert_eq!(chip8.v(0x1), 1);
}

#[test]
fn test_bcd_then_read_back() {
    // LD V0, 254 ; LD I, 0x300 ; LD B, V0 ; LD V2, [I]
    let mut chip8 = boot(&[0x60, 0xFE, 0xA3, 0x00, 0xF0, 0x33, 0xF2, 0x65]);
    run(&mut chip8, 4);
    assert_eq!(chip8.memory()[0x300..0x303], [2, 5, 4]);
    assert_eq!((chip8.v(0x0), chip8.v(0x1), chip8.v(0x2)), (2, 5, 4));
    assert_eq!(chip8.i(), 0x300);
}

#[test]
fn test_jump_off_the_end() {
    // LD V0, 0xFF ; JP V0, 0xFFF
    let mut chip8 = boot(&[0x60, 0xFF, 0xBF, 0xFF]);
    run(&mut chip8, 2);
    assert_eq!(chip8.pc(), 0x10FE);
    assert!(matches!(
        chip8.step(),
        Err(Chip8Error::ProgramCounterOutOfBounds { pc: 0x10FE })
    ));
}

#[test]
fn test_zeroed_memory_is_not_a_program() {
    let mut chip8 = boot(&[]);
    assert!(matches!(
        chip8.step(),
        Err(Chip8Error::UnknownOpcode { opcode: 0x0000 })
    ));
}

#[test]
fn test_store_past_memory_leaves_state() {
    // LD V3, 9 ; LD I, 0xFFE ; LD [I], V3
    let mut chip8 = boot(&[0x63, 0x09, 0xAF, 0xFE, 0xF3, 0x55]);
    run(&mut chip8, 2);
    let before = *chip8.state();
    assert!(matches!(
        chip8.step(),
        Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
    ));
    assert_eq!(*chip8.state(), before);
    assert_eq!(chip8.pc(), 0x204);
}

use rand::Rng;

use crate::error::Fault;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// Every instruction the machine understands, decoded from an [`Opcode`].
///
/// Decoding is total: opcodes that don't name an instruction become `Unknown`
/// and execute as a no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    Cls,
    /// `00EE`
    Ret,
    /// `1NNN`
    Jump { nnn: u16 },
    /// `2NNN`
    Call { nnn: u16 },
    /// `3XNN`
    SkipEqImm { x: u8, nn: u8 },
    /// `4XNN`
    SkipNeImm { x: u8, nn: u8 },
    /// `5XY0`
    SkipEqReg { x: u8, y: u8 },
    /// `6XNN`
    LoadImm { x: u8, nn: u8 },
    /// `7XNN`
    AddImm { x: u8, nn: u8 },
    /// `8XY0`
    Move { x: u8, y: u8 },
    /// `8XY1`
    Or { x: u8, y: u8 },
    /// `8XY2`
    And { x: u8, y: u8 },
    /// `8XY3`
    Xor { x: u8, y: u8 },
    /// `8XY4`
    AddReg { x: u8, y: u8 },
    /// `8XY5`
    Sub { x: u8, y: u8 },
    /// `8XY6`
    ShiftRight { x: u8 },
    /// `8XY7`
    SubN { x: u8, y: u8 },
    /// `8XYE`
    ShiftLeft { x: u8 },
    /// `9XY0`
    SkipNeReg { x: u8, y: u8 },
    /// `ANNN`
    LoadIndex { nnn: u16 },
    /// `BNNN`
    JumpOffset { nnn: u16 },
    /// `CXNN`
    Random { x: u8, nn: u8 },
    /// `DXYN`
    Draw { x: u8, y: u8, n: u8 },
    /// `EX9E`
    SkipKey { x: u8 },
    /// `EXA1`
    SkipNoKey { x: u8 },
    /// `FX07`
    LoadDelay { x: u8 },
    /// `FX0A`
    WaitKey { x: u8 },
    /// `FX15`
    SetDelay { x: u8 },
    /// `FX18`
    SetSound { x: u8 },
    /// `FX1E`
    AddIndex { x: u8 },
    /// `FX29`
    LoadGlyph { x: u8 },
    /// `FX33`
    Bcd { x: u8 },
    /// `FX55`
    Store { x: u8 },
    /// `FX65`
    Restore { x: u8 },
    /// Anything else
    Unknown(u16),
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode
    pub fn decode(op: impl Into<Opcode>) -> Self {
        let op = op.into();
        let (x, y, n, nn, nnn) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        match op.nibbles() {
            (0x0, _, 0xE, 0x0) => Instruction::Cls,
            (0x0, _, 0xE, 0xE) => Instruction::Ret,
            (0x1, ..) => Instruction::Jump { nnn },
            (0x2, ..) => Instruction::Call { nnn },
            (0x3, ..) => Instruction::SkipEqImm { x, nn },
            (0x4, ..) => Instruction::SkipNeImm { x, nn },
            (0x5, .., 0x0) => Instruction::SkipEqReg { x, y },
            (0x6, ..) => Instruction::LoadImm { x, nn },
            (0x7, ..) => Instruction::AddImm { x, nn },
            (0x8, .., 0x0) => Instruction::Move { x, y },
            (0x8, .., 0x1) => Instruction::Or { x, y },
            (0x8, .., 0x2) => Instruction::And { x, y },
            (0x8, .., 0x3) => Instruction::Xor { x, y },
            (0x8, .., 0x4) => Instruction::AddReg { x, y },
            (0x8, .., 0x5) => Instruction::Sub { x, y },
            (0x8, .., 0x6) => Instruction::ShiftRight { x },
            (0x8, .., 0x7) => Instruction::SubN { x, y },
            (0x8, .., 0xE) => Instruction::ShiftLeft { x },
            (0x9, ..) => Instruction::SkipNeReg { x, y },
            (0xA, ..) => Instruction::LoadIndex { nnn },
            (0xB, ..) => Instruction::JumpOffset { nnn },
            (0xC, ..) => Instruction::Random { x, nn },
            (0xD, ..) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipKey { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipNoKey { x },
            (0xF, _, 0x0, 0x7) => Instruction::LoadDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::LoadGlyph { x },
            (0xF, _, 0x3, 0x3) => Instruction::Bcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::Store { x },
            (0xF, _, 0x6, 0x5) => Instruction::Restore { x },
            _ => Instruction::Unknown(op.0),
        }
    }

    /// Applies this instruction to `state`, returning the resulting state.
    ///
    /// `state.pc` must already have been advanced past the opcode.
    /// Only the stack instructions can fail; on failure no state is produced.
    pub fn execute<R: Rng + ?Sized>(self, state: &State, rng: &mut R) -> Result<State, Fault> {
        let next = match self {
            Instruction::Cls => clr(state),
            Instruction::Ret => rts(state)?,
            Instruction::Jump { nnn } => jump(nnn, state),
            Instruction::Call { nnn } => call(nnn, state)?,
            Instruction::SkipEqImm { x, nn } => ske(x, nn, state),
            Instruction::SkipNeImm { x, nn } => skne(x, nn, state),
            Instruction::SkipEqReg { x, y } => skre(x, y, state),
            Instruction::LoadImm { x, nn } => load(x, nn, state),
            Instruction::AddImm { x, nn } => add(x, nn, state),
            Instruction::Move { x, y } => mv(x, y, state),
            Instruction::Or { x, y } => or(x, y, state),
            Instruction::And { x, y } => and(x, y, state),
            Instruction::Xor { x, y } => xor(x, y, state),
            Instruction::AddReg { x, y } => addr(x, y, state),
            Instruction::Sub { x, y } => sub(x, y, state),
            Instruction::ShiftRight { x } => shr(x, state),
            Instruction::SubN { x, y } => subn(x, y, state),
            Instruction::ShiftLeft { x } => shl(x, state),
            Instruction::SkipNeReg { x, y } => skrne(x, y, state),
            Instruction::LoadIndex { nnn } => loadi(nnn, state),
            Instruction::JumpOffset { nnn } => jumpi(nnn, state),
            Instruction::Random { x, nn } => rand(x, nn, state, rng),
            Instruction::Draw { x, y, n } => draw(x, y, n, state),
            Instruction::SkipKey { x } => skpr(x, state),
            Instruction::SkipNoKey { x } => skup(x, state),
            Instruction::LoadDelay { x } => moved(x, state),
            Instruction::WaitKey { x } => keyd(x, state),
            Instruction::SetDelay { x } => loads(x, state),
            Instruction::SetSound { x } => ld(x, state),
            Instruction::AddIndex { x } => addi(x, state),
            Instruction::LoadGlyph { x } => ldspr(x, state),
            Instruction::Bcd { x } => bcd(x, state),
            Instruction::Store { x } => stor(x, state),
            Instruction::Restore { x } => read(x, state),
            Instruction::Unknown(_) => *state,
        };
        Ok(next)
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    /// Executes `op` against a state whose pc has already been bumped past it,
    /// the way `Chip8::step` does.
    fn run(op: u16, state: &State) -> State {
        try_run(op, state).unwrap()
    }

    fn try_run(op: u16, state: &State) -> Result<State, Fault> {
        let fetched = State {
            pc: state.pc.wrapping_add(2),
            ..*state
        };
        let mut rng = StdRng::seed_from_u64(0);
        Instruction::decode(op).execute(&fetched, &mut rng)
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer[0][0] = true;
        let state = run(0x00E0, &state);
        assert!(!state.frame_buffer[0][0]);
        assert!(state.draw_flag);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_0xe0_cls_ignores_x() {
        let mut state = State::new();
        state.frame_buffer[0][0] = true;
        assert_eq!(Instruction::decode(0x01E0u16), Instruction::Cls);
        let state = run(0x01E0, &state);
        assert!(!state.frame_buffer[0][0]);
    }

    #[test]
    fn test_0xee_ret_ignores_x() {
        let mut state = State::new();
        state.stack[0] = 0x0ABC;
        state.sp = 0x1;
        assert_eq!(Instruction::decode(0x0FEEu16), Instruction::Ret);
        assert_eq!(run(0x0FEE, &state).pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.stack[0] = 0x0ABC;
        state.sp = 0x1;
        let state = run(0x00EE, &state);
        assert_eq!(state.sp, 0x0);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let state = State::new();
        assert_eq!(try_run(0x00EE, &state), Err(Fault::StackUnderflow));
    }

    #[test]
    fn test_1nnn_jp() {
        let state = run(0x1ABC, &State::new());
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0ABC;
        let state = run(0x2123, &state);
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0], 0x0ABE);
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = State::new();
        state.sp = 16;
        assert_eq!(try_run(0x2123, &state), Err(Fault::StackOverflow));
    }

    #[test]
    fn test_2nnn_then_00ee_returns_after_call() {
        let state = run(0x2400, &State::new());
        let state = run(0x00EE, &state);
        assert_eq!(state.pc, 0x0202);
        assert_eq!(state.sp, 0);
    }

    #[rstest]
    #[case::se_skips(0x3111, 0x11, 0x0204)]
    #[case::se_doesnt_skip(0x3111, 0x00, 0x0202)]
    #[case::sne_skips(0x4111, 0x00, 0x0204)]
    #[case::sne_doesnt_skip(0x4111, 0x11, 0x0202)]
    fn test_3xnn_4xnn_skips(#[case] op: u16, #[case] v1: u8, #[case] pc: u16) {
        let mut state = State::new();
        state.v[0x1] = v1;
        assert_eq!(run(op, &state).pc, pc);
    }

    #[rstest]
    #[case::se_skips(0x5120, 0x11, 0x0204)]
    #[case::se_doesnt_skip(0x5120, 0x12, 0x0202)]
    #[case::sne_skips(0x9120, 0x12, 0x0204)]
    #[case::sne_doesnt_skip(0x9120, 0x11, 0x0202)]
    #[case::sne_ignores_low_nibble(0x9121, 0x12, 0x0204)]
    #[case::se_low_nibble_is_unknown(0x5121, 0x11, 0x0202)]
    fn test_5xy0_9xy0_skips(#[case] op: u16, #[case] v2: u8, #[case] pc: u16) {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = v2;
        assert_eq!(run(op, &state).pc, pc);
    }

    #[test]
    fn test_6xnn_ld() {
        let state = run(0x6122, &State::new());
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xnn_add_wraps_without_touching_vf() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0xF] = 0x7;
        let state = run(0x7102, &state);
        assert_eq!(state.v[0x1], 0x01);
        assert_eq!(state.v[0xF], 0x7);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        let state = run(0x8120, &state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[rstest]
    #[case::or(0x8121, 0x7, 0x0)]
    #[case::and(0x8122, 0x2, 0x9)]
    #[case::xor(0x8123, 0x5, 0x0)]
    fn test_8xy_bitwise(#[case] op: u16, #[case] result: u8, #[case] vf: u8) {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        state.v[0xF] = 0x9;
        let state = run(op, &state);
        assert_eq!(state.v[0x1], result);
        assert_eq!(state.v[0xF], vf);
    }

    #[rstest]
    #[case::no_carry(0xEE, 0x11, 0xFF, 0x0)]
    #[case::carry(0xFF, 0x11, 0x10, 0x1)]
    #[case::exactly_256(0x80, 0x80, 0x00, 0x1)]
    fn test_8xy4_add(#[case] vx: u8, #[case] vy: u8, #[case] result: u8, #[case] vf: u8) {
        let mut state = State::new();
        state.v[0x1] = vx;
        state.v[0x2] = vy;
        let state = run(0x8124, &state);
        assert_eq!(state.v[0x1], result);
        assert_eq!(state.v[0xF], vf);
    }

    #[test]
    fn test_8xy4_flag_wins_when_vf_is_destination() {
        let mut state = State::new();
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x02;
        let state = run(0x8F14, &state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[rstest]
    #[case::or(0x8F11, 0x0)]
    #[case::xor(0x8F13, 0x0)]
    #[case::sub(0x8F15, 0x1)]
    #[case::shr(0x8F16, 0x1)]
    #[case::subn(0x8F17, 0x0)]
    #[case::shl(0x8F1E, 0x1)]
    fn test_8fy_flag_wins_when_vf_is_destination(#[case] op: u16, #[case] vf: u8) {
        let mut state = State::new();
        state.v[0xF] = 0x81;
        state.v[0x1] = 0x02;
        let state = run(op, &state);
        assert_eq!(state.v[0xF], vf);
    }

    #[rstest]
    #[case::no_borrow(0x33, 0x11, 0x22, 0x1)]
    #[case::equal(0x11, 0x11, 0x00, 0x1)]
    #[case::borrow(0x11, 0x12, 0xFF, 0x0)]
    fn test_8xy5_sub(#[case] vx: u8, #[case] vy: u8, #[case] result: u8, #[case] vf: u8) {
        let mut state = State::new();
        state.v[0x1] = vx;
        state.v[0x2] = vy;
        let state = run(0x8125, &state);
        assert_eq!(state.v[0x1], result);
        assert_eq!(state.v[0xF], vf);
    }

    #[rstest]
    #[case::no_borrow(0x11, 0x33, 0x22, 0x1)]
    #[case::equal(0x11, 0x11, 0x00, 0x1)]
    #[case::borrow(0x12, 0x11, 0xFF, 0x0)]
    fn test_8xy7_subn(#[case] vx: u8, #[case] vy: u8, #[case] result: u8, #[case] vf: u8) {
        let mut state = State::new();
        state.v[0x1] = vx;
        state.v[0x2] = vy;
        let state = run(0x8127, &state);
        assert_eq!(state.v[0x1], result);
        assert_eq!(state.v[0xF], vf);
    }

    #[test]
    fn test_8xy6_and_8xye_flag_is_pre_shift_bit_for_every_value() {
        for value in 0..=u8::MAX {
            let mut state = State::new();
            state.v[0x1] = value;

            let shifted = run(0x8106, &state);
            assert_eq!(shifted.v[0x1], value >> 1);
            assert_eq!(shifted.v[0xF], value & 0x1);

            let shifted = run(0x810E, &state);
            assert_eq!(shifted.v[0x1], value.wrapping_shl(1));
            assert_eq!(shifted.v[0xF], value >> 7);
        }
    }

    #[test]
    fn test_8xyx_unknown_subcode_is_noop() {
        let mut state = State::new();
        state.v[0x1] = 0x42;
        let next = run(0x8128, &state);
        assert_eq!(next.v, state.v);
        assert_eq!(next.pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let state = run(0xAABC, &State::new());
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        let state = run(0xBABC, &state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_cxnn_rnd_is_masked() {
        let mut state = State::new();
        for _ in 0..32 {
            state = run(0xC10F, &state);
            assert_eq!(state.v[0x1] & 0xF0, 0);
        }
        let state = run(0xC100, &state);
        assert_eq!(state.v[0x1], 0);
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        // Draw the 0x0 glyph with a 1x 1y offset
        let state = run(0xD005, &state);
        let mut expected = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[true, true, true, true]);
        expected[2][1..5].copy_from_slice(&[true, false, false, true]);
        expected[3][1..5].copy_from_slice(&[true, false, false, true]);
        expected[4][1..5].copy_from_slice(&[true, false, false, true]);
        expected[5][1..5].copy_from_slice(&[true, true, true, true]);
        assert_eq!(state.frame_buffer, expected);
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = State::new();
        state.frame_buffer[0][0] = true;
        let state = run(0xD001, &state);
        assert_eq!(state.v[0xF], 0x1);
        assert!(!state.frame_buffer[0][0]);
    }

    #[test]
    fn test_dxyn_drw_xors() {
        let mut state = State::new();
        state.frame_buffer[0][0..4].copy_from_slice(&[false, true, false, true]);
        // top row of the 0x0 glyph is 1 1 1 1
        let state = run(0xD001, &state);
        assert_eq!(state.frame_buffer[0][0..4], [true, false, true, false]);
    }

    #[test]
    fn test_dxyn_drw_wraps_pixels_past_right_edge() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300] = 0xFF;
        state.v[0x1] = 60;
        state.v[0x2] = 0;
        let state = run(0xD121, &state);
        for col in [60, 61, 62, 63, 0, 1, 2, 3] {
            assert!(state.frame_buffer[0][col], "column {col} should be lit");
        }
        assert_eq!(state.frame_buffer[0].iter().filter(|&&lit| lit).count(), 8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_dxyn_drw_wraps_origin_and_rows() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x302].copy_from_slice(&[0x80, 0x80]);
        // (65, 63) places the origin at (1, 31); the second row lands on row 0
        state.v[0x1] = 65;
        state.v[0x2] = 63;
        let state = run(0xD122, &state);
        assert!(state.frame_buffer[31][1]);
        assert!(state.frame_buffer[0][1]);
    }

    #[rstest]
    #[case::skp_skips(0xE19E, true, 0x0204)]
    #[case::skp_doesnt_skip(0xE19E, false, 0x0202)]
    #[case::sknp_skips(0xE1A1, false, 0x0204)]
    #[case::sknp_doesnt_skip(0xE1A1, true, 0x0202)]
    fn test_ex9e_exa1_keys(#[case] op: u16, #[case] pressed: bool, #[case] pc: u16) {
        let mut state = State::new();
        state.keypad[0xE] = pressed;
        state.v[0x1] = 0xE;
        assert_eq!(run(op, &state).pc, pc);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = State::new();
        state.delay_timer = 0xF;
        let state = run(0xF107, &state);
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_suspends_without_key() {
        let state = run(0xF10A, &State::new());
        assert_eq!(state.awaiting_key, Some(0x1));
        assert_eq!(state.pc, 0x0200);
    }

    #[test]
    fn test_fx0a_takes_lowest_pressed_key() {
        let mut state = State::new();
        state.keypad[0x9] = true;
        state.keypad[0x4] = true;
        let state = run(0xF10A, &state);
        assert_eq!(state.awaiting_key, None);
        assert_eq!(state.v[0x1], 0x4);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = run(0xF115, &state);
        assert_eq!(state.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = run(0xF118, &state);
        assert_eq!(state.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        let state = run(0xF11E, &state);
        assert_eq!(state.i, 0x2);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0x2;
        let state = run(0xF129, &state);
        assert_eq!(state.i, 0xA);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = State::new();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        let state = run(0xF133, &state);
        assert_eq!(state.memory[0x300..0x303], [0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx33_wraps_at_end_of_memory() {
        let mut state = State::new();
        state.v[0x1] = 255;
        state.i = 0xFFF;
        let state = run(0xF133, &state);
        assert_eq!(state.memory[0xFFF], 2);
        assert_eq!(state.memory[0x000], 5);
        assert_eq!(state.memory[0x001], 5);
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = run(0xF455, &state);
        assert_eq!(state.memory[0x300..0x306], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x306].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5, 0x6]);
        let state = run(0xF465, &state);
        assert_eq!(state.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[rstest]
    #[case(0x0123)]
    #[case(0x00E1)]
    #[case(0x5121)]
    #[case(0x812F)]
    #[case(0xE19F)]
    #[case(0xF1FF)]
    fn test_unknown_opcodes_decode_to_noops(#[case] op: u16) {
        assert_eq!(Instruction::decode(op), Instruction::Unknown(op));
        let state = State::new();
        let next = run(op, &state);
        assert_eq!(next, State { pc: 0x0202, ..state });
    }

    proptest! {
        #[test]
        fn property_8xy4_carry_matches_nine_bit_sum(vx in any::<u8>(), vy in any::<u8>()) {
            let mut state = State::new();
            state.v[0x1] = vx;
            state.v[0x2] = vy;
            let next = run(0x8124, &state);
            let sum = u16::from(vx) + u16::from(vy);
            prop_assert_eq!(next.v[0x1], sum as u8);
            prop_assert_eq!(next.v[0xF], u8::from(sum > 255));
        }

        #[test]
        fn property_every_opcode_executes_without_panicking(op in any::<u16>()) {
            let mut state = State::new();
            state.sp = 1;
            state.i = 0xFFA;
            let next = try_run(op, &state);
            prop_assert!(next.is_ok());
        }
    }
}

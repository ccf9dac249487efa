use rand::Rng;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, GLYPH_SIZE};
use crate::error::Fault;
use crate::state::State;

// Every operation receives the state *after* the fetch, so `state.pc` already
// points at the following instruction.

/// clear
pub fn clr(state: &State) -> State {
    State {
        frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
pub fn rts(state: &State) -> Result<State, Fault> {
    let mut next = *state;
    next.pc = next.pop()?;
    Ok(next)
}

/// PC = nnn
pub fn jump(nnn: u16, state: &State) -> State {
    State { pc: nnn, ..*state }
}

/// STACK.push(PC); PC = nnn
pub fn call(nnn: u16, state: &State) -> Result<State, Fault> {
    let mut next = *state;
    next.push(state.pc)?;
    next.pc = nnn;
    Ok(next)
}

/// Skips the next instruction when `condition` holds.
fn skip_if(condition: bool, state: &State) -> State {
    let pc = if condition {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    State { pc, ..*state }
}

/// if Vx == nn then pc += 2
pub fn ske(x: u8, nn: u8, state: &State) -> State {
    skip_if(state.v[x as usize] == nn, state)
}

/// if Vx != nn then pc += 2
pub fn skne(x: u8, nn: u8, state: &State) -> State {
    skip_if(state.v[x as usize] != nn, state)
}

/// if Vx == Vy then pc += 2
pub fn skre(x: u8, y: u8, state: &State) -> State {
    skip_if(state.v[x as usize] == state.v[y as usize], state)
}

/// if Vx != Vy then pc += 2
pub fn skrne(x: u8, y: u8, state: &State) -> State {
    skip_if(state.v[x as usize] != state.v[y as usize], state)
}

/// Vx = nn
pub fn load(x: u8, nn: u8, state: &State) -> State {
    let mut v = state.v;
    v[x as usize] = nn;
    State { v, ..*state }
}

/// Vx += nn
/// Overflow wraps and VF is left alone
pub fn add(x: u8, nn: u8, state: &State) -> State {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(nn);
    State { v, ..*state }
}

/// Vx = Vy
pub fn mv(x: u8, y: u8, state: &State) -> State {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    State { v, ..*state }
}

/// Vx |= Vy; VF = 0
pub fn or(x: u8, y: u8, state: &State) -> State {
    let mut v = state.v;
    v[x as usize] |= v[y as usize];
    v[0xF] = 0x0;
    State { v, ..*state }
}

/// Vx &= Vy
pub fn and(x: u8, y: u8, state: &State) -> State {
    let mut v = state.v;
    v[x as usize] &= v[y as usize];
    State { v, ..*state }
}

/// Vx ^= Vy; VF = 0
pub fn xor(x: u8, y: u8, state: &State) -> State {
    let mut v = state.v;
    v[x as usize] ^= v[y as usize];
    v[0xF] = 0x0;
    State { v, ..*state }
}

/// Vx += Vy; VF = overflow
pub fn addr(x: u8, y: u8, state: &State) -> State {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = u8::from(over);
    State { v, ..*state }
}

/// Vx -= Vy; VF = !underflow
pub fn sub(x: u8, y: u8, state: &State) -> State {
    let (res, under) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = u8::from(!under);
    State { v, ..*state }
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(x: u8, state: &State) -> State {
    let old = state.v[x as usize];
    let mut v = state.v;
    v[x as usize] = old >> 1;
    v[0xF] = old & 0x1;
    State { v, ..*state }
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(x: u8, y: u8, state: &State) -> State {
    let (res, under) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = u8::from(!under);
    State { v, ..*state }
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(x: u8, state: &State) -> State {
    let old = state.v[x as usize];
    let mut v = state.v;
    v[x as usize] = old << 1;
    v[0xF] = old >> 7;
    State { v, ..*state }
}

/// I = nnn
pub fn loadi(nnn: u16, state: &State) -> State {
    State { i: nnn, ..*state }
}

/// PC = V0 + nnn
pub fn jumpi(nnn: u16, state: &State) -> State {
    State {
        pc: u16::from(state.v[0x0]) + nnn,
        ..*state
    }
}

/// Vx = rand_byte & nn
pub fn rand<R: Rng + ?Sized>(x: u8, nn: u8, state: &State, rng: &mut R) -> State {
    let rand_byte: u8 = rng.gen();
    let mut v = state.v;
    v[x as usize] = rand_byte & nn;
    State { v, ..*state }
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n onto the FrameBuffer.
/// The origin wraps onto the screen, and so does every pixel drawn from it.
/// Sets VF if any pixels were erased
pub fn draw(x: u8, y: u8, n: u8, state: &State) -> State {
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;
    let origin_x = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[y as usize] as usize % DISPLAY_HEIGHT;

    // Reset the carry flag (used for collision detection)
    v[0xF] = 0x0;

    for row in 0..n {
        let sprite_byte = state.read(state.i.wrapping_add(u16::from(row)));
        let py = (origin_y + row as usize) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if sprite_byte & (0x80 >> bit) == 0 {
                continue;
            }
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            if frame_buffer[py][px] {
                v[0xF] = 0x1;
            }
            frame_buffer[py][px] ^= true;
        }
    }

    State {
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    }
}

/// if Vx.pressed then pc += 2
pub fn skpr(x: u8, state: &State) -> State {
    let key = state.v[x as usize] & 0xF;
    skip_if(state.keypad[key as usize], state)
}

/// if !Vx.pressed then pc += 2
pub fn skup(x: u8, state: &State) -> State {
    let key = state.v[x as usize] & 0xF;
    skip_if(!state.keypad[key as usize], state)
}

/// Vx = DT
pub fn moved(x: u8, state: &State) -> State {
    let mut v = state.v;
    v[x as usize] = state.delay_timer;
    State { v, ..*state }
}

/// await keypress for Vx
/// Takes the lowest held key right away if there is one, otherwise rewinds onto
/// this instruction and suspends until the host presses something
pub fn keyd(x: u8, state: &State) -> State {
    match state.lowest_pressed_key() {
        Some(key) => {
            let mut v = state.v;
            v[x as usize] = key;
            State { v, ..*state }
        }
        None => State {
            pc: state.pc.wrapping_sub(0x2),
            awaiting_key: Some(x),
            ..*state
        },
    }
}

/// DT = Vx
pub fn loads(x: u8, state: &State) -> State {
    State {
        delay_timer: state.v[x as usize],
        ..*state
    }
}

/// ST = Vx
pub fn ld(x: u8, state: &State) -> State {
    State {
        sound_timer: state.v[x as usize],
        ..*state
    }
}

/// I += Vx
pub fn addi(x: u8, state: &State) -> State {
    State {
        i: state.i.wrapping_add(u16::from(state.v[x as usize])),
        ..*state
    }
}

/// I = Vx * 5
/// Set I to the memory address of the glyph for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(x: u8, state: &State) -> State {
    State {
        i: u16::from(state.v[x as usize]) * GLYPH_SIZE,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(x: u8, state: &State) -> State {
    let value = state.v[x as usize];
    let digits = [value / 100, value / 10 % 10, value % 10];
    let mut next = *state;
    for (offset, digit) in (0..).zip(digits) {
        next.write(state.i.wrapping_add(offset), digit);
    }
    next
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(x: u8, state: &State) -> State {
    let mut next = *state;
    for reg in 0..=x {
        next.write(state.i.wrapping_add(u16::from(reg)), state.v[reg as usize]);
    }
    next
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(x: u8, state: &State) -> State {
    let mut v = state.v;
    for reg in 0..=x {
        v[reg as usize] = state.read(state.i.wrapping_add(u16::from(reg)));
    }
    State { v, ..*state }
}

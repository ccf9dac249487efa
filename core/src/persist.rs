//! Save states.
//!
//! A save state is the whole machine written field by field with fixed-width
//! big-endian integers, so a file written by one build loads in any other.
//!
//! # Layout (version 1)
//! ```text
//! magic         4   b"VM8S"
//! version       1
//! run state     1   0 running, 1 paused, 2 stopped
//! rom name      2 + len   big-endian length, then UTF-8
//! memory        4096
//! v             16
//! i             2
//! pc            2
//! sp            1   0..=16
//! stack         16 * 2
//! delay timer   1
//! sound timer   1
//! awaiting key  1   register index, 0xFF when not waiting
//! keypad        16  0 or 1 each
//! frame buffer  32 * 64  0 or 1 each, row-major
//! ```

use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::chip8::Chip8;
use crate::constants::{DISPLAY_WIDTH, KEY_COUNT, REGISTER_COUNT, STACK_SIZE};
use crate::error::PersistError;
use crate::rom::Rom;
use crate::state::{RunState, State};

pub const MAGIC: &[u8; 4] = b"VM8S";
pub const VERSION: u8 = 1;

const NOT_AWAITING: u8 = 0xFF;

/// Everything a save slot holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub rom_name: String,
    pub run_state: RunState,
    pub state: State,
}

/// Where `rom`'s save state for `slot` lives inside `dir`.
///
/// `pong.ch8` in slot 2 becomes `dir/pong.slot2.state`.
pub fn save_path(dir: &Path, rom: &Rom, slot: u8) -> PathBuf {
    dir.join(format!("{}.slot{}.state", rom.stem(), slot))
}

/// Writes `snapshot` in the version 1 layout.
pub fn encode<W: Write>(snapshot: &Snapshot, mut w: W) -> io::Result<()> {
    let state = &snapshot.state;
    let name = snapshot.rom_name.as_bytes();
    let name_len = u16::try_from(name.len())
        .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "rom name is too long"))?;

    w.write_all(MAGIC)?;
    w.write_all(&[VERSION, snapshot.run_state.as_u8()])?;
    w.write_all(&name_len.to_be_bytes())?;
    w.write_all(name)?;
    w.write_all(&state.memory)?;
    w.write_all(&state.v)?;
    w.write_all(&state.i.to_be_bytes())?;
    w.write_all(&state.pc.to_be_bytes())?;
    w.write_all(&[state.sp])?;
    for addr in state.stack {
        w.write_all(&addr.to_be_bytes())?;
    }
    w.write_all(&[
        state.delay_timer,
        state.sound_timer,
        state.awaiting_key.unwrap_or(NOT_AWAITING),
    ])?;
    w.write_all(&state.keypad.map(u8::from))?;
    for row in &state.frame_buffer {
        w.write_all(&row.map(u8::from))?;
    }
    Ok(())
}

/// Reads a snapshot written by `encode`, rejecting anything that isn't exactly one.
pub fn decode<R: Read>(mut r: R) -> Result<Snapshot, PersistError> {
    let mut magic = [0; 4];
    read_exact(&mut r, &mut magic)?;
    if &magic != MAGIC {
        return Err(PersistError::BadMagic);
    }
    let version = read_u8(&mut r)?;
    if version != VERSION {
        return Err(PersistError::UnsupportedVersion(version));
    }
    let run_state =
        RunState::from_u8(read_u8(&mut r)?).ok_or(PersistError::Corrupt("unknown run state"))?;

    let mut name = vec![0; usize::from(read_u16(&mut r)?)];
    read_exact(&mut r, &mut name)?;
    let rom_name =
        String::from_utf8(name).map_err(|_| PersistError::Corrupt("rom name is not utf-8"))?;

    let mut state = State::new();
    read_exact(&mut r, &mut state.memory)?;
    read_exact(&mut r, &mut state.v)?;
    state.i = read_u16(&mut r)?;
    state.pc = read_u16(&mut r)?;
    state.sp = read_u8(&mut r)?;
    if usize::from(state.sp) > STACK_SIZE {
        return Err(PersistError::Corrupt("stack pointer out of range"));
    }
    for addr in state.stack.iter_mut() {
        *addr = read_u16(&mut r)?;
    }
    state.delay_timer = read_u8(&mut r)?;
    state.sound_timer = read_u8(&mut r)?;
    state.awaiting_key = match read_u8(&mut r)? {
        NOT_AWAITING => None,
        register if usize::from(register) < REGISTER_COUNT => Some(register),
        _ => return Err(PersistError::Corrupt("awaiting key register out of range")),
    };
    let mut keypad = [0; KEY_COUNT];
    read_exact(&mut r, &mut keypad)?;
    state.keypad = read_bools(keypad)?;
    for row in state.frame_buffer.iter_mut() {
        let mut bytes = [0; DISPLAY_WIDTH];
        read_exact(&mut r, &mut bytes)?;
        *row = read_bools(bytes)?;
    }
    // The frame on screen may not match what was saved
    state.draw_flag = true;

    let mut trailing = [0; 1];
    if r.read(&mut trailing)? != 0 {
        return Err(PersistError::TrailingBytes);
    }

    Ok(Snapshot {
        rom_name,
        run_state,
        state,
    })
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), PersistError> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => PersistError::Truncated,
        _ => PersistError::Io(e),
    })
}

fn read_u8<R: Read>(r: &mut R) -> Result<u8, PersistError> {
    let mut buf = [0; 1];
    read_exact(r, &mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(r: &mut R) -> Result<u16, PersistError> {
    let mut buf = [0; 2];
    read_exact(r, &mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_bools<const N: usize>(bytes: [u8; N]) -> Result<[bool; N], PersistError> {
    let mut bools = [false; N];
    for (flag, byte) in bools.iter_mut().zip(bytes) {
        *flag = match byte {
            0 => false,
            1 => true,
            _ => return Err(PersistError::Corrupt("flag byte is not 0 or 1")),
        };
    }
    Ok(bools)
}

impl Chip8 {
    /// Captures the whole machine.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rom_name: self.rom.name().to_owned(),
            run_state: self.run_state,
            state: self.state,
        }
    }

    /// Replaces the whole machine with `snapshot`, provided it belongs to this rom.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), PersistError> {
        if snapshot.rom_name != self.rom.name() {
            return Err(PersistError::RomMismatch {
                expected: self.rom.name().to_owned(),
                found: snapshot.rom_name,
            });
        }
        self.state = snapshot.state;
        self.run_state = snapshot.run_state;
        Ok(())
    }

    /// Writes the machine to `slot` in `dir`.
    ///
    /// The file is written next to its destination and renamed into place, so a
    /// failed save leaves any previous save in that slot intact.
    pub fn save_state(&self, dir: &Path, slot: u8) -> Result<PathBuf, PersistError> {
        let path = save_path(dir, &self.rom, slot);
        let mut buf = Vec::new();
        encode(&self.snapshot(), &mut buf)?;

        let staging = path.with_extension("state.tmp");
        fs::write(&staging, &buf)?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        info!("saved slot {slot} to {}", path.display());
        Ok(path)
    }

    /// Restores the machine from `slot` in `dir`.
    ///
    /// The file is decoded and checked in full before anything is swapped in;
    /// on error the running machine is untouched.
    pub fn load_state(&mut self, dir: &Path, slot: u8) -> Result<PathBuf, PersistError> {
        let path = save_path(dir, &self.rom, slot);
        let bytes = fs::read(&path)?;
        let snapshot = decode(bytes.as_slice())?;
        self.restore(snapshot)?;
        info!("loaded slot {slot} from {}", path.display());
        Ok(path)
    }
}

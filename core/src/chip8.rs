use std::path::Path;

use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{KEY_COUNT, PROGRAM_START};
use crate::error::{Fault, LoadError};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::rom::Rom;
use crate::state::{FrameBuffer, RunState, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `run_state`, which tells the host whether to keep advancing it
///  - the loaded `rom`, for save slots and resets
///  - its own random number generator
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU and its timers
/// - inspecting its frame buffer for rendering by some display
/// - saving and loading state (see `persist`)
pub struct Chip8 {
    pub(crate) state: State,
    pub(crate) run_state: RunState,
    pub(crate) rom: Rom,
    rng: StdRng,
}

impl Chip8 {
    /// Boots a fresh machine with `rom` loaded at 0x200.
    pub fn new(rom: Rom) -> Self {
        Self::with_rng(rom, StdRng::from_entropy())
    }

    /// Like `new`, but with a deterministic random number generator.
    pub fn with_seed(rom: Rom, seed: u64) -> Self {
        Self::with_rng(rom, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rom: Rom, rng: StdRng) -> Self {
        let mut chip8 = Chip8 {
            state: State::new(),
            run_state: RunState::Running,
            rom,
            rng,
        };
        chip8.install_rom();
        chip8
    }

    /// Load a rom from a source file
    pub fn load_rom(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Self::new(Rom::from_file(path)?))
    }

    /// Load a rom from bytes already in memory
    pub fn from_program(name: &str, program: &[u8]) -> Result<Self, LoadError> {
        Ok(Self::new(Rom::new(name, program.to_vec())?))
    }

    /// Throws away all machine state and boots the current rom again.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.run_state = RunState::Running;
        self.install_rom();
    }

    fn install_rom(&mut self) {
        let start = usize::from(PROGRAM_START);
        let program = self.rom.program();
        self.state.memory[start..start + program.len()].copy_from_slice(program);
        debug!(
            "loaded {} ({} bytes) at {:#05X}",
            self.rom.name(),
            program.len(),
            PROGRAM_START
        );
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }

    /// Flips between running and paused; a stopped machine stays stopped.
    pub fn toggle_pause(&mut self) {
        self.run_state = match self.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Stopped => RunState::Stopped,
        };
    }

    /// The current contents of the display
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Whether the sound timer is running, i.e. whether a tone should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the index of the key (0x0..=0xF) that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the index of the key (0x0..=0xF) that was released
    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: u8, pressed: bool) {
        match self.state.keypad.get_mut(usize::from(key)) {
            Some(slot) => *slot = pressed,
            None => warn!("ignoring key {key:#X}; the keypad only has {KEY_COUNT} keys"),
        }
    }

    /// Direct access to the 16 key states
    pub fn keypad_mut(&mut self) -> &mut [bool; KEY_COUNT] {
        &mut self.state.keypad
    }

    /// Advances the CPU by a single instruction
    /// - if suspended on a key wait, checks the keypad instead of fetching
    /// - otherwise fetches, decodes and executes the next opcode
    ///
    /// A fault leaves the state as it was before the instruction and stops the machine.
    pub fn step(&mut self) -> Result<(), Fault> {
        if let Some(register) = self.state.awaiting_key {
            if let Some(key) = self.state.lowest_pressed_key() {
                trace!("key {key:X} released the wait on V{register:X}");
                self.state.v[usize::from(register)] = key;
                self.state.awaiting_key = None;
                self.state.pc = self.state.pc.wrapping_add(2);
            }
            return Ok(());
        }

        let op = self.fetch();
        let instruction = Instruction::decode(op);
        trace!("{:04X} {op} {instruction:?}", self.state.pc);

        let fetched = State {
            pc: self.state.pc.wrapping_add(2),
            ..self.state
        };
        match instruction.execute(&fetched, &mut self.rng) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(fault) => {
                error!("{fault} at {:#05X} (opcode {op})", self.state.pc);
                self.run_state = RunState::Stopped;
                Err(fault)
            }
        }
    }

    /// Decrements both timers; meant to be called at 60Hz regardless of how
    /// many instructions run in between
    pub fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn fetch(&self) -> Opcode {
        Opcode::from_be_bytes([
            self.state.read(self.state.pc),
            self.state.read(self.state.pc.wrapping_add(1)),
        ])
    }
}

pub use chip8::Chip8;
pub use error::{Fault, LoadError, PersistError};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use rom::Rom;
pub use state::{FrameBuffer, RunState, State};

mod chip8;
pub mod constants;
pub mod error;
mod instruction;
mod opcode;
mod operations;
pub mod persist;
mod rom;
pub mod state;

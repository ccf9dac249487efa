use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Raised when a ROM can't be brought into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read ROM {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ROM is {size} bytes but at most {max} fit in memory")]
    TooLarge { size: usize, max: usize },
}

/// Raised when a save slot can't be written or restored.
///
/// A failed load never touches the running machine.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save state i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("not a save state file")]
    BadMagic,
    #[error("unsupported save state version {0}")]
    UnsupportedVersion(u8),
    #[error("save state is truncated")]
    Truncated,
    #[error("save state has trailing bytes")]
    TrailingBytes,
    #[error("save state is corrupt: {0}")]
    Corrupt(&'static str),
    #[error("save state belongs to ROM {found:?}, not {expected:?}")]
    RomMismatch { expected: String, found: String },
}

/// Machine invariant violations. These are fatal: the machine stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("call stack overflow")]
    StackOverflow,
    #[error("return with an empty call stack")]
    StackUnderflow,
}

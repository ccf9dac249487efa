use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::MAX_PROGRAM_SIZE;
use crate::error::LoadError;

/// # ROM
/// A program image together with where it came from.
///
/// The name is used to pick save state files and the bytes are kept around so
/// the machine can be reset in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rom {
    name: String,
    path: Option<PathBuf>,
    program: Vec<u8>,
}

impl Rom {
    /// Wraps an in-memory program.
    ///
    /// # Arguments
    /// * `name` the program's file name, extension included
    /// * `program` the raw program bytes
    pub fn new(name: impl Into<String>, program: Vec<u8>) -> Result<Self, LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        Ok(Rom {
            name: name.into(),
            path: None,
            program,
        })
    }

    /// Reads a program from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let program = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut rom = Rom::new(name, program)?;
        rom.path = Some(path.to_path_buf());
        Ok(rom)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name with any extension removed, e.g. `pong.ch8` -> `pong`.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(0) | None => &self.name,
            Some(dot) => &self.name[..dot],
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }
}

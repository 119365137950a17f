use std::fmt;

use crate::memory::TypeAddr;

/// Which address space an out of range access hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Memory,
    Keypad,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Memory => write!(f, "memory"),
            Region::Keypad => write!(f, "keypad"),
        }
    }
}

/// Faults raised by the interpreter. Every one of them halts the machine,
/// except `InvalidOpcode` when running in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Chip8Error {
    #[error("invalid opcode {opcode:#06X} at {addr:#05X}")]
    InvalidOpcode { opcode: u16, addr: TypeAddr },

    #[error("stack overflow: call at {addr:#05X} with a full call stack")]
    StackOverflow { addr: TypeAddr },

    #[error("stack underflow: return at {addr:#05X} with an empty call stack")]
    StackUnderflow { addr: TypeAddr },

    #[error("{region} access out of bounds at {index:#06X}")]
    OutOfBoundsAccess { region: Region, index: usize },

    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    LoadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Chip8Error>;

use crate::error::{Chip8Error, Region, Result};

pub const KEY_COUNT: usize = 16;

/// The hex keypad as the interpreter sees it. Only the host writes to it,
/// between scheduler batches.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    /// Releases every key, e.g. when the host window loses focus.
    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Swaps in a whole snapshot at once.
    pub fn replace(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    /// Keys above 0xF are rejected, same as in `is_pressed`.
    pub fn set(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self.keys.get_mut(key as usize).ok_or(out_of_range(key))?;
        *slot = pressed;
        Ok(())
    }

    pub fn press(&mut self, key: u8) -> Result<()> {
        self.set(key, true)
    }

    pub fn release(&mut self, key: u8) -> Result<()> {
        self.set(key, false)
    }

    /// Key state for a value taken from a V register, which may exceed 0xF.
    pub fn is_pressed(&self, key: u8) -> Result<bool> {
        self.keys.get(key as usize).copied().ok_or(out_of_range(key))
    }

    pub fn snapshot(&self) -> [bool; KEY_COUNT] {
        self.keys
    }
}

fn out_of_range(key: u8) -> Chip8Error {
    Chip8Error::OutOfBoundsAccess {
        region: Region::Keypad,
        index: key as usize,
    }
}

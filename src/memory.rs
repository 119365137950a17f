use crate::error::{Chip8Error, Region, Result};
use crate::registers::{IndexRegister, ProgramCounter};

pub type TypeAddr = u16; // in reality u12
pub type FontBytes = [u8; FONT_GLYPH_BYTES * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const FONT_ADDR: TypeAddr = 0x050;
pub const FONT_GLYPH_BYTES: usize = 5;
pub const PROGRAM_ADDR: TypeAddr = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_ADDR as usize;
pub const STACK_CAPACITY: usize = 128;

pub const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F (000 -> 04F is empty by convention)
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
            pc: ProgramCounter(PROGRAM_ADDR),
            index: IndexRegister(0x0),
            stack: Stack::new(),
        };
        mem.write_font(&DEFAULT_FONT);
        mem
    }

    /// `len` bytes starting at `addr`. The whole range is checked up front.
    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8]> {
        let start = addr as usize;
        self.bytes
            .get(start..start + len)
            .ok_or_else(|| out_of_bounds(start.max(MEMORY_SIZE)))
    }

    pub fn slice_mut(&mut self, addr: TypeAddr, len: usize) -> Result<&mut [u8]> {
        let start = addr as usize;
        self.bytes
            .get_mut(start..start + len)
            .ok_or_else(|| out_of_bounds(start.max(MEMORY_SIZE)))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    pub fn decrement_pc(&mut self) {
        self.pc.decrement();
    }

    /// Reads the two instruction bytes at PC and moves PC past them.
    /// PC stays put when the fetch itself is out of range.
    pub fn next_instruction(&mut self) -> Result<[u8; 2]> {
        let word = self.slice(self.pc.0, 2)?;
        let bytes = [word[0], word[1]];
        self.increment_pc();
        Ok(bytes)
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    /// Wipes memory, PC, I and the stack, then writes the font at 0x050 and
    /// the program at 0x200. An oversized program leaves everything as it was.
    pub fn load(&mut self, program: &[u8], font: &FontBytes) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::LoadTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        self.bytes = [0; MEMORY_SIZE];
        self.stack = Stack::new();
        self.index.set_addr(0);
        self.write_font(font);

        let start_index = PROGRAM_ADDR as usize;
        self.bytes[start_index..start_index + program.len()].copy_from_slice(program);
        self.pc.set_addr(PROGRAM_ADDR);
        Ok(())
    }

    fn write_font(&mut self, font: &FontBytes) {
        let start_index = FONT_ADDR as usize;
        self.bytes[start_index..start_index + font.len()].copy_from_slice(font);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

fn out_of_bounds(index: usize) -> Chip8Error {
    Chip8Error::OutOfBoundsAccess {
        region: Region::Memory,
        index,
    }
}

/// Return addresses for 2NNN/00EE, with room for `STACK_CAPACITY` frames.
pub struct Stack {
    addresses: [TypeAddr; STACK_CAPACITY],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_CAPACITY],
            sp: 0,
        }
    }

    /// `None` when the stack is already full.
    pub fn push(&mut self, addr: TypeAddr) -> Option<()> {
        let slot = self.addresses.get_mut(self.sp)?;
        *slot = addr;
        self.sp += 1;
        Some(())
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.addresses[self.sp])
    }

    pub fn len(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

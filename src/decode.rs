use crate::bits::{addr_from_nibbles, byte_from_nibbles, nibbles};
use crate::error::{Chip8Error, Result};
use crate::memory::TypeAddr;

/// One fetched instruction split into nibbles, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction(pub [u8; 4]);

impl Instruction {
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(nibbles(bytes[0], bytes[1]))
    }

    pub fn raw(&self) -> u16 {
        let [a, b, c, d] = self.0;
        ((a as u16) << 12) | ((b as u16) << 8) | ((c as u16) << 4) | d as u16
    }

    pub fn x(&self) -> u8 {
        self.0[1]
    }

    pub fn y(&self) -> u8 {
        self.0[2]
    }

    pub fn n(&self) -> u8 {
        self.0[3]
    }

    pub fn nn(&self) -> u8 {
        byte_from_nibbles(self.0[2], self.0[3])
    }

    pub fn nnn(&self) -> TypeAddr {
        addr_from_nibbles(self.0[1], self.0[2], self.0[3])
    }
}

#[test]
fn test_bit_manip() {
    let ins = Instruction::from_bytes([0x4C, 0xEE]);
    assert_eq!(ins.0, [0x4, 0xC, 0xE, 0xE]);
    assert_eq!(ins.x(), 0xC);
    assert_eq!(ins.y(), 0xE);
    assert_eq!(ins.n(), 0xE);
    assert_eq!(ins.nn(), 0xEE);
    assert_eq!(ins.nnn(), 0xCEE);
    assert_eq!(ins.raw(), 0x4CEE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, no carry
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),
}

impl OpCodes {
    /// `addr` is where the instruction was fetched from, for error reporting.
    pub fn decode(ins: Instruction, addr: TypeAddr) -> Result<Self> {
        let (x, y, n, nn, nnn) = (ins.x(), ins.y(), ins.n(), ins.nn(), ins.nnn());

        let op = match ins.0 {
            [0x0, 0x0, 0xE, 0x0] => Self::ClearScreen,
            [0x0, 0x0, 0xE, 0xE] => Self::PopSubroutine,
            [0x1, ..] => Self::Jump(nnn),
            [0x2, ..] => Self::PushSubroutine(nnn),
            [0x3, ..] => Self::SkipEqualConstant(x, nn),
            [0x4, ..] => Self::SkipNotEqualConstant(x, nn),
            [0x5, _, _, 0x0] => Self::SkipEqualRegister(x, y),
            [0x6, ..] => Self::SetRegister(x, nn),
            [0x7, ..] => Self::AddToRegister(x, nn),
            [0x8, _, _, 0x0] => Self::CopyRegister(x, y),
            [0x8, _, _, 0x1] => Self::Or(x, y),
            [0x8, _, _, 0x2] => Self::And(x, y),
            [0x8, _, _, 0x3] => Self::XOr(x, y),
            [0x8, _, _, 0x4] => Self::Add(x, y),
            [0x8, _, _, 0x5] => Self::SubtractForward(x, y),
            [0x8, _, _, 0x6] => Self::RightShift(x, y),
            [0x8, _, _, 0x7] => Self::SubtractBackward(x, y),
            [0x8, _, _, 0xE] => Self::LeftShift(x, y),
            [0x9, _, _, 0x0] => Self::SkipNotEqualRegister(x, y),
            [0xA, ..] => Self::SetIndexRegister(nnn),
            [0xB, ..] => Self::JumpWithOffset(nnn),
            [0xC, ..] => Self::Random(x, nn),
            [0xD, ..] => Self::Display(x, y, n),
            [0xE, _, 0x9, 0xE] => Self::SkipIfPressed(x),
            [0xE, _, 0xA, 0x1] => Self::SkipIfNotPressed(x),
            [0xF, _, 0x0, 0x7] => Self::CopyDelayToRegister(x),
            [0xF, _, 0x0, 0xA] => Self::GetKey(x),
            [0xF, _, 0x1, 0x5] => Self::CopyRegisterToDelay(x),
            [0xF, _, 0x1, 0x8] => Self::CopyRegisterToSound(x),
            [0xF, _, 0x1, 0xE] => Self::AddToIndex(x),
            [0xF, _, 0x2, 0x9] => Self::PointChar(x),
            [0xF, _, 0x3, 0x3] => Self::ToDecimal(x),
            [0xF, _, 0x5, 0x5] => Self::StoreRegisterToMemory(x),
            [0xF, _, 0x6, 0x5] => Self::LoadRegisterFromMemory(x),
            _ => {
                return Err(Chip8Error::InvalidOpcode {
                    opcode: ins.raw(),
                    addr,
                })
            }
        };
        Ok(op)
    }
}

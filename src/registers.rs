use crate::memory::TypeAddr;

pub const FLAG_REGISTER: u8 = 0xF;

/// V0 to VF. Register numbers come straight out of an instruction nibble,
/// so only the low four bits are used.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    /// VF as 0 or 1.
    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(FLAG_REGISTER, u8::from(flag));
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.registers
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

use log::{debug, error, info, trace, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::Settings;
use crate::decimal::to_decimal_digits;
use crate::decode::{Instruction, OpCodes};
use crate::display::FrameBuffer;
use crate::error::{Chip8Error, Result};
use crate::keyboard::Keypad;
use crate::memory::{FontBytes, Memory, TypeAddr, DEFAULT_FONT, FONT_ADDR, FONT_GLYPH_BYTES};
use crate::registers::Registers;
use crate::timer::Timer;

/// The whole machine: memory, registers, timers, screen and keypad, plus the
/// fetch/decode/execute engine that drives them.
pub struct Emulator {
    fb: FrameBuffer,
    pub(crate) regs: Registers,
    pub(crate) mem: Memory,
    pub(crate) delay_timer: Timer,
    pub(crate) sound_timer: Timer,
    keypad: Keypad,
    rng: SmallRng,
    settings: Settings,
    fault: Option<Chip8Error>,
}

impl Emulator {
    pub fn new(settings: Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            keypad: Keypad::new(),
            rng,
            settings,
            fault: None,
        }
    }

    /// Inserts a new cartridge using the built-in font.
    pub fn load_rom(&mut self, program: &[u8]) -> Result<()> {
        self.reset(program, &DEFAULT_FONT)
    }

    /// Zeroes every part of the machine, then loads `font` and `program`.
    /// Clears any previous fault. A program that does not fit is rejected
    /// before anything is touched.
    pub fn reset(&mut self, program: &[u8], font: &FontBytes) -> Result<()> {
        self.mem.load(program, font)?;
        self.regs = Registers::new();
        self.fb.clear_buffer();
        self.delay_timer.set(0);
        self.sound_timer.set(0);
        self.keypad.clear();
        self.fault = None;
        info!("loaded {} byte program", program.len());
        Ok(())
    }

    pub fn fetch(&mut self) -> Result<Instruction> {
        let bytes = self.mem.next_instruction()?;
        Ok(Instruction::from_bytes(bytes))
    }

    pub fn fetch_decode(&mut self) -> Result<OpCodes> {
        let addr = self.mem.pc.0;
        let ins = self.fetch()?;
        let op = OpCodes::decode(ins, addr);
        trace!("{:#05X}: {:04X} {:?}", addr, ins.raw(), op);
        op
    }

    /// Runs one instruction. A fault halts the machine until the next reset,
    /// except unknown opcodes in debug mode, which are skipped.
    pub fn step(&mut self) -> Result<()> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        let result = self
            .fetch_decode()
            .and_then(|operation| self.execute_ins(operation));

        match result {
            Err(Chip8Error::InvalidOpcode { opcode, addr }) if self.settings.debug => {
                warn!("skipping invalid opcode {opcode:#06X} at {addr:#05X}");
                Ok(())
            }
            Err(e) => {
                error!("halting: {e}");
                self.fault = Some(e.clone());
                Err(e)
            }
            Ok(()) => Ok(()),
        }
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<()> {
        // PC has already moved past the instruction
        let addr = self.mem.pc.0.wrapping_sub(2);

        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
            }
            OpCodes::PopSubroutine => {
                let ret = self
                    .mem
                    .stack
                    .pop()
                    .ok_or(Chip8Error::StackUnderflow { addr })?;
                self.mem.set_pc(ret);
            }
            OpCodes::Jump(nnn) => {
                self.mem.set_pc(nnn);
            }
            OpCodes::PushSubroutine(nnn) => {
                self.mem
                    .stack
                    .push(self.mem.pc.0)
                    .ok_or(Chip8Error::StackOverflow { addr })?;
                self.mem.set_pc(nnn);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // VF is written last in the ALU ops so it holds the flag even when it is VX
            OpCodes::Add(vx, vy) => {
                let (z, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_register(vx, z);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (z, borrow) = self.regs.get(vx).overflowing_sub(self.regs.get(vy));
                self.regs.set_register(vx, z);
                self.regs.set_flag(!borrow);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (z, borrow) = self.regs.get(vy).overflowing_sub(self.regs.get(vx));
                self.regs.set_register(vx, z);
                self.regs.set_flag(!borrow);
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value >> 1);
                self.regs.set_flag(vx_value & 1 == 1);
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value << 1);
                self.regs.set_flag(vx_value >> 7 == 1);
            }
            OpCodes::SetIndexRegister(nnn) => self.mem.set_index(nnn),
            OpCodes::JumpWithOffset(nnn) => {
                self.mem.set_pc(nnn + self.regs.get(0) as TypeAddr);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // From I to I + N, plot at VX, VY
                let sprite = self.mem.slice(self.mem.index.0, height as usize)?;
                let collision = self.fb.paint(x, y, sprite);
                self.regs.set_flag(collision);
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keypad.is_pressed(self.regs.get(vx))? {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keypad.is_pressed(self.regs.get(vx))? {
                    self.mem.increment_pc();
                }
            }
            OpCodes::GetKey(vx) => {
                // spin on this instruction until the key is held
                if !self.keypad.is_pressed(self.regs.get(vx))? {
                    self.mem.decrement_pc();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.get()),
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::AddToIndex(vx) => {
                self.mem
                    .set_index(self.mem.index.0.wrapping_add(self.regs.get(vx) as TypeAddr));
            }
            OpCodes::PointChar(vx) => {
                let glyph = self.regs.get(vx) as TypeAddr;
                self.mem
                    .set_index(FONT_ADDR + glyph * FONT_GLYPH_BYTES as TypeAddr);
            }
            OpCodes::ToDecimal(vx) => {
                let digits = to_decimal_digits(self.regs.get(vx));
                self.mem
                    .slice_mut(self.mem.index.0, digits.len())?
                    .copy_from_slice(&digits);
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let count = vx as usize + 1;
                self.mem
                    .slice_mut(self.mem.index.0, count)?
                    .copy_from_slice(&self.regs.as_slice()[..count]);
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let src = self.mem.slice(self.mem.index.0, vx as usize + 1)?;
                for (reg, &reg_val) in src.iter().enumerate() {
                    self.regs.set_register(reg as u8, reg_val);
                }
            }
        }
        Ok(())
    }

    /// One 60 Hz tick of both timers.
    pub fn sync_timers(&mut self) {
        self.delay_timer.tick();
        if self.sound_timer.tick() && !self.sound_timer.is_active() {
            debug!("sound timer expired");
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get()
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn register(&self, reg_num: u8) -> u8 {
        self.regs.get(reg_num)
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.mem.index.0
    }

    pub fn stack_depth(&self) -> usize {
        self.mem.stack.len()
    }

    pub fn memory(&self) -> &[u8] {
        self.mem.bytes()
    }

    pub fn last_fault(&self) -> Option<&Chip8Error> {
        self.fault.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Region;
    use crate::memory::{PROGRAM_ADDR, STACK_CAPACITY};

    fn emu_with(program: &[u8]) -> Emulator {
        let mut emu = Emulator::new(Settings::new(500, false, Some(1)));
        emu.load_rom(program).unwrap();
        emu
    }

    fn run(emu: &mut Emulator, steps: usize) {
        for _ in 0..steps {
            emu.step().unwrap();
        }
    }

    #[test]
    fn test_add_with_carry() {
        // V0 = FF, V1 = 01, V0 += V1
        let mut emu = emu_with(&[0x60, 0xFF, 0x61, 0x01, 0x80, 0x14]);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(0), 0x00);
        assert_eq!(emu.regs.get(0xF), 1);
    }

    #[test]
    fn test_add_immediate_wraps_without_flag() {
        let mut emu = emu_with(&[0x60, 0xFF, 0x70, 0x02]);
        run(&mut emu, 2);
        assert_eq!(emu.regs.get(0), 0x01);
        assert_eq!(emu.regs.get(0xF), 0);
    }

    #[test]
    fn test_subtract_borrow() {
        let mut emu = emu_with(&[0x61, 0x01, 0x62, 0x02, 0x81, 0x25]);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(1), 0xFF);
        assert_eq!(emu.regs.get(0xF), 0);
    }

    #[test]
    fn test_subtract_equal_is_no_borrow() {
        let mut emu = emu_with(&[0x61, 0x05, 0x62, 0x05, 0x81, 0x25]);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(1), 0);
        assert_eq!(emu.regs.get(0xF), 1);
    }

    #[test]
    fn test_subtract_backward() {
        let mut emu = emu_with(&[0x61, 0x05, 0x62, 0x02, 0x81, 0x27]);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(1), 0xFD);
        assert_eq!(emu.regs.get(0xF), 0);
    }

    #[test]
    fn test_shifts() {
        let mut emu = emu_with(&[0x61, 0x81, 0x81, 0x06, 0x62, 0x81, 0x82, 0x0E]);
        run(&mut emu, 2);
        assert_eq!(emu.regs.get(1), 0x40);
        assert_eq!(emu.regs.get(0xF), 1);
        run(&mut emu, 2);
        assert_eq!(emu.regs.get(2), 0x02);
        assert_eq!(emu.regs.get(0xF), 1);
    }

    #[test]
    fn test_shifts_clear_flag() {
        // VF starts at 1 so a missed write would show
        let mut emu = emu_with(&[
            0x6F, 0x01, 0x63, 0x80, 0x83, 0x06, // 0x80 >> 1
            0x6F, 0x01, 0x64, 0x01, 0x84, 0x0E, // 0x01 << 1
        ]);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(3), 0x40);
        assert_eq!(emu.regs.get(0xF), 0);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(4), 0x02);
        assert_eq!(emu.regs.get(0xF), 0);
    }

    #[test]
    fn test_flag_register_as_destination() {
        // VF = 0xFF, V1 = 1, VF += V1 -> flag wins
        let mut emu = emu_with(&[0x6F, 0xFF, 0x61, 0x01, 0x8F, 0x14]);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(0xF), 1);
    }

    #[test]
    fn test_logic_ops() {
        let mut emu = emu_with(&[
            0x60, 0xF0, 0x61, 0x3C, 0x80, 0x11, // OR
            0x62, 0xF0, 0x82, 0x12, // AND
            0x63, 0xF0, 0x83, 0x13, // XOR
            0x84, 0x10, // copy
        ]);
        run(&mut emu, 8);
        assert_eq!(emu.regs.get(0), 0xFC);
        assert_eq!(emu.regs.get(2), 0x30);
        assert_eq!(emu.regs.get(3), 0xCC);
        assert_eq!(emu.regs.get(4), 0x3C);
    }

    #[test]
    fn test_call_return_round_trip() {
        let mut program = vec![0u8; 0x102];
        program[0..2].copy_from_slice(&[0x23, 0x00]);
        program[0x100..0x102].copy_from_slice(&[0x00, 0xEE]);
        let mut emu = emu_with(&program);
        emu.step().unwrap();
        assert_eq!(emu.mem.pc.0, 0x300);
        emu.step().unwrap();
        assert_eq!(emu.mem.pc.0, 0x202);
        assert!(emu.mem.stack.is_empty());
    }

    #[test]
    fn test_stack_underflow() {
        let mut emu = emu_with(&[0x00, 0xEE]);
        assert_eq!(
            emu.step(),
            Err(Chip8Error::StackUnderflow { addr: 0x200 })
        );
        assert!(emu.is_halted());
    }

    #[test]
    fn test_stack_overflow() {
        // calls itself forever
        let mut emu = emu_with(&[0x22, 0x00]);
        run(&mut emu, STACK_CAPACITY);
        assert_eq!(
            emu.step(),
            Err(Chip8Error::StackOverflow { addr: 0x200 })
        );
    }

    #[test]
    fn test_skips() {
        let mut emu = emu_with(&[0x60, 0x07, 0x30, 0x07]);
        run(&mut emu, 2);
        assert_eq!(emu.mem.pc.0, 0x206);

        let mut emu = emu_with(&[0x60, 0x07, 0x40, 0x07]);
        run(&mut emu, 2);
        assert_eq!(emu.mem.pc.0, 0x204);

        let mut emu = emu_with(&[0x60, 0x07, 0x61, 0x07, 0x50, 0x10]);
        run(&mut emu, 3);
        assert_eq!(emu.mem.pc.0, 0x208);

        let mut emu = emu_with(&[0x60, 0x07, 0x90, 0x10]);
        run(&mut emu, 2);
        assert_eq!(emu.mem.pc.0, 0x206);
    }

    #[test]
    fn test_jumps_and_index() {
        let mut emu = emu_with(&[0x60, 0x10, 0xB3, 0x00]);
        run(&mut emu, 2);
        assert_eq!(emu.mem.pc.0, 0x310);

        let mut emu = emu_with(&[0xA1, 0x23, 0x60, 0x05, 0xF0, 0x1E]);
        run(&mut emu, 3);
        assert_eq!(emu.mem.index.0, 0x128);
    }

    #[test]
    fn test_random_is_masked() {
        let mut emu = emu_with(&[0xC0, 0x0F, 0xC1, 0x00]);
        run(&mut emu, 2);
        assert_eq!(emu.regs.get(0) & 0xF0, 0);
        assert_eq!(emu.regs.get(1), 0);
    }

    #[test]
    fn test_random_is_seeded() {
        let mut a = emu_with(&[0xC0, 0xFF]);
        let mut b = emu_with(&[0xC0, 0xFF]);
        run(&mut a, 1);
        run(&mut b, 1);
        assert_eq!(a.regs.get(0), b.regs.get(0));
    }

    #[test]
    fn test_font_glyph_draw() {
        // V0 = 0, I = glyph 0, draw at (V1, V2) = (0, 0)
        let mut emu = emu_with(&[0x60, 0x00, 0xF0, 0x29, 0xD1, 0x25]);
        run(&mut emu, 3);
        assert_eq!(emu.mem.index.0, FONT_ADDR);
        assert_eq!(emu.regs.get(0xF), 0);
        assert_eq!(emu.frame_buffer().pixel(0, 0), 1);
        assert_eq!(emu.frame_buffer().pixel(1, 1), 0);
        assert_eq!(emu.frame_buffer().pixel(3, 4), 1);
    }

    #[test]
    fn test_draw_twice_collides() {
        let mut emu = emu_with(&[0x60, 0x0A, 0xF0, 0x29, 0xD1, 0x25, 0xD1, 0x25]);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(0xF), 0);
        run(&mut emu, 1);
        assert_eq!(emu.regs.get(0xF), 1);
        assert!(emu.frame_buffer().pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_clear_screen() {
        let mut emu = emu_with(&[0xF0, 0x29, 0xD0, 0x05, 0x00, 0xE0]);
        run(&mut emu, 2);
        assert!(emu.frame_buffer().pixels().iter().any(|&p| p == 1));
        run(&mut emu, 1);
        assert!(emu.frame_buffer().pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_key_skips() {
        let mut emu = emu_with(&[0x60, 0x05, 0xE0, 0x9E, 0x00, 0x00, 0xE0, 0xA1]);
        emu.keypad_mut().press(5).unwrap();
        run(&mut emu, 2);
        assert_eq!(emu.mem.pc.0, 0x206);
        run(&mut emu, 1);
        assert_eq!(emu.mem.pc.0, 0x208);
    }

    #[test]
    fn test_key_out_of_range() {
        let mut emu = emu_with(&[0x60, 0x20, 0xE0, 0x9E]);
        run(&mut emu, 1);
        assert_eq!(
            emu.step(),
            Err(Chip8Error::OutOfBoundsAccess {
                region: Region::Keypad,
                index: 0x20
            })
        );
    }

    #[test]
    fn test_wait_for_key() {
        let mut emu = emu_with(&[0x60, 0x03, 0xF0, 0x0A]);
        run(&mut emu, 3);
        assert_eq!(emu.mem.pc.0, 0x202);
        emu.keypad_mut().press(3).unwrap();
        run(&mut emu, 1);
        assert_eq!(emu.mem.pc.0, 0x204);
    }

    #[test]
    fn test_timers() {
        let mut emu = emu_with(&[0x60, 0x3C, 0xF0, 0x15, 0xF0, 0x18, 0xF1, 0x07]);
        run(&mut emu, 3);
        assert_eq!(emu.delay_timer(), 60);
        assert!(emu.sound_active());
        emu.sync_timers();
        run(&mut emu, 1);
        assert_eq!(emu.regs.get(1), 59);
        assert_eq!(emu.sound_timer(), 59);
    }

    #[test]
    fn test_bcd() {
        let mut emu = emu_with(&[0x60, 0xFE, 0xA3, 0x00, 0xF0, 0x33]);
        run(&mut emu, 3);
        assert_eq!(emu.mem.slice(0x300, 3).unwrap(), &[2, 5, 4]);
    }

    #[test]
    fn test_store_and_load_registers() {
        let mut emu = emu_with(&[
            0x60, 0x11, 0x61, 0x22, 0x62, 0x33, 0xA3, 0x00, 0xF1, 0x55, // store V0..V1
            0x60, 0x00, 0x61, 0x00, 0xF1, 0x65, // load V0..V1
        ]);
        run(&mut emu, 5);
        assert_eq!(emu.mem.slice(0x300, 3).unwrap(), &[0x11, 0x22, 0x00]);
        assert_eq!(emu.mem.index.0, 0x300);
        run(&mut emu, 3);
        assert_eq!(emu.regs.get(0), 0x11);
        assert_eq!(emu.regs.get(1), 0x22);
        assert_eq!(emu.regs.get(2), 0x33);
    }

    #[test]
    fn test_store_out_of_bounds_writes_nothing() {
        // I = 0xFFE, store V0..V3 would run off the end
        let mut emu = emu_with(&[0x60, 0xAA, 0xAF, 0xFE, 0xF3, 0x55]);
        run(&mut emu, 2);
        assert_eq!(
            emu.step(),
            Err(Chip8Error::OutOfBoundsAccess {
                region: Region::Memory,
                index: 0x1000
            })
        );
        assert_eq!(emu.mem.slice(0xFFE, 2).unwrap(), &[0, 0]);
    }

    /// Runs `setup` instructions, then expects the next one to fault on
    /// memory without touching anything but PC.
    fn assert_memory_fault_is_clean(program: &[u8], setup: usize) {
        let mut emu = emu_with(program);
        run(&mut emu, setup);
        let regs = emu.regs.clone();
        let mem = emu.mem.bytes().to_vec();
        let fb = emu.fb.clone();
        let pc = emu.mem.pc.0;

        assert_eq!(
            emu.step(),
            Err(Chip8Error::OutOfBoundsAccess {
                region: Region::Memory,
                index: 0x1000
            })
        );
        assert_eq!(emu.regs, regs);
        assert_eq!(emu.mem.bytes(), &mem[..]);
        assert_eq!(emu.fb, fb);
        assert_eq!(emu.mem.pc.0, pc + 2);
    }

    #[test]
    fn test_draw_past_memory_end() {
        // I = 0xFFE, 5-row sprite
        assert_memory_fault_is_clean(&[0xAF, 0xFE, 0xD0, 0x15], 1);
    }

    #[test]
    fn test_bcd_past_memory_end() {
        assert_memory_fault_is_clean(&[0x60, 0xFE, 0xAF, 0xFE, 0xF0, 0x33], 2);
    }

    #[test]
    fn test_load_past_memory_end() {
        // V0..V2 from 0xFFE
        assert_memory_fault_is_clean(&[0xAF, 0xFE, 0xF2, 0x65], 1);
    }

    #[test]
    fn test_invalid_opcode_halts() {
        let mut emu = emu_with(&[0x60, 0x42, 0xFF, 0xFF]);
        run(&mut emu, 1);
        let regs = emu.regs.clone();
        let mem = emu.mem.bytes().to_vec();

        assert_eq!(
            emu.step(),
            Err(Chip8Error::InvalidOpcode {
                opcode: 0xFFFF,
                addr: 0x202
            })
        );
        assert!(emu.is_halted());
        assert_eq!(emu.regs, regs);
        assert_eq!(emu.mem.bytes(), &mem[..]);
        assert_eq!(emu.mem.pc.0, 0x204);

        // stays halted
        assert!(emu.step().is_err());
        assert_eq!(emu.mem.pc.0, 0x204);
    }

    #[test]
    fn test_invalid_opcode_debug_mode() {
        let mut emu = Emulator::new(Settings::new(500, true, Some(1)));
        emu.load_rom(&[0xFF, 0xFF, 0x60, 0x01]).unwrap();
        run(&mut emu, 2);
        assert!(!emu.is_halted());
        assert_eq!(emu.regs.get(0), 1);
    }

    #[test]
    fn test_debug_mode_keeps_other_faults() {
        let mut emu = Emulator::new(Settings::new(500, true, Some(1)));
        emu.load_rom(&[0x00, 0xEE]).unwrap();
        assert!(emu.step().is_err());
        assert!(emu.is_halted());
    }

    #[test]
    fn test_fetch_out_of_bounds() {
        let mut emu = emu_with(&[0x1F, 0xFF]);
        run(&mut emu, 1);
        assert_eq!(
            emu.step(),
            Err(Chip8Error::OutOfBoundsAccess {
                region: Region::Memory,
                index: 0x1000
            })
        );
        assert_eq!(emu.mem.pc.0, 0xFFF);
    }

    #[test]
    fn test_reset_clears_fault_and_state() {
        let mut emu = emu_with(&[0x60, 0x42, 0xF0, 0x18, 0xFF, 0xFF]);
        emu.keypad_mut().press(1).unwrap();
        assert!(emu.step().is_ok());
        assert!(emu.step().is_ok());
        assert!(emu.step().is_err());

        emu.load_rom(&[0x61, 0x01]).unwrap();
        assert!(!emu.is_halted());
        assert_eq!(emu.last_fault(), None);
        assert_eq!(emu.regs.get(0), 0);
        assert_eq!(emu.sound_timer(), 0);
        assert_eq!(emu.keypad().is_pressed(1), Ok(false));
        assert_eq!(emu.mem.pc.0, PROGRAM_ADDR);
        run(&mut emu, 1);
        assert_eq!(emu.regs.get(1), 1);
    }

    #[test]
    fn test_reset_rejects_oversized_program() {
        let mut emu = emu_with(&[0x61, 0x01]);
        let too_big = vec![0u8; 4000];
        assert!(matches!(
            emu.load_rom(&too_big),
            Err(Chip8Error::LoadTooLarge { size: 4000, .. })
        ));
        run(&mut emu, 1);
        assert_eq!(emu.regs.get(1), 1);
    }

    #[test]
    fn test_state_accessors() {
        // V5 = 0x21, I = 0x300, call 0x208
        let mut emu = emu_with(&[0x65, 0x21, 0xA3, 0x00, 0x22, 0x08, 0x00, 0x00, 0x00, 0xEE]);
        run(&mut emu, 3);
        assert_eq!(emu.register(5), 0x21);
        assert_eq!(emu.index(), 0x300);
        assert_eq!(emu.pc(), 0x208);
        assert_eq!(emu.stack_depth(), 1);
        assert_eq!(emu.memory().len(), 4096);
        assert_eq!(&emu.memory()[0x200..0x202], &[0x65, 0x21]);
        assert_eq!(&emu.memory()[0x50..0x55], &DEFAULT_FONT[..5]);
    }
}

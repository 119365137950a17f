// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Stack of return addresses, 128 deep
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Sound is on while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// Separately:
// CPU: 500 times per second (configurable)
// Timers: 60 times per second
// Display: whenever the host presents a frame

pub mod bits;
pub mod config;
pub mod decimal;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod scheduler;
pub mod timer;

pub use config::Settings;
pub use emulator::Emulator;
pub use error::{Chip8Error, Region};
pub use scheduler::Scheduler;

use std::time::Duration;

use log::debug;

use crate::config::{Settings, MAX_HZ};
use crate::emulator::Emulator;
use crate::error::Result;

/// Longest stretch of host time a single `update` will catch up on.
pub const MAX_FRAME_TIME: Duration = Duration::from_secs(1);

/// Turns host frame time into instruction and timer ticks.
///
/// Two accumulators run side by side: wall-clock time buys instructions at
/// `clock_hz`, and every executed instruction credits one instruction period
/// towards the `timer_hz` timer tick. Leftover time carries into the next call.
#[derive(Debug, Clone)]
pub struct Scheduler {
    instruction_period: Duration,
    timer_period: Duration,
    cpu_acc: Duration,
    timer_acc: Duration,
}

impl Scheduler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            instruction_period: period(settings.clock_hz),
            timer_period: period(settings.timer_hz),
            cpu_acc: Duration::ZERO,
            timer_acc: Duration::ZERO,
        }
    }

    /// Forgets any banked time, for when a new program is loaded.
    pub fn reset(&mut self) {
        self.cpu_acc = Duration::ZERO;
        self.timer_acc = Duration::ZERO;
    }

    /// Advances the machine by `dt` of real time and returns how many
    /// instructions ran. Stops at the first fault and drops the rest of the
    /// banked time. A halted machine runs nothing. Host stalls longer than
    /// `MAX_FRAME_TIME` are cut down to it.
    pub fn update(&mut self, emu: &mut Emulator, dt: Duration) -> Result<usize> {
        if emu.is_halted() {
            return Ok(0);
        }

        self.cpu_acc += dt.min(MAX_FRAME_TIME);
        let mut executed = 0;
        while self.cpu_acc >= self.instruction_period {
            self.cpu_acc -= self.instruction_period;

            if let Err(e) = emu.step() {
                self.reset();
                return Err(e);
            }
            executed += 1;

            self.timer_acc += self.instruction_period;
            while self.timer_acc >= self.timer_period {
                self.timer_acc -= self.timer_period;
                emu.sync_timers();
            }
        }

        if executed > 0 {
            debug!("ran {executed} instructions");
        }
        Ok(executed)
    }
}

fn period(hz: u32) -> Duration {
    // never zero, so the accumulator loops always make progress
    Duration::from_nanos(1_000_000_000 / u64::from(hz.clamp(1, MAX_HZ)))
}

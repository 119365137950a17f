pub const DEFAULT_CLOCK_HZ: u32 = 500;
pub const DEFAULT_TIMER_HZ: u32 = 60;
pub const DEFAULT_SCALE: usize = 16;
/// Fastest clock or timer rate: one tick per nanosecond.
pub const MAX_HZ: u32 = 1_000_000_000;

/// Knobs for one interpreter instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Instructions executed per simulated second.
    pub clock_hz: u32,
    /// Delay/sound timer decrements per simulated second.
    pub timer_hz: u32,
    /// Log and skip unknown opcodes instead of halting.
    pub debug: bool,
    /// Fixed seed for CXNN; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Host window scale factor.
    pub scale: usize,
}

impl Settings {
    pub fn new(clock_hz: u32, debug: bool, seed: Option<u64>) -> Self {
        Self {
            clock_hz: clock_hz.clamp(1, MAX_HZ),
            debug,
            seed,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: usize) -> Self {
        self.scale = scale.max(1);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            timer_hz: DEFAULT_TIMER_HZ,
            debug: false,
            seed: None,
            scale: DEFAULT_SCALE,
        }
    }
}

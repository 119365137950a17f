/// An 8-bit countdown register. The scheduler ticks it at 60 Hz; it stops at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// Returns whether the timer was still running before this tick.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

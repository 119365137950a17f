use crate::bits::nth_bit;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome screen, one byte per pixel, every byte 0 or 1.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: [u8; WIDTH * HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [0; WIDTH * HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [0; WIDTH * HEIGHT];
    }

    /// Row-major pixels, `WIDTH` per row.
    pub fn pixels(&self) -> &[u8] {
        &self.bit_buffer
    }

    /// Pixel at column `x`, row `y`; anything off-screen reads as 0.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        if x >= WIDTH || y >= HEIGHT {
            return 0;
        }
        self.bit_buffer[y * WIDTH + x]
    }

    /// XORs an 8-pixel-wide sprite onto the screen, one row per byte.
    ///
    /// The origin wraps around the screen, the sprite itself does not: rows
    /// and columns past the right or bottom edge are dropped. Returns true if
    /// any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (x, y) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = y + i;
            if ny >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let nx = x + j;
                if nx >= WIDTH {
                    break;
                }
                let bit = u8::from(nth_bit(7 - j as u8, *row));
                let index = ny * WIDTH + nx;
                let previous = self.bit_buffer[index];
                if previous & bit == 1 {
                    vf = true;
                }
                self.bit_buffer[index] = previous ^ bit;
            }
        }
        vf
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.bit_buffer.chunks(WIDTH) {
            let line: String = row
                .iter()
                .map(|&px| if px == 1 { '#' } else { '.' })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

use anyhow::anyhow;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use chip8vm::display::{FrameBuffer, HEIGHT, WIDTH};
use chip8vm::keyboard::Keypad;

use super::keymap;

const TITLE: &str = "chip8vm - ESC to exit";
const FOREGROUND: u32 = 0xFF_E0_42;
const BACKGROUND: u32 = 0xE6_1A_8A;

pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
}

impl Screen {
    pub fn new(scale: usize) -> anyhow::Result<Self> {
        let mut window = Window::new(
            TITLE,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: to_scale(scale),
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("failed to open window: {e}"))?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![BACKGROUND; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
    }

    /// Copies host key state into the keypad in one go. Keys are dropped
    /// while the window is unfocused so nothing stays stuck down.
    pub fn poll_keys(&mut self, keypad: &mut Keypad) {
        if !self.window.is_active() {
            keypad.clear();
            return;
        }
        keypad.replace(keymap::snapshot(&self.window.get_keys()));
    }

    pub fn present(&mut self, fb: &FrameBuffer) -> anyhow::Result<()> {
        for (px, &bit) in self.pixel_buffer.iter_mut().zip(fb.pixels()) {
            *px = if bit == 1 { FOREGROUND } else { BACKGROUND };
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
            .map_err(|e| anyhow!("failed to draw frame: {e}"))
    }

    pub fn show_halted(&mut self, reason: &str) {
        self.window.set_title(&format!("{TITLE} [halted: {reason}]"));
    }
}

fn to_scale(scale: usize) -> Scale {
    match scale {
        0..=1 => Scale::X1,
        2..=3 => Scale::X2,
        4..=7 => Scale::X4,
        8..=15 => Scale::X8,
        16..=31 => Scale::X16,
        _ => Scale::X32,
    }
}

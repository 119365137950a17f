use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};

use chip8vm::config::{DEFAULT_CLOCK_HZ, DEFAULT_SCALE};
use chip8vm::{Emulator, Scheduler, Settings};

use host::sound::Beeper;
use host::window::Screen;

mod host;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, help = "Path to the ROM file to run")]
    rom: String,

    #[arg(short, long, default_value_t = DEFAULT_CLOCK_HZ, help = "Instructions per second")]
    clock_hz: u32,

    #[arg(short, long, help = "Skip unknown opcodes instead of halting")]
    debug: bool,

    #[arg(long, help = "Seed for the random number instruction")]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_SCALE, help = "Window scale factor")]
    scale: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = Settings::new(args.clock_hz, args.debug, args.seed).with_scale(args.scale);

    let program = std::fs::read(&args.rom).with_context(|| format!("reading {}", args.rom))?;
    let mut emu = Emulator::new(settings.clone());
    emu.load_rom(&program)?;
    let mut scheduler = Scheduler::new(&settings);

    let mut screen = Screen::new(settings.scale)?;
    let beeper = match Beeper::new() {
        Ok(b) => Some(b),
        Err(e) => {
            warn!("no audio: {e:#}");
            None
        }
    };

    info!("running {} at {} Hz", args.rom, settings.clock_hz);
    let mut last = Instant::now();
    while screen.is_running() {
        let now = Instant::now();
        let dt = now - last;
        last = now;

        screen.poll_keys(emu.keypad_mut());
        if let Err(e) = scheduler.update(&mut emu, dt) {
            error!("{e}");
            screen.show_halted(&e.to_string());
        }
        if let Some(beeper) = &beeper {
            beeper.set_active(emu.sound_active());
        }
        screen.present(emu.frame_buffer())?;
    }

    Ok(())
}

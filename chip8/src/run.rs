use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::{info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::{Chip8, Machine, TIMER_FREQUENCY};
use chip8_display::{Beeper, Display};

use crate::keymap::keypad_index;

/// How the host loop should drive the machine.
pub struct Settings {
    pub rom: PathBuf,
    pub clock_hz: u32,
    pub scale: u32,
    pub seed: Option<u64>,
}

pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let mut chip8 = match settings.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };

    // Load ROM
    let file = File::open(&settings.rom)
        .with_context(|| format!("unable to open {}", settings.rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("failed to load ROM {}", settings.rom.display()))?;
    info!("loaded ROM {}", settings.rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, settings.scale).map_err(|e| anyhow!(e))?;
    let beeper = match Beeper::new(&sdl) {
        Ok(beeper) => Some(beeper),
        Err(e) => {
            warn!("no audio device, running silent: {}", e);
            None
        }
    };
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    // Set initial timing
    let cycle_time = Duration::from_nanos(1_000_000_000 / u64::from(settings.clock_hz.max(1)));
    let timer_period = Duration::from_nanos(1_000_000_000 / u64::from(TIMER_FREQUENCY));
    let mut last_cycle = Instant::now();
    // Time owed to the timers; they tick at 60Hz whatever the clock speed
    let mut timer_debt = Duration::ZERO;

    'event: loop {
        let cycle_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keypad_index(key) {
                        chip8.set_key(kc, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keypad_index(key) {
                        chip8.set_key(kc, false);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let pc = chip8.pc();
        chip8
            .step()
            .with_context(|| format!("machine halted at {:#05X}", pc))?;

        timer_debt += cycle_start - last_cycle;
        last_cycle = cycle_start;
        while timer_debt >= timer_period {
            chip8.tick_timers();
            timer_debt -= timer_period;
        }

        // If the draw flag is set, render the current frame and acknowledge it
        if chip8.should_draw() {
            display
                .render(chip8.frame_buffer())
                .map_err(|e| anyhow!(e))?;
            chip8.clear_draw_flag();
        }

        if let Some(beeper) = &beeper {
            beeper.set_active(chip8.sound_timer() > 0);
        }

        // Handle timing
        let elapsed_cycle_time = cycle_start.elapsed();
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
    }

    info!("window closed");
    Ok(())
}

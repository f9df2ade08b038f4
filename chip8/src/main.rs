//! Chip-8 - runs a CHIP-8 program in an SDL2 window
//!
//! Set `RUST_LOG=trace` to see every executed instruction.

use std::path::PathBuf;

use anyhow::bail;
use chip8_core::CLOCK_SPEED;
use clap::Parser;

mod keymap;
mod run;

const DEFAULT_CLOCK_HZ: u32 = (1_000_000_000 / CLOCK_SPEED) as u32;

/// CHIP-8 interpreter
#[derive(Parser, Debug)]
#[command(name = "chip8")]
#[command(about = "Runs a CHIP-8 program", long_about = None)]
struct Args {
    /// Path to the ROM file
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(short, long, default_value_t = DEFAULT_CLOCK_HZ)]
    clock_hz: u32,

    /// Size of a CHIP-8 pixel in screen pixels
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Seed for the random number generator, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.rom.exists() {
        bail!("file does not exist: {}", args.rom.display());
    }

    let settings = run::Settings {
        rom: args.rom,
        clock_hz: args.clock_hz,
        scale: args.scale,
        seed: args.seed,
    };
    run::run(&settings)
}

//! nescore runner: load an NROM image and run it headless.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use nescore::Nes;
use nescore::cpu::dispatch::RESET_VECTOR;
use nescore::disasm::{disassemble_range, trace_line};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// iNES ROM file to load
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 60)]
    frames: u32,

    /// Stop after this many CPU steps, whatever the frame count
    #[arg(long)]
    max_steps: Option<u64>,

    /// Print N instructions from the reset vector and exit
    #[arg(short, long, value_name = "N")]
    disassemble: Option<usize>,

    /// Log every instruction before it executes
    #[arg(short, long)]
    trace: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match (args.verbose, args.trace) {
        (0, false) => LevelFilter::Info,
        (1, false) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    info!("Loading ROM: {}", args.rom.display());
    let mut nes = Nes::from_ines_file(&args.rom)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;

    if let Some(count) = args.disassemble {
        let start = nes.peek_word(RESET_VECTOR);
        for ins in disassemble_range(nes.bus(), start, count) {
            println!("{ins}");
        }
        return Ok(());
    }

    let budget = args.max_steps.unwrap_or(u64::MAX);
    let mut steps = 0u64;
    let mut frames = 0u32;
    while frames < args.frames && steps < budget {
        if args.trace {
            log::trace!("{}", trace_line(nes.cpu(), nes.bus()));
        }
        nes.step();
        steps += 1;
        if nes.bus_mut().ppu_mut().take_frame_complete() {
            frames += 1;
        }
    }
    if steps >= budget {
        log::warn!("stopped after {steps} steps");
    }

    let cpu = nes.cpu();
    info!(
        "ran {frames} frame(s), {} cycles, {} invalid bus access(es)",
        nes.cycles(),
        nes.bus().invalid_accesses()
    );
    println!(
        "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PC:{:04X}",
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.status().bits(),
        cpu.sp(),
        cpu.pc()
    );
    Ok(())
}

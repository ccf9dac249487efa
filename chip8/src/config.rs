use std::path::PathBuf;

use clap::Parser;

use vm8_core::constants::TIMER_HZ;
use vm8_display::Palette;

/// Command line for the `vm8` binary.
#[derive(Parser, Debug)]
#[command(name = "vm8", about = "A Chip-8 virtual machine")]
pub struct Args {
    /// Program image to run.
    #[arg(value_name = "ROM")]
    pub rom: PathBuf,

    /// Size of each Chip-8 pixel on screen.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// Colour of lit pixels as 0xRRGGBBAA.
    #[arg(long, value_name = "RGBA", default_value = "0xFFFFFFFF", value_parser = parse_rgba)]
    pub fg: u32,

    /// Colour of unlit pixels as 0xRRGGBBAA.
    #[arg(long, value_name = "RGBA", default_value = "0x000000FF", value_parser = parse_rgba)]
    pub bg: u32,

    /// Draw lit pixels without the background-coloured grid outline.
    #[arg(long, default_value_t = false)]
    pub no_outline: bool,

    /// Instructions executed per second.
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub ips: u32,

    /// Beeper frequency in Hz.
    #[arg(long, default_value_t = 440)]
    pub tone: u32,

    /// Beeper amplitude.
    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(i16).range(0..))]
    pub volume: i16,

    /// Audio output sample rate in Hz.
    #[arg(long, default_value_t = 44_100, value_parser = clap::value_parser!(u32).range(1..=192_000))]
    pub sample_rate: u32,

    /// Directory holding save state files.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub save_dir: PathBuf,

    /// Save slot selected at start-up.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub slot: u8,
}

fn parse_rgba(raw: &str) -> Result<u32, String> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);
    u32::from_str_radix(hex, 16).map_err(|e| format!("could not parse colour '{raw}': {e}"))
}

/// Everything the host loop needs to know, resolved from `Args`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub rom: PathBuf,
    pub scale: u32,
    pub palette: Palette,
    pub outline: bool,
    pub instructions_per_second: u32,
    pub tone_hz: u32,
    pub volume: i16,
    pub sample_rate: u32,
    pub save_dir: PathBuf,
    pub slot: u8,
}

impl Config {
    /// How many instructions run between two timer ticks.
    pub fn instructions_per_frame(&self) -> u32 {
        (self.instructions_per_second / TIMER_HZ).max(1)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            rom: args.rom,
            scale: args.scale,
            palette: Palette::from_rgba(args.fg, args.bg),
            outline: !args.no_outline,
            instructions_per_second: args.ips,
            tone_hz: args.tone,
            volume: args.volume,
            sample_rate: args.sample_rate,
            save_dir: args.save_dir,
            slot: args.slot,
        }
    }
}

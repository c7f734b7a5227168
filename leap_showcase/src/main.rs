//! leap_showcase — interactive entry point.

use std::path::PathBuf;

use clap::Parser;

use leap_showcase::app::{run, AppConfig, SourceKind};
use leap_showcase::view::default_catalogue;
use showcase_core::{init_logging, ShowcaseConfig};

#[derive(Parser, Debug)]
#[command(about = "Gesture-controlled product showcase")]
struct Args {
    /// TOML configuration; `SHOWCASE__*` environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show only the first N products.
    #[arg(long)]
    pages: Option<usize>,

    /// Short idle timeout and auto-advance, for trying the modes out.
    #[arg(long)]
    quick: bool,

    /// Use the simulated hand even when built with `leap`.
    #[arg(long)]
    sim: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging("info");
    let args = Args::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Leap Showcase — Gesture-Controlled Products         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut showcase = ShowcaseConfig::load_or_default(args.config.as_deref())?;
    if args.quick {
        println!("  Quick mode: 8 s idle timeout, 2 s auto-advance\n");
        showcase.mode.idle_timeout_ms = 8_000;
        showcase.mode.idle_check_ms = 500;
        showcase.mode.auto_advance_ms = 2_000;
    }

    let mut catalogue = default_catalogue();
    if let Some(n) = args.pages {
        catalogue.truncate(n.max(1));
    }

    let source = if cfg!(feature = "leap") && !args.sim {
        println!("  Mode: LeapMotion hardware");
        SourceKind::Leap
    } else {
        println!("  Mode: Mouse/keyboard simulation  (use --features leap for hardware)");
        SourceKind::Simulated
    };
    println!();
    println!("  Opening visualizer window…");
    println!();

    run(AppConfig { showcase, catalogue, source, ..AppConfig::default() })
}

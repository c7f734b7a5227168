//! Replay a recorded landmark trace through the showcase and print what the
//! session did.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use showcase_core::{init_logging, parse_trace, replay, ShowcaseConfig};

#[derive(Parser, Debug)]
#[command(about = "Replay a JSON-lines hand landmark trace through the showcase")]
struct Args {
    /// Trace file, one `{"t": ms, "points": [[x, y], ...] | null}` per line.
    trace: PathBuf,

    /// TOML configuration; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of showcase pages.
    #[arg(long, default_value_t = 3)]
    pages: usize,

    /// Keep simulating this long after the last frame.
    #[arg(long, default_value_t = 0)]
    tail_ms: u64,
}

fn main() -> anyhow::Result<()> {
    init_logging("warn");
    let args = Args::parse();

    let config = ShowcaseConfig::load_or_default(args.config.as_deref())?;
    let file = File::open(&args.trace)
        .with_context(|| format!("opening trace {}", args.trace.display()))?;
    let records = parse_trace(BufReader::new(file))?;
    info!("{} records from {}", records.len(), args.trace.display());

    let run = replay(&records, &config, args.pages, args.tail_ms);
    for entry in &run.entries {
        println!("{:>8} ms  {}", entry.at_ms, entry.notification);
    }

    let s = &run.final_state;
    println!();
    println!("  final: mode={} page={}/{} hand={}",
        s.mode, s.page + 1, s.page_count, if s.hand_present { "yes" } else { "no" });
    Ok(())
}

// flashfix/src/main.rs

use clap::Parser;
use flashfix::utils::{LogLevel, set_log_level};
use flashfix::{FixOptions, FlashLayout, fix_file};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "flashfix",
    version,
    about = "Restore the chunk order of a flash dump concatenated with `cat part_*.bin`",
    long_about = None
)]
struct Cli {
    /// Scrambled dump (e.g. backup_full.bin)
    input: PathBuf,

    /// Output path for the fixed dump
    #[arg(long)]
    out: PathBuf,

    /// Layout TOML overriding the built-in 4 MiB / 256 KiB layout
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Only print the mapping, don't write the fixed dump
    #[arg(long)]
    dry_run: bool,

    /// Read the fixed dump back and compare after writing
    #[arg(long)]
    verify: bool,

    /// Only print errors and the mapping table
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    set_log_level(if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    });

    let layout = match &cli.layout {
        Some(path) => FlashLayout::from_file(path)?,
        None => FlashLayout::default(),
    };
    layout.print_summary();

    let opts = FixOptions {
        dry_run: cli.dry_run,
        verify: cli.verify,
    };
    let report = fix_file(&cli.input, &cli.out, &layout, opts)?;

    if report.written {
        flashfix::log_normal!("Wrote fixed dump: {}", report.output.display());
    }
    if report.verified {
        flashfix::log_info!("Verified {}", report.output.display());
    }
    println!("{report}");

    Ok(())
}

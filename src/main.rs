use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use gitver::cli::{self, RunArgs};
use gitver::config;
use gitver::domain::VersionMode;
use gitver::ui;

#[derive(clap::Parser)]
#[command(
    name = "gitver",
    about = "Derive versions from git history and write them into project files"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Version mode: patch-from-tag-date, commits-from-repo-start or tag-third-segment"
    )]
    mode: Option<VersionMode>,

    #[arg(short = 'C', long, help = "Run as if started in this directory")]
    directory: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without writing files")]
    dry_run: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn init_tracing() {
    // RUST_LOG overrides the default of WARN
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("gitver {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing();

    let directory = args.directory.unwrap_or_else(|| PathBuf::from("."));

    let config = match config::load_config(args.config.as_deref(), &directory) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let run_args = RunArgs {
        directory,
        mode: args.mode.unwrap_or(config.mode),
        dry_run: args.dry_run,
    };

    let report = match cli::run(&run_args, &config) {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&format!("Failed to derive version: {}", e));
            std::process::exit(1);
        }
    };

    ui::display_summary(&report, run_args.dry_run);

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

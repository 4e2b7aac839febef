use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xliffsync_cli::{
    RunOptions, run_targets,
    run::load_project,
    stats::{collect_stats, print_stats},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the catalog and resource file of every target.
    Run {
        /// Project config file (default: xliffsync.toml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory all configured paths are relative to
        #[arg(short = 'w', long, default_value = ".")]
        working_dir: PathBuf,

        /// Only process these target languages (repeatable)
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Do not call any translation backend
        #[arg(long)]
        no_translate: bool,
    },

    /// Show unit counts of the existing catalogs without modifying them.
    Stats {
        /// Project config file (default: xliffsync.toml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory all configured paths are relative to
        #[arg(short = 'w', long, default_value = ".")]
        working_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.commands {
        Commands::Run {
            config,
            working_dir,
            targets,
            no_translate,
        } => {
            let options = RunOptions {
                config,
                working_dir,
                targets,
                no_translate,
            };
            run_targets(&options).await.map(|_| ())
        }
        Commands::Stats {
            config,
            working_dir,
            json,
        } => load_project(config.as_deref(), &working_dir)
            .and_then(|project| collect_stats(&project, &working_dir))
            .and_then(|stats| print_stats(&stats, json)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

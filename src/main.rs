//! # pyrelease: The Main Entry Point
//!
//! This module handles Command Line Interface (CLI) parsing, logging initialization,
//! and dispatching commands to the pipeline. Running with no sub-command performs
//! a full build.
//!
//! Exit status is `0` when the release folder was produced and `1` on any failure.

use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};
use simplelog::{Config, SimpleLogger};

mod config;
mod invariant_ppt;
mod pipeline;
mod system;
mod workspace;

use config::{BuildConfig, Layout};
use pipeline::BuildOptions;
use system::HostSystem;

/// The primary Command Line Interface (CLI) configuration.
#[derive(Parser)]
#[command(name = "pyrelease")]
#[command(about = "Packages a Python application into a standalone executable and release folder", long_about = None)]
struct Cli {
    /// The sub-command to execute (build, clean). Defaults to `build`.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root containing the entry script and resource directories.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Configuration file (JSON). Defaults to `pyrelease.json` in the project root.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Turn on verbose logging.
    ///
    /// - `-v`: Debug
    /// - `-vv`: Trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline.
    ///
    /// 1. Clean old build output.
    /// 2. Install Python dependencies.
    /// 3. Build the executable with PyInstaller.
    /// 4. Assemble the release folder.
    /// 5. Remove intermediate build files.
    Build {
        /// Print the commands and file layout without running anything.
        #[arg(long)]
        dry_run: bool,

        /// Skip the dependency installation stage.
        #[arg(long)]
        skip_deps: bool,

        /// Abort when any single dependency fails to install.
        #[arg(long)]
        strict_deps: bool,
    },
    /// Remove build output (`build`, `dist`, the spec file).
    Clean {
        /// Also remove the release folder.
        #[arg(long)]
        release: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Logger init failure is not fatal.
    let _ = SimpleLogger::init(log_level, Config::default());

    if let Err(e) = dispatch(&cli) {
        debug!("Fatal error: {:?}", e);
        println!();
        println!("✗ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    let root = config::resolve_root(&cli.root)?;
    let config = BuildConfig::load(&root, cli.config.as_deref())?;
    debug!("Resolved configuration: {:?}", config);
    let layout = Layout::new(root, config);

    match cli.command {
        None => build(&layout, false, BuildOptions::default()),
        Some(Commands::Build { dry_run, skip_deps, strict_deps }) => {
            let options = BuildOptions {
                skip_dependencies: skip_deps,
                strict_dependencies: strict_deps,
            };
            build(&layout, dry_run, options)
        }
        Some(Commands::Clean { release }) => {
            pipeline::clean_only(&layout, release)?;
            println!("✓ Cleaned");
            Ok(())
        }
    }
}

fn build(layout: &Layout, dry_run: bool, options: BuildOptions) -> Result<()> {
    if dry_run {
        pipeline::print_plan(layout, options);
        return Ok(());
    }

    let product = &layout.config.product_name;
    let rule = "=".repeat(50);

    println!();
    println!("{}", rule);
    println!("{} Build", product);
    println!("{}", rule);

    pipeline::run(layout, &HostSystem, options)?;

    println!();
    println!("{}", rule);
    println!("Build Complete!");
    println!("{}", rule);
    for line in pipeline::completion_summary(layout) {
        println!("{}", line);
    }
    Ok(())
}

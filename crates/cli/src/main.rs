// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! recflow - dependency-aware processing of recording sessions

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{clean, init, run, status, Context};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "recflow",
    version,
    about = "Run analysis pipelines over recording sessions"
)]
struct Cli {
    /// Project root directory (default: current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Configuration file, relative to the project root
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover recordings and create or refresh their jobs
    Init(init::InitArgs),
    /// Run every pending operation of a group
    Run(run::RunArgs),
    /// Show the state of every operation of a group
    Status(status::StatusArgs),
    /// Remove derived products so sessions can be processed again
    Clean(clean::CleanArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let ctx = Context::open(cli.project, cli.config.as_deref())?;

    match cli.command {
        Commands::Init(args) => init::init(&ctx, args)?,
        Commands::Run(args) => return run::run(&ctx, args).await,
        Commands::Status(args) => status::status(&ctx, args)?,
        Commands::Clean(args) => clean::clean(&ctx, args)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn setup_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

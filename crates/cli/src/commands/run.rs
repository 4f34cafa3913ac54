// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `recflow run <group>` - Run every pending operation of a group

use super::Context;
use crate::output::OutputFormat;
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

#[derive(Args)]
pub struct RunArgs {
    /// Operation group (e.g. "analyze_aggregates", or "clean")
    pub group: String,

    /// Only run these operations of the group
    #[arg(short = 'o', long = "operation")]
    pub operations: Vec<String>,

    /// Aggregates processed at once (overrides max_parallel)
    #[arg(short = 'j', long = "jobs", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub async fn run(ctx: &Context, args: RunArgs) -> Result<ExitCode> {
    let group = ctx.group(&args.group)?;
    let jobs = ctx.store()?.snapshot();
    let max_parallel = args
        .jobs
        .map(usize::from)
        .unwrap_or(ctx.project().config().max_parallel);
    let report = ctx
        .runtime(max_parallel)
        .run_group(group, jobs, &args.operations)
        .await?;

    println!("{}", args.format.render(&report)?);
    if report.all_done() {
        Ok(ExitCode::SUCCESS)
    } else {
        for failure in report.failures() {
            tracing::warn!(aggregate = %failure.aggregate, outcome = %failure.outcome, "not done");
        }
        Ok(ExitCode::FAILURE)
    }
}

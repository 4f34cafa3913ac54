// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `recflow init` - Discover recordings and seed the job store

use super::Context;
use crate::output::OutputFormat;
use anyhow::Result;
use clap::Args;
use recflow_engine::discover;

#[derive(Args)]
pub struct InitArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn init(ctx: &Context, args: InitArgs) -> Result<()> {
    let mut store = ctx.store()?;
    let report = discover(ctx.project(), &mut store)?;
    println!("{}", args.format.render(&report)?);
    Ok(())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `recflow status <group>` - Show the state of every operation

use super::Context;
use crate::output::OutputFormat;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct StatusArgs {
    /// Operation group (e.g. "analyze_aggregates")
    pub group: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn status(ctx: &Context, args: StatusArgs) -> Result<()> {
    let group = ctx.group(&args.group)?;
    let jobs = ctx.store()?.snapshot();
    let table = ctx.runtime(1).status(&group, jobs)?;
    if table.rows.is_empty() && args.format == OutputFormat::Text {
        println!("{}: no aggregates (run `recflow init` first?)", table.group);
    } else {
        println!("{}", args.format.render(&table)?);
    }
    Ok(())
}

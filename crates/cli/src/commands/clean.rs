// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `recflow clean` - Remove derived products of sessions

use super::Context;
use crate::output::OutputFormat;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct CleanArgs {
    /// Sessions to clean
    #[arg(required_unless_present = "all")]
    pub sessions: Vec<String>,

    /// Clean every session
    #[arg(long, conflicts_with = "sessions")]
    pub all: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// A products directory that was deleted
#[derive(Serialize)]
#[serde(transparent)]
struct Removed(PathBuf);

impl fmt::Display for Removed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Removed {}", self.0.display())
    }
}

pub fn clean(ctx: &Context, args: CleanArgs) -> Result<()> {
    let jobs = ctx.store()?.snapshot();
    let cleaner = ctx.cleaner();

    let removed = if args.all {
        cleaner.clean_all(jobs)?
    } else {
        let mut removed = Vec::new();
        for session in &args.sessions {
            removed.extend(cleaner.clean(jobs.clone(), session)?);
        }
        removed
    };

    let removed: Vec<Removed> = removed.into_iter().map(Removed).collect();
    println!("{}", args.format.render_list(&removed, "Nothing to clean")?);
    Ok(())
}

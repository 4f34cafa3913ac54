// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of command results for stdout
//!
//! Text is what a person reads at the terminal; JSON is the same result
//! serialized for scripts. Logs never go through here.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::{Display, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Render a single result
    pub fn render<T>(self, value: &T) -> serde_json::Result<String>
    where
        T: Serialize + Display + ?Sized,
    {
        match self {
            OutputFormat::Text => Ok(value.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(value),
        }
    }

    /// Render a list: one item per line, or `empty` when there is nothing
    /// to show. JSON output is always an array.
    pub fn render_list<T>(self, items: &[T], empty: &str) -> serde_json::Result<String>
    where
        T: Serialize + Display,
    {
        match self {
            OutputFormat::Text if items.is_empty() => Ok(empty.to_string()),
            OutputFormat::Text => {
                let mut text = String::new();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        text.push('\n');
                    }
                    let _ = write!(text, "{}", item);
                }
                Ok(text)
            }
            OutputFormat::Json => serde_json::to_string_pretty(items),
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

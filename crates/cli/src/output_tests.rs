// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fmt;

#[derive(Serialize)]
struct Session {
    name: &'static str,
    removed: bool,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} removed={}", self.name, self.removed)
    }
}

fn sessions() -> Vec<Session> {
    vec![
        Session { name: "a", removed: true },
        Session { name: "b", removed: false },
    ]
}

#[test]
fn text_uses_display() {
    let rendered = OutputFormat::Text.render(&sessions()[0]).unwrap();
    assert_eq!(rendered, "a removed=true");
}

#[test]
fn json_uses_serialize() {
    let rendered = OutputFormat::Json.render(&sessions()[1]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value, serde_json::json!({ "name": "b", "removed": false }));
}

#[test]
fn text_list_is_one_line_per_item() {
    let rendered = OutputFormat::Text.render_list(&sessions(), "none").unwrap();
    assert_eq!(rendered, "a removed=true\nb removed=false");
}

#[test]
fn empty_list_renders_placeholder_only_as_text() {
    let empty: Vec<Session> = Vec::new();
    assert_eq!(
        OutputFormat::Text.render_list(&empty, "Nothing to clean").unwrap(),
        "Nothing to clean"
    );
    assert_eq!(OutputFormat::Json.render_list(&empty, "Nothing to clean").unwrap(), "[]");
}

//! Output formatting for `pickwise` commands.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// Print a slice of rows in the chosen mode.
pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => {
            if items.is_empty() {
                println!("(no results)");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
    }
    Ok(())
}

/// Print a single item. Table mode renders it as `key: value` lines.
pub fn print_item<T: Serialize>(item: &T, mode: OutputMode) -> anyhow::Result<()> {
    let value = serde_json::to_value(item)?;
    match (mode, &value) {
        (OutputMode::Table, serde_json::Value::Object(fields)) => {
            for (key, field) in fields {
                match field {
                    serde_json::Value::String(s) => print_kv(key, s),
                    serde_json::Value::Null => print_kv(key, crate::view::MISSING),
                    other => print_kv(key, &other.to_string()),
                }
            }
        }
        _ => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

pub fn print_kv(key: &str, value: &str) {
    println!("{key}: {value}");
}

pub fn print_heading(title: &str, mode: OutputMode) {
    if mode == OutputMode::Table {
        println!("\n{title}");
    }
}

pub fn print_success(msg: &str) {
    println!("\x1b[32m{msg}\x1b[0m");
}

pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m{msg}\x1b[0m");
}

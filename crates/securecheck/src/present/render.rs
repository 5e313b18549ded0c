//! Terminal and JSON rendering of dashboard pages.

use std::fmt::Write as _;

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::style::Style;

use super::{Block, Notice, Page};
use crate::config::DisplayConfig;
use crate::error::Result;
use crate::store::Frame;

/// Render a page for the terminal.
#[must_use]
pub fn render_text(page: &Page, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading(&page.title, display.color));
    let _ = writeln!(out, "{}", "=".repeat(page.title.chars().count()));

    for notice in &page.notices {
        let _ = writeln!(out, "{}", notice_line(notice, display.color));
    }

    for block in &page.blocks {
        out.push('\n');
        match block {
            Block::Text(text) => {
                let _ = writeln!(out, "{text}");
            }
            Block::Table(frame) => out.push_str(&render_table(frame, display.max_rows)),
            Block::Chart(chart) => out.push_str(&chart.render_text(display.chart_width)),
        }
    }
    out
}

/// Render a page as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(page: &Page) -> Result<String> {
    Ok(serde_json::to_string_pretty(page)?)
}

/// Draw a frame as a rounded table, truncated to `max_rows` (0 = all rows).
#[must_use]
pub fn render_table(frame: &Frame, max_rows: usize) -> String {
    if frame.columns().is_empty() {
        return "(no rows)\n".to_string();
    }

    let total = frame.len();
    let shown = if max_rows == 0 { total } else { max_rows.min(total) };

    let mut builder = Builder::default();
    builder.push_record(frame.columns().iter().cloned());
    for row in frame.head(shown).rows() {
        builder.push_record(row.iter().map(ToString::to_string));
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    let mut out = format!("{table}\n");
    if shown < total {
        let _ = writeln!(out, "(showing {shown} of {total} rows)");
    }
    out
}

fn heading(title: &str, color: bool) -> String {
    if color {
        title.bold().to_string()
    } else {
        title.to_string()
    }
}

fn notice_line(notice: &Notice, color: bool) -> String {
    let (symbol, message) = match notice {
        Notice::Success(m) => ("✔", m),
        Notice::Info(m) => ("ℹ", m),
        Notice::Warning(m) => ("⚠", m),
        Notice::Error(m) => ("✖", m),
    };
    let line = format!("{symbol} {message}");
    if !color {
        return line;
    }
    match notice {
        Notice::Success(_) => line.green().to_string(),
        Notice::Info(_) => line.cyan().to_string(),
        Notice::Warning(_) => line.yellow().to_string(),
        Notice::Error(_) => line.red().bold().to_string(),
    }
}

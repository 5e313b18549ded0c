//! Presentation model for dashboard pages.
//!
//! Handlers build a [`Page`]; the `render` submodule turns it into terminal
//! text or JSON. Nothing in here touches the store.

pub mod chart;
pub mod render;

use serde::Serialize;

use crate::store::Frame;

pub use chart::{Chart, ChartKind, ChartSpec};
pub use render::{render_json, render_text};

/// One-line outcome message for an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notice {
    /// The operation succeeded.
    Success(String),
    /// Extra information, such as the summary of an inserted stop.
    Info(String),
    /// The operation ran but produced nothing useful.
    Warning(String),
    /// The operation failed.
    Error(String),
}

impl Notice {
    /// The message text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Info(m) | Self::Warning(m) | Self::Error(m) => m,
        }
    }

    /// Check if this notice reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A unit of page content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Block {
    /// Free text (headings, the Home blurb).
    Text(String),
    /// A result table.
    Table(Frame),
    /// A chart.
    Chart(Chart),
}

/// Everything one dashboard operation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Page heading.
    pub title: String,
    /// Outcome messages, in the order they were raised.
    pub notices: Vec<Notice>,
    /// Content blocks, in display order.
    pub blocks: Vec<Block>,
}

impl Page {
    /// An empty page with a heading.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notices: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Append a notice.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if any notice is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(Notice::is_error)
    }

    /// The tables on this page.
    pub fn tables(&self) -> impl Iterator<Item = &Frame> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(frame) => Some(frame),
            _ => None,
        })
    }

    /// The charts on this page.
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Chart(chart) => Some(chart),
            _ => None,
        })
    }
}

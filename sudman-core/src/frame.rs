//! Renderer-agnostic description of one dashboard screen.
//!
//! Frames borrow from the dashboard state and are rebuilt on every draw.

use crate::dashboard::DetailCommand;
use crate::unit::Unit;

pub const TITLE: &str = "Systemd User Units Manager (sudman)";
pub const LIST_HINT: &str =
    "Use arrow keys to navigate, Enter to select, f to filter, r to refresh, q to quit";
pub const MESSAGE_TITLE: &str = "Message:";
pub const MESSAGE_FOOTER: &str = "Press any key to continue...";
pub const FILTER_PROMPT: &str = "Filter by unit type (e.g. service, timer):";
pub const FILTER_HINT: &str = "Leave empty to clear filter, Esc to cancel";

/// Rows reserved for header, hint, and footer in the list view
pub const LIST_CHROME_ROWS: u16 = 4;
/// Rows reserved for title, spacer, and footer in the message view
pub const MESSAGE_CHROME_ROWS: u16 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame<'a> {
    List(ListFrame<'a>),
    Detail(DetailFrame<'a>),
    Message(MessageFrame),
    FilterPrompt(FilterFrame<'a>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFrame<'a> {
    pub header: String,
    pub hint: &'static str,
    pub rows: Vec<RowView<'a>>,
    pub footer: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView<'a> {
    pub unit: &'a Unit,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailFrame<'a> {
    pub unit: &'a Unit,
    pub actions: Vec<(char, &'static str)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageFrame {
    pub title: &'static str,
    pub lines: Vec<String>,
    pub footer: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterFrame<'a> {
    pub prompt: &'static str,
    pub hint: &'static str,
    pub input: &'a str,
}

impl<'a> DetailFrame<'a> {
    pub fn new(unit: &'a Unit) -> Self {
        Self {
            unit,
            actions: DetailCommand::BINDINGS
                .iter()
                .map(|(key, cmd)| (*key, cmd.label()))
                .collect(),
        }
    }
}

impl MessageFrame {
    pub fn new(text: &str, width: u16, height: u16) -> Self {
        let max_lines = height.saturating_sub(MESSAGE_CHROME_ROWS) as usize;
        let mut lines = wrap_hard(text, width as usize);
        lines.truncate(max_lines);
        Self {
            title: MESSAGE_TITLE,
            lines,
            footer: MESSAGE_FOOTER,
        }
    }
}

/// Visible list rows for a terminal of `height` rows; never below 1
pub fn rows_for_height(height: u16) -> usize {
    height.saturating_sub(LIST_CHROME_ROWS).max(1) as usize
}

/// Split `text` on newlines, then cut each line into `width`-char pieces.
///
/// Empty lines are kept so paragraph breaks survive.
pub fn wrap_hard(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));
    }
    out
}

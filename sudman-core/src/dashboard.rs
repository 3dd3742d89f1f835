//! Interactive dashboard state machine
//!
//! The engine consumes one [`Key`] at a time, runs whatever query or control
//! operation it implies to completion, and leaves [`DashboardState`] ready to
//! be described by [`DashboardEngine::frame`]. It never touches the terminal.

use tracing::debug;

use crate::config::SudmanConfig;
use crate::control::{Outcome, UnitAction, UnitControlService};
use crate::frame::{
    DetailFrame, FILTER_HINT, FILTER_PROMPT, FilterFrame, Frame, LIST_HINT, ListFrame,
    MessageFrame, RowView, TITLE, rows_for_height,
};
use crate::query::UnitQueryService;
use crate::unit::Unit;

/// Input events, already decoded from the terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Backspace,
    Char(char),
    /// Ctrl-C
    Interrupt,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Detail(Unit),
    Message {
        text: String,
        return_to: Box<ViewMode>,
    },
    FilterInput {
        buffer: String,
    },
}

/// What the detail view can do with its unit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailCommand {
    Action(UnitAction),
    Logs,
    Back,
}

impl DetailCommand {
    pub const BINDINGS: [(char, DetailCommand); 9] = [
        ('s', DetailCommand::Action(UnitAction::Start)),
        ('t', DetailCommand::Action(UnitAction::Stop)),
        ('r', DetailCommand::Action(UnitAction::Restart)),
        ('e', DetailCommand::Action(UnitAction::Enable)),
        ('d', DetailCommand::Action(UnitAction::Disable)),
        ('m', DetailCommand::Action(UnitAction::Mask)),
        ('u', DetailCommand::Action(UnitAction::Unmask)),
        ('l', DetailCommand::Logs),
        ('b', DetailCommand::Back),
    ];

    pub fn for_key(key: char) -> Option<Self> {
        Self::BINDINGS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, cmd)| *cmd)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetailCommand::Action(UnitAction::Start) => "Start",
            DetailCommand::Action(UnitAction::Stop) => "Stop",
            DetailCommand::Action(UnitAction::Restart) => "Restart",
            DetailCommand::Action(UnitAction::Enable) => "Enable",
            DetailCommand::Action(UnitAction::Disable) => "Disable",
            DetailCommand::Action(UnitAction::Mask) => "Mask",
            DetailCommand::Action(UnitAction::Unmask) => "Unmask",
            DetailCommand::Logs => "View logs",
            DetailCommand::Back => "Back to list",
        }
    }
}

/// Whether the session should keep running after a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Selection and scroll over the current unit snapshot.
///
/// Invariant (non-empty `units`):
/// `scroll <= selected <= scroll + visible_rows - 1`, `selected < units.len()`.
/// Empty `units` pins both to 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardState {
    pub units: Vec<Unit>,
    pub selected: usize,
    pub scroll: usize,
    pub filter_type: Option<String>,
    pub view: ViewMode,
    visible_rows: usize,
}

impl DashboardState {
    pub fn new(units: Vec<Unit>, visible_rows: usize) -> Self {
        let mut state = Self {
            units,
            selected: 0,
            scroll: 0,
            filter_type: None,
            view: ViewMode::List,
            visible_rows: visible_rows.max(1),
        };
        state.clamp();
        state
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
        self.clamp();
    }

    /// Swap in a fresh snapshot and re-clamp against its length.
    pub fn replace_units(&mut self, units: Vec<Unit>) {
        self.units = units;
        self.clamp();
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.units.len() {
            self.selected += 1;
            if self.selected >= self.scroll + self.visible_rows {
                self.scroll += 1;
            }
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.scroll {
                self.scroll = self.scroll.saturating_sub(1);
            }
        }
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        self.units.get(self.selected)
    }

    /// `units[scroll .. scroll + visible_rows]`, clipped to the list
    pub fn visible(&self) -> &[Unit] {
        let start = self.scroll.min(self.units.len());
        let end = (start + self.visible_rows).min(self.units.len());
        &self.units[start..end]
    }

    fn clamp(&mut self) {
        if self.units.is_empty() {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        self.selected = self.selected.min(self.units.len() - 1);
        if self.scroll > self.selected {
            self.scroll = self.selected;
        }
        if self.selected >= self.scroll + self.visible_rows {
            self.scroll = self.selected + 1 - self.visible_rows;
        }
    }

    fn footer(&self) -> String {
        let total = self.units.len();
        let position = if total == 0 { 0 } else { self.selected + 1 };
        let mut footer = format!("Units: {total} | Selected: {position}/{total}");
        if total > self.visible_rows {
            let last = (self.scroll + self.visible_rows).min(total);
            footer.push_str(&format!(" | Showing {}-{last}", self.scroll + 1));
        }
        footer
    }

    fn header(&self) -> String {
        match &self.filter_type {
            Some(t) => format!("{TITLE} - Filter: {t}"),
            None => TITLE.to_string(),
        }
    }
}

pub struct DashboardEngine {
    state: DashboardState,
    query: UnitQueryService,
    control: UnitControlService,
    log_lines: usize,
    filter_max_len: usize,
}

impl DashboardEngine {
    /// Build the engine and load the initial, unfiltered unit list.
    pub fn start(
        query: UnitQueryService,
        control: UnitControlService,
        config: &SudmanConfig,
        height: u16,
    ) -> Self {
        let units = query.list_units(None);
        Self {
            state: DashboardState::new(units, rows_for_height(height)),
            query,
            control,
            log_lines: config.dashboard_log_lines,
            filter_max_len: config.filter_max_len,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn resize(&mut self, height: u16) {
        self.state.set_visible_rows(rows_for_height(height));
    }

    pub fn handle_key(&mut self, key: Key) -> Flow {
        if key == Key::Interrupt {
            return Flow::Quit;
        }

        // Take the view out so each handler can move data between states
        let view = std::mem::replace(&mut self.state.view, ViewMode::List);
        let (next, flow) = match view {
            ViewMode::List => self.on_list(key),
            ViewMode::Detail(unit) => (self.on_detail(unit, key), Flow::Continue),
            ViewMode::Message { return_to, .. } => (*return_to, Flow::Continue),
            ViewMode::FilterInput { buffer } => (self.on_filter(buffer, key), Flow::Continue),
        };
        self.state.view = next;
        flow
    }

    fn on_list(&mut self, key: Key) -> (ViewMode, Flow) {
        match key {
            Key::Up | Key::Char('k') => self.state.select_prev(),
            Key::Down | Key::Char('j') => self.state.select_next(),
            Key::Enter => {
                if let Some(unit) = self.state.selected_unit() {
                    return (ViewMode::Detail(unit.clone()), Flow::Continue);
                }
            }
            Key::Char('f') => {
                return (
                    ViewMode::FilterInput {
                        buffer: String::new(),
                    },
                    Flow::Continue,
                );
            }
            Key::Char('r') => self.refresh(),
            Key::Char('q') => return (ViewMode::List, Flow::Quit),
            _ => {}
        }
        (ViewMode::List, Flow::Continue)
    }

    fn on_detail(&mut self, unit: Unit, key: Key) -> ViewMode {
        let command = match key {
            Key::Esc => Some(DetailCommand::Back),
            Key::Char(c) => DetailCommand::for_key(c),
            _ => None,
        };

        match command {
            None => ViewMode::Detail(unit),
            Some(DetailCommand::Back) => ViewMode::List,
            Some(DetailCommand::Action(action)) => {
                let outcome = self.control.apply(action, &unit.name);
                let unit = self.query.get_unit_status(&unit.name).unwrap_or(unit);
                message(outcome.into_message(), ViewMode::Detail(unit))
            }
            Some(DetailCommand::Logs) => {
                let text = match self.control.journal_logs(&unit.name, self.log_lines) {
                    Outcome::Success(logs) => logs,
                    Outcome::Failure(err) => format!("Error: {err}"),
                };
                message(text, ViewMode::Detail(unit))
            }
        }
    }

    fn on_filter(&mut self, mut buffer: String, key: Key) -> ViewMode {
        match key {
            Key::Char(c) if !c.is_control() => {
                if buffer.chars().count() < self.filter_max_len {
                    buffer.push(c);
                }
            }
            Key::Backspace => {
                buffer.pop();
            }
            Key::Esc => return ViewMode::List,
            Key::Enter => {
                let input = buffer.trim();
                self.state.filter_type = (!input.is_empty()).then(|| input.to_string());
                self.state.selected = 0;
                self.state.scroll = 0;
                self.refresh();
                return ViewMode::List;
            }
            _ => {}
        }
        ViewMode::FilterInput { buffer }
    }

    fn refresh(&mut self) {
        let units = self.query.list_units(self.state.filter_type.as_deref());
        debug!(count = units.len(), filter = ?self.state.filter_type, "refreshed units");
        self.state.replace_units(units);
    }

    /// Describe the current screen. Pure with respect to the state.
    pub fn frame(&self, width: u16, height: u16) -> Frame<'_> {
        let state = &self.state;
        match &state.view {
            ViewMode::List => Frame::List(ListFrame {
                header: state.header(),
                hint: LIST_HINT,
                rows: state
                    .visible()
                    .iter()
                    .enumerate()
                    .map(|(i, unit)| RowView {
                        unit,
                        selected: state.scroll + i == state.selected,
                    })
                    .collect(),
                footer: state.footer(),
            }),
            ViewMode::Detail(unit) => Frame::Detail(DetailFrame::new(unit)),
            ViewMode::Message { text, .. } => Frame::Message(MessageFrame::new(text, width, height)),
            ViewMode::FilterInput { buffer } => Frame::FilterPrompt(FilterFrame {
                prompt: FILTER_PROMPT,
                hint: FILTER_HINT,
                input: buffer,
            }),
        }
    }
}

fn message(text: String, return_to: ViewMode) -> ViewMode {
    ViewMode::Message {
        text,
        return_to: Box::new(return_to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit(name: &str) -> Unit {
        Unit {
            name: name.to_string(),
            load_state: "loaded".into(),
            active_state: "active".into(),
            sub_state: "running".into(),
            description: String::new(),
            enabled: true,
        }
    }

    fn units(n: usize) -> Vec<Unit> {
        (0..n).map(|i| unit(&format!("u{i}.service"))).collect()
    }

    fn holds_invariant(state: &DashboardState) -> bool {
        if state.units.is_empty() {
            return state.selected == 0 && state.scroll == 0;
        }
        state.scroll <= state.selected
            && state.selected < state.units.len()
            && state.selected < state.scroll + state.visible_rows()
    }

    #[test]
    fn down_scrolls_one_row_at_a_time() {
        let mut state = DashboardState::new(units(10), 3);
        for _ in 0..3 {
            state.select_next();
        }
        assert_eq!((state.selected, state.scroll), (3, 1));
        state.select_next();
        assert_eq!((state.selected, state.scroll), (4, 2));
    }

    #[test]
    fn selection_stops_at_both_ends() {
        let mut state = DashboardState::new(units(2), 5);
        state.select_prev();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn shrinking_refresh_reclamps() {
        let mut state = DashboardState::new(units(10), 3);
        for _ in 0..9 {
            state.select_next();
        }
        state.replace_units(units(2));
        assert_eq!(state.selected, 1);
        assert!(holds_invariant(&state));

        state.replace_units(Vec::new());
        assert_eq!((state.selected, state.scroll), (0, 0));
    }

    #[test]
    fn shrinking_viewport_keeps_selection_visible() {
        let mut state = DashboardState::new(units(10), 8);
        for _ in 0..7 {
            state.select_next();
        }
        state.set_visible_rows(2);
        assert!(holds_invariant(&state));
        assert_eq!(state.scroll, 6);
    }

    #[test]
    fn visible_slice_follows_scroll() {
        let mut state = DashboardState::new(units(5), 2);
        state.select_next();
        state.select_next();
        let names: Vec<_> = state.visible().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["u1.service", "u2.service"]);
    }

    #[test]
    fn footer_reports_counts_and_window() {
        let state = DashboardState::new(units(5), 2);
        assert_eq!(state.footer(), "Units: 5 | Selected: 1/5 | Showing 1-2");
        let empty = DashboardState::new(Vec::new(), 2);
        assert_eq!(empty.footer(), "Units: 0 | Selected: 0/0");
    }

    #[derive(Clone, Debug)]
    enum Op {
        Up,
        Down,
        Resize(usize),
        Replace(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => Just(Op::Up),
            4 => Just(Op::Down),
            1 => (0usize..15).prop_map(Op::Resize),
            1 => (0usize..40).prop_map(Op::Replace),
        ]
    }

    proptest! {
        #[test]
        fn navigation_invariant_holds_after_every_event(
            len in 0usize..40,
            rows in 1usize..12,
            ops in prop::collection::vec(op(), 0..120),
        ) {
            let mut state = DashboardState::new(units(len), rows);
            prop_assert!(holds_invariant(&state));
            for op in ops {
                match op {
                    Op::Up => state.select_prev(),
                    Op::Down => state.select_next(),
                    Op::Resize(r) => state.set_visible_rows(r),
                    Op::Replace(n) => state.replace_units(units(n)),
                }
                prop_assert!(holds_invariant(&state));
            }
        }

        #[test]
        fn up_down_never_jump_scroll(
            len in 1usize..40,
            rows in 1usize..12,
            downs in prop::collection::vec(prop::bool::ANY, 0..80),
        ) {
            let mut state = DashboardState::new(units(len), rows);
            for down in downs {
                let before = state.scroll;
                if down { state.select_next() } else { state.select_prev() }
                prop_assert!(state.scroll.abs_diff(before) <= 1);
            }
        }
    }
}

//! Transport-mode selection panel.
//!
//! Each row binds an icon, the localized mode title and a toggle indicator
//! to a change callback. The rows own no visibility state; the flag comes
//! from the settings snapshot and toggling reports the mode back to the
//! caller.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use tavle_core::models::{TransportMode, TransportSubmode};
use tavle_core::settings::Settings;

use crate::icons;

/// One selectable row in the panel.
struct ModeRow {
    mode: TransportMode,
    submode: Option<TransportSubmode>,
}

/// The mode-selection panel.
pub struct ModePanel {
    rows: Vec<ModeRow>,
    state: ListState,
}

impl ModePanel {
    /// Panel with the standard set of modes.
    pub fn new() -> Self {
        let rows = [
            TransportMode::Bus,
            TransportMode::Tram,
            TransportMode::Bicycle,
            TransportMode::Water,
            TransportMode::Rail,
            TransportMode::Metro,
            TransportMode::Air,
        ]
        .into_iter()
        .map(|mode| ModeRow {
            mode,
            submode: None,
        })
        .collect();

        let mut state = ListState::default();
        state.select(Some(0));
        Self { rows, state }
    }

    /// Move the selection down, wrapping.
    pub fn select_next(&mut self) {
        let index = match self.state.selected() {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(index));
    }

    /// Move the selection up, wrapping.
    pub fn select_previous(&mut self) {
        let index = match self.state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(index));
    }

    /// Toggle the selected row.
    ///
    /// Invokes `on_change` exactly once with the row's mode, regardless of
    /// the row's current flag; the caller owns the visibility state.
    pub fn toggle_selected(&mut self, on_change: impl FnOnce(TransportMode)) {
        if let Some(index) = self.state.selected() {
            on_change(self.rows[index].mode.clone());
        }
    }

    /// Render the panel; flags come from the settings snapshot.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, settings: &Settings, focused: bool) {
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| {
                let visible = !settings.is_mode_hidden(&row.mode);
                let switch = if visible { "[x]" } else { "[ ]" };
                let glyph = icons::icon(&row.mode, row.submode.as_ref());
                let style = if visible {
                    Style::default()
                } else {
                    Style::default().add_modifier(Modifier::DIM)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{glyph} ")),
                    Span::styled(format!("{:<10}", row.mode.title()), style),
                    Span::raw(switch),
                ]))
            })
            .collect();

        let border_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(" Transportmidler "),
            )
            .highlight_symbol("› ")
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

impl Default for ModePanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_invokes_callback_once_with_the_selected_mode() {
        let mut panel = ModePanel::new();
        panel.state.select(Some(2));

        let mut calls = Vec::new();
        panel.toggle_selected(|mode| calls.push(mode));
        assert_eq!(calls, vec![TransportMode::Bicycle]);
    }

    #[test]
    fn toggle_reports_the_mode_regardless_of_the_flag() {
        let mut settings = Settings::default();
        settings.toggle_mode(TransportMode::Bus);
        assert!(settings.is_mode_hidden(&TransportMode::Bus));

        let mut panel = ModePanel::new();
        panel.state.select(Some(0));
        let mut calls = Vec::new();
        panel.toggle_selected(|mode| calls.push(mode));
        // Same mode whether the row is currently on or off.
        assert_eq!(calls, vec![TransportMode::Bus]);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut panel = ModePanel::new();
        panel.select_previous();
        assert_eq!(panel.state.selected(), Some(6));
        panel.select_next();
        assert_eq!(panel.state.selected(), Some(0));
    }
}

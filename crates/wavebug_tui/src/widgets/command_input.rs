//! Command input widget.
//!
//! Renders the command bar at the bottom of the TUI. In normal mode it
//! shows key hints; in command mode it shows the `:` prompt with the
//! typed command.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::TuiApp;
use crate::state::InputMode;

const HINTS: [(&str, &str); 7] = [
    ("q", "quit"),
    ("Space", "pause"),
    ("1-4", "rows"),
    ("i", "inject"),
    ("r", "restart"),
    (":", "cmd"),
    ("?", "help"),
];

/// Renders the command input bar.
pub fn render_command_input<B>(app: &TuiApp<B>, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let key_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let line = match app.state.mode {
        InputMode::Normal => Line::from(
            HINTS
                .iter()
                .flat_map(|(key, what)| {
                    [
                        Span::styled(format!(" {key}"), key_style),
                        Span::styled(format!(":{what}"), Style::default().fg(Color::DarkGray)),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
        InputMode::Command => Line::from(vec![
            Span::styled(
                ":",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&app.state.command_buffer, Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::White)),
        ]),
    };

    Widget::render(line, area, buf);
}

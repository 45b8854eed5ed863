//! Status bar widget.
//!
//! Renders a single-line status bar showing the input mode, lifecycle
//! state, fault tick, playback, timer epoch, time to the next transition,
//! and the last status message.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use wavebug_core::{BugState, Simulation};

use crate::app::TuiApp;
use crate::state::InputMode;

/// Renders the status bar into the given area.
pub fn render_status_bar<B>(app: &TuiApp<B>, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let (mode_str, mode_style) = match app.state.mode {
        InputMode::Normal => (
            "NORMAL",
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        InputMode::Command => (
            "COMMAND",
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let sim = &app.sim;
    let state = sim.state();
    let state_color = match state {
        BugState::Idle => Color::White,
        BugState::Detected => Color::Red,
        BugState::Correcting => Color::Yellow,
        BugState::Fixed => Color::Green,
    };
    let next = sim
        .next_transition_in()
        .map(|d| format!(" next {:.1}s", d.as_secs_f64()))
        .unwrap_or_default();

    let (msg, msg_color) = if app.state.status_message.is_empty() {
        (String::new(), Color::Cyan)
    } else if app.state.status_is_error {
        (format!(" | {}", app.state.status_message), Color::Red)
    } else {
        (format!(" | {}", app.state.status_message), Color::Cyan)
    };

    let line = Line::from(vec![
        Span::styled(format!(" {mode_str} "), mode_style),
        Span::styled(
            format!(" {}", state.to_string().to_uppercase()),
            Style::default()
                .fg(state_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" | fault @{}", sim.fault_tick()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(" | {}", playback_label(sim)),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!(" | epoch {}{next}", sim.epoch()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(msg, Style::default().fg(msg_color)),
    ]);

    let bg_style = Style::default().bg(Color::DarkGray);
    for x in area.x..area.x + area.width {
        if x < buf.area().right() {
            buf.get_mut(x, area.y).set_style(bg_style);
        }
    }

    Widget::render(line, area, buf);
}

/// `PAUSED` for a manual pause, `HOLD` while a bug is in flight, else `PLAY`.
fn playback_label<B>(sim: &Simulation<B>) -> &'static str {
    if sim.is_manually_paused() {
        "PAUSED"
    } else if sim.is_paused() {
        "HOLD"
    } else {
        "PLAY"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{row_text, test_app};
    use std::time::Duration;

    fn draw<B>(app: &TuiApp<B>) -> (String, Buffer) {
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        render_status_bar(app, area, &mut buf);
        (row_text(&buf, 0), buf)
    }

    #[test]
    fn normal_mode_idle() {
        let app = test_app();
        let (text, _) = draw(&app);
        assert!(text.contains("NORMAL"));
        assert!(text.contains("IDLE"));
        assert!(text.contains("fault @55"));
        assert!(text.contains("PLAY"));
        assert!(text.contains("next 6.5s"));
    }

    #[test]
    fn command_mode() {
        let mut app = test_app();
        app.state.mode = InputMode::Command;
        let (text, _) = draw(&app);
        assert!(text.contains("COMMAND"));
    }

    #[test]
    fn playback_labels() {
        let mut app = test_app();
        app.tick(Duration::from_millis(6600));
        assert!(draw(&app).0.contains("HOLD"));
        app.sim.toggle_manual_pause();
        assert!(draw(&app).0.contains("PAUSED"));
    }

    #[test]
    fn error_message_is_red() {
        let mut app = test_app();
        app.state.set_error("Error: nope");
        let (text, buf) = draw(&app);
        let pos = text.find("nope").unwrap();
        assert_eq!(buf.get(pos as u16, 0).fg, Color::Red);
    }

    #[test]
    fn zero_height() {
        let app = test_app();
        let area = Rect::new(0, 0, 80, 0);
        let mut buf = Buffer::empty(area);
        render_status_bar(&app, area, &mut buf);
    }
}

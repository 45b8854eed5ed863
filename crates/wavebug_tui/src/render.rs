//! Top-level rendering logic.
//!
//! Assembles the TUI layout by splitting the terminal into panels and
//! delegating rendering to individual widget modules.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{help_text, TuiApp};
use crate::widgets::{command_input, signal_list, status_bar, waveform};

/// Renders the complete TUI layout into the given frame.
///
/// Layout:
/// ```text
/// ┌─────────────┬──────────────────────┐
/// │ Signal List  │    Waveform          │
/// │ (30%)        │    (70%)             │
/// │              │                      │
/// ├──────────────┴──────────────────────┤
/// │ Status Bar                          │
/// ├─────────────────────────────────────┤
/// │ Command Input                       │
/// └─────────────────────────────────────┘
/// ```
pub fn render<B>(app: &TuiApp<B>, frame: &mut Frame) {
    let size = frame.size();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
            Constraint::Length(1), // command input
        ])
        .split(size);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(vertical[0]);

    signal_list::render_signal_list(app, horizontal[0], frame.buffer_mut());
    waveform::render_waveform(app, horizontal[1], frame.buffer_mut());
    status_bar::render_status_bar(app, vertical[1], frame.buffer_mut());
    command_input::render_command_input(app, vertical[2], frame.buffer_mut());

    if app.state.show_help {
        render_help_popup(frame);
    }
}

/// Renders a centered help popup.
fn render_help_popup(frame: &mut Frame) {
    let area = frame.size();
    let popup_width = 60u16.min(area.width.saturating_sub(4));
    let popup_height = 20u16.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(help_text())
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    frame.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{buffer_text, test_app};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw<B>(app: &TuiApp<B>, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn render_full_layout() {
        let app = test_app();
        let text = draw(&app, 100, 24);
        assert!(text.contains("Signals"));
        assert!(text.contains("Waveform"));
        assert!(text.contains("NORMAL"));
        assert!(text.contains("q:quit"));
    }

    #[test]
    fn render_with_help_popup() {
        let mut app = test_app();
        app.state.show_help = true;
        let text = draw(&app, 100, 30);
        assert!(text.contains("Help"));
        assert!(text.contains("Inject fault"));
    }

    #[test]
    fn render_small_terminal() {
        let app = test_app();
        draw(&app, 20, 5);
        draw(&app, 1, 1);
    }

    #[test]
    fn render_command_mode_layout() {
        let mut app = test_app();
        app.state.open_prompt("inject 30");
        let text = draw(&app, 80, 24);
        assert!(text.contains(":inject 30"));
        assert!(text.contains("COMMAND"));
    }
}

//! Waveform viewer widget.
//!
//! Renders the scrolling signal traces with box-drawing characters. Each
//! visible signal takes two rows (high line on top, low line below) with
//! corner characters at transitions and a red `X` for unknown cells. The
//! scanner bar, the fault highlight, and the PAUSED badge are drawn on top.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};
use wavebug_core::{Bit, BugState, SignalKind, BITS_IN_LOOP};

use crate::app::TuiApp;
use crate::state::ViewPort;
use crate::widgets::hex_color;

const SCANNER_BG: Color = Color::Rgb(0x3f, 0x3f, 0x46);

/// Renders the waveform panel showing the tick ruler and signal traces.
pub fn render_waveform<B>(app: &TuiApp<B>, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Waveform ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    Widget::render(block, area, buf);

    if area.width < 4 || area.height < 3 {
        return;
    }
    let inner = Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2);
    let offset = app.sim.scroll_phase() * BITS_IN_LOOP as f64;
    let viewport = &app.state.viewport;

    render_tick_ruler(viewport, offset, inner, buf);

    let mut row = inner.y + 1;
    for kind in app.sim.visibility().visible() {
        if row + 1 >= inner.y + inner.height {
            break;
        }
        render_trace(app, kind, offset, inner.x, row, inner.width, buf);
        row += 2;
    }

    if let Some(phase) = app.sim.scanner_phase() {
        if let Some(col) = viewport.col_at_tick(phase * BITS_IN_LOOP as f64, inner.width) {
            let x = inner.x + col;
            for y in inner.y..row.min(inner.y + inner.height) {
                buf.get_mut(x, y).set_bg(SCANNER_BG);
            }
        }
    }

    render_fault_highlight(app, inner, buf);

    if app.sim.is_manually_paused() {
        let label = " PAUSED ";
        let x = (inner.x + inner.width).saturating_sub(label.len() as u16);
        buf.set_string(
            x.max(inner.x),
            inner.y,
            label,
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    }
}

/// Renders the tick ruler: a label at every tenth tick, a dot at every fifth.
fn render_tick_ruler(viewport: &ViewPort, offset: f64, inner: Rect, buf: &mut Buffer) {
    let style = Style::default().fg(Color::DarkGray);
    let mut last_label_end: u16 = 0;

    for col in 0..inner.width {
        let tick = viewport.tick_at_col(col, offset);
        let starts_cell = col == 0 || viewport.tick_at_col(col - 1, offset) != tick;
        if !starts_cell {
            continue;
        }
        let x = inner.x + col;
        if tick % 10 == 0 && col >= last_label_end {
            let label = tick.to_string();
            for (j, ch) in label.chars().enumerate() {
                let px = x + j as u16;
                if px < inner.x + inner.width {
                    buf.get_mut(px, inner.y).set_char(ch).set_style(style);
                }
            }
            last_label_end = col + label.len() as u16 + 1;
        } else if tick % 5 == 0 && col >= last_label_end {
            buf.get_mut(x, inner.y).set_char('·').set_style(style);
        }
    }
}

/// Renders one signal as a 2-row trace.
/// ```text
///   ───┐   ┌───       (top row: high level)
///      └───┘           (bottom row: low level)
/// ```
fn render_trace<B>(
    app: &TuiApp<B>,
    kind: SignalKind,
    offset: f64,
    x_start: u16,
    row: u16,
    width: u16,
    buf: &mut Buffer,
) {
    let bits = &app.sim.trace(kind).bits;
    if bits.is_empty() {
        return;
    }
    let viewport = &app.state.viewport;
    let top_row = row;
    let bot_row = row + 1;

    let style_signal = Style::default().fg(hex_color(kind.def().trace_color));
    let style_x = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

    for col in 0..width {
        let x = x_start + col;
        let cur = bits[viewport.tick_at_col(col, offset) % bits.len()];
        let prev = (col > 0).then(|| bits[viewport.tick_at_col(col - 1, offset) % bits.len()]);

        let (top, bot, style) = match (prev, cur) {
            (_, Bit::Unknown) => ('X', 'X', style_x),
            (Some(Bit::Low), Bit::High) => ('┌', '┘', style_signal),
            (Some(Bit::High), Bit::Low) => ('┐', '└', style_signal),
            (_, Bit::High) => ('─', ' ', style_signal),
            (_, Bit::Low) => (' ', '─', style_signal),
        };
        buf.get_mut(x, top_row).set_char(top).set_style(style);
        buf.get_mut(x, bot_row).set_char(bot).set_style(style);
    }
}

/// Marks the fault cell on the data row and prints the annotation above it.
fn render_fault_highlight<B>(app: &TuiApp<B>, inner: Rect, buf: &mut Buffer) {
    let Some(overlay) = app.sim.overlay() else {
        return;
    };
    let rows = app.sim.visibility().visible_before(SignalKind::Data) as u16;
    let top_row = inner.y + 1 + rows * 2;
    if top_row + 1 >= inner.y + inner.height {
        return;
    }
    let fault_center = app.sim.fault_tick().get() as f64 + 0.5;
    let Some(col) = app.state.viewport.col_at_tick(fault_center, inner.width) else {
        return;
    };

    let bg = match overlay.state {
        BugState::Correcting => Color::Green,
        _ => Color::Red,
    };
    let x = inner.x + col;
    for y in [top_row, top_row + 1] {
        buf.get_mut(x, y).set_bg(bg).set_fg(Color::Black);
    }

    let label = overlay.annotation;
    let label_y = top_row.saturating_sub(1).max(inner.y);
    let half = label.len() as u16 / 2;
    let max_x = (inner.x + inner.width).saturating_sub(label.len() as u16);
    let label_x = x.saturating_sub(half).clamp(inner.x, max_x.max(inner.x));
    buf.set_stringn(
        label_x,
        label_y,
        label,
        inner.width as usize,
        Style::default().fg(bg).add_modifier(Modifier::BOLD),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{asserted_app, buffer_text, row_text, test_app};
    use std::time::Duration;

    fn draw<B>(app: &TuiApp<B>, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        render_waveform(app, area, &mut buf);
        buf
    }

    #[test]
    fn clock_row_draws_edges() {
        let app = test_app();
        let buf = draw(&app, 40, 12);
        // inner starts at (1,1); ruler on y=1, CLK on y=2..3
        let top = row_text(&buf, 2);
        let bot = row_text(&buf, 3);
        let top: Vec<char> = top.chars().collect();
        let bot: Vec<char> = bot.chars().collect();
        assert_eq!(top[1], '─');
        assert_eq!(top[3], '┐');
        assert_eq!(bot[3], '└');
        assert_eq!(top[5], '┌');
        assert_eq!(bot[5], '┘');
    }

    #[test]
    fn ruler_labels_every_ten_ticks() {
        let app = test_app();
        let buf = draw(&app, 40, 12);
        let ruler: Vec<char> = row_text(&buf, 1).chars().collect();
        assert_eq!(ruler[1], '0');
        assert_eq!(ruler[6], '·');
        assert_eq!(ruler[11..13], ['1', '0']);
        assert_eq!(ruler[21..23], ['2', '0']);
    }

    #[test]
    fn fault_cell_shows_unknown() {
        let app = asserted_app(45);
        let buf = draw(&app, 110, 12);
        // DATA is the fourth row pair: y = 2 + 3*2
        let top: Vec<char> = row_text(&buf, 8).chars().collect();
        assert_eq!(top[1 + 45], 'X');
        assert_eq!(buf.get(1 + 45, 8).fg, Color::Red);
    }

    #[test]
    fn detected_highlight_and_annotation() {
        let mut app = asserted_app(45);
        app.tick(Duration::from_millis(5500));
        assert_eq!(app.sim.state(), BugState::Detected);
        let buf = draw(&app, 110, 12);
        assert_eq!(buf.get(1 + 45, 8).bg, Color::Red);
        assert!(row_text(&buf, 7).contains("BUG DETECTED"));
    }

    #[test]
    fn correcting_highlight_is_green_and_clean() {
        let mut app = asserted_app(45);
        app.tick(Duration::from_millis(6500));
        assert_eq!(app.sim.state(), BugState::Correcting);
        let buf = draw(&app, 110, 12);
        let text = buffer_text(&buf);
        assert!(text.contains("BUG CORRECTED"));
        assert_eq!(buf.get(1 + 45, 8).bg, Color::Green);
        assert!(!row_text(&buf, 8).contains('X'));
    }

    #[test]
    fn hidden_data_row_suppresses_highlight() {
        let mut app = asserted_app(45);
        app.sim.toggle_signal_visibility(SignalKind::Data);
        app.tick(Duration::from_millis(5500));
        let text = buffer_text(&draw(&app, 110, 12));
        assert!(!text.contains("BUG DETECTED"));
    }

    #[test]
    fn paused_badge() {
        let mut app = test_app();
        app.sim.toggle_manual_pause();
        let text = buffer_text(&draw(&app, 60, 12));
        assert!(text.contains("PAUSED"));
    }

    #[test]
    fn scanner_column_is_shaded() {
        let mut app = test_app();
        app.tick(Duration::from_millis(1000));
        let buf = draw(&app, 40, 12);
        assert_eq!(buf.get(1, 2).bg, SCANNER_BG);
        assert_ne!(buf.get(2, 2).bg, SCANNER_BG);
    }

    #[test]
    fn render_tiny_area() {
        let app = test_app();
        draw(&app, 3, 2);
        draw(&app, 10, 4);
    }
}

//! Signal list widget.
//!
//! Renders the left panel: one line per signal with its visibility marker,
//! row number, colored name, and the bit currently under the scanner.
//! The selected signal is highlighted.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget};
use wavebug_core::{Bit, SignalKind, Simulation, BITS_IN_LOOP};

use crate::app::TuiApp;
use crate::widgets::hex_color;

/// Renders the signal list panel into the given buffer area.
pub fn render_signal_list<B>(app: &TuiApp<B>, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Signals ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let items: Vec<ListItem> = SignalKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &kind)| {
            let def = kind.def();
            let visible = app.sim.visibility().is_visible(kind);
            let marker = if visible { "●" } else { "○" };
            let name_style = if visible {
                Style::default().fg(hex_color(def.label_color))
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let bit = scanned_bit(&app.sim, kind);
            let val = bit.map_or("-".to_string(), |b| b.to_string());
            let val_style = match bit {
                Some(Bit::Unknown) => Style::default().fg(Color::Red),
                _ => Style::default().fg(Color::Yellow),
            };
            let line = Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<10}", def.name), name_style),
                Span::styled(format!("= {val}"), val_style),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(app.state.selected_signal));

    StatefulWidget::render(list, area, buf, &mut list_state);
}

/// The displayed bit under the scanner bar, or `None` before the scanner
/// appears.
pub fn scanned_bit<B>(sim: &Simulation<B>, kind: SignalKind) -> Option<Bit> {
    let scanner = sim.scanner_phase()?;
    let pos = (scanner + sim.scroll_phase()) * BITS_IN_LOOP as f64;
    let tick = pos.floor() as usize % BITS_IN_LOOP;
    sim.trace(kind).bits.get(tick).copied()
}

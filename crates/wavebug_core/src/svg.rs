//! Static SVG snapshot of a [`Simulation`].
//!
//! Draws the frame a browser would show at the simulation's current instant:
//! the tick ruler, one row per visible signal, the scanner bar, the fault
//! highlight with its annotation, and the pause veil.

use std::fmt::{self, Write};

use crate::layout::Overlay;
use crate::lifecycle::BugState;
use crate::signal::{SignalKind, BITS_IN_LOOP};
use crate::simulation::Simulation;

const PAD: f64 = 24.0;
const LABEL_WIDTH: f64 = 128.0;
const LABEL_GAP: f64 = 16.0;
const RULER_HEIGHT: f64 = 24.0;
const RULER_GAP: f64 = 8.0;
const FOOTER_HEIGHT: f64 = 24.0;
const MAJOR_TICK_EVERY: usize = 10;

const BACKGROUND: &str = "#09090b";
const FAULT_STROKE: &str = "#ef4444";
const FIXED_STROKE: &str = "#4ade80";
const SCANNER_FILL: &str = "#22d3ee";
const MUTED: &str = "#71717a";

/// Renders the current frame as a standalone SVG document.
pub fn render_svg<B>(sim: &Simulation<B>) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails
    match write_svg(sim, &mut out) {
        Ok(()) => out,
        Err(fmt::Error) => String::new(),
    }
}

/// Writes the current frame as SVG into `out`.
pub fn write_svg<B, W: Write>(sim: &Simulation<B>, out: &mut W) -> fmt::Result {
    let frame = Frame::new(sim);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="monospace">"#,
        w = frame.width,
        h = frame.height
    )?;
    writeln!(
        out,
        r#"<rect width="{}" height="{}" fill="{BACKGROUND}"/>"#,
        frame.width, frame.height
    )?;
    writeln!(
        out,
        r#"<defs><clipPath id="trace-area"><rect x="{}" y="0" width="{}" height="{}"/></clipPath></defs>"#,
        frame.trace_x, frame.view_width, frame.height
    )?;

    write_ruler(sim, &frame, out)?;
    write_rows(sim, &frame, out)?;
    if let Some(x) = sim.scanner_x() {
        writeln!(
            out,
            r#"<rect class="scanner" x="{}" y="{}" width="2" height="{}" fill="{SCANNER_FILL}" opacity="0.6"/>"#,
            frame.trace_x + x - 1.0,
            frame.rows_y,
            frame.rows_height
        )?;
    }
    if let Some(overlay) = sim.overlay() {
        write_overlay(&overlay, &frame, out)?;
    }
    writeln!(
        out,
        r#"<text x="{PAD}" y="{}" font-size="11" fill="{MUTED}">fault tick {} | {}</text>"#,
        frame.height - PAD / 2.0,
        sim.fault_tick(),
        sim.state()
    )?;
    if sim.is_manually_paused() {
        writeln!(
            out,
            r##"<g class="paused"><rect width="{}" height="{}" fill="#000000" opacity="0.7"/><text x="{}" y="{}" font-size="20" fill="#ffffff" text-anchor="middle">PAUSED</text></g>"##,
            frame.width,
            frame.height,
            frame.width / 2.0,
            frame.height / 2.0
        )?;
    }
    writeln!(out, "</svg>")
}

struct Frame {
    width: f64,
    height: f64,
    trace_x: f64,
    view_width: f64,
    rows_y: f64,
    rows_height: f64,
    scroll: f64,
}

impl Frame {
    fn new<B>(sim: &Simulation<B>) -> Self {
        let layout = sim.layout();
        let visible = sim.visibility().visible().count() as f64;
        let rows_height = if visible > 0.0 {
            visible * layout.row_height + (visible - 1.0) * layout.row_gap
        } else {
            0.0
        };
        let view_width = layout.loop_width();
        let trace_x = PAD + LABEL_WIDTH + LABEL_GAP;
        let rows_y = PAD + RULER_HEIGHT + RULER_GAP;
        Self {
            width: trace_x + view_width + PAD,
            height: rows_y + rows_height + FOOTER_HEIGHT + PAD,
            trace_x,
            view_width,
            rows_y,
            rows_height,
            scroll: sim.scroll_offset_px(),
        }
    }
}

fn write_ruler<B, W: Write>(sim: &Simulation<B>, frame: &Frame, out: &mut W) -> fmt::Result {
    let pitch = sim.layout().bit_width;
    writeln!(
        out,
        r#"<g class="ruler" clip-path="url(#trace-area)"><g transform="translate({},{PAD})">"#,
        frame.trace_x - frame.scroll
    )?;
    for i in 0..BITS_IN_LOOP * 2 {
        let x = i as f64 * pitch;
        if i % MAJOR_TICK_EVERY == 0 {
            writeln!(
                out,
                r##"<line x1="{x}" y1="8" x2="{x}" y2="{RULER_HEIGHT}" stroke="#52525b"/><text x="{}" y="8" font-size="9" fill="{MUTED}">{}</text>"##,
                x + 2.0,
                i % BITS_IN_LOOP
            )?;
        } else {
            writeln!(
                out,
                r##"<line x1="{x}" y1="18" x2="{x}" y2="{RULER_HEIGHT}" stroke="#3f3f46"/>"##
            )?;
        }
    }
    writeln!(out, "</g></g>")
}

fn write_rows<B, W: Write>(sim: &Simulation<B>, frame: &Frame, out: &mut W) -> fmt::Result {
    let layout = sim.layout();
    let stride = layout.row_height + layout.row_gap;
    for (slot, kind) in sim.visibility().visible().enumerate() {
        let def = kind.def();
        let top = frame.rows_y + slot as f64 * stride;
        let trace = sim.trace(kind);
        writeln!(
            out,
            r#"<text x="{PAD}" y="{}" font-size="12" fill="{}">{}</text>"#,
            top + layout.row_height / 2.0 + 4.0,
            def.label_color,
            def.name
        )?;
        writeln!(
            out,
            r#"<g class="row" data-signal="{}" clip-path="url(#trace-area)"><g transform="translate({},{top})">"#,
            row_id(kind),
            frame.trace_x - frame.scroll
        )?;
        writeln!(
            out,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            trace.geometry.path_data(),
            def.trace_color
        )?;
        if trace.geometry.has_faults() {
            writeln!(
                out,
                r#"<path class="fault" d="{}" fill="none" stroke="{FAULT_STROKE}" stroke-width="2.5"/>"#,
                trace.geometry.fault_path_data()
            )?;
        }
        writeln!(out, "</g></g>")?;
    }
    Ok(())
}

fn write_overlay<W: Write>(overlay: &Overlay, frame: &Frame, out: &mut W) -> fmt::Result {
    let stroke = match overlay.state {
        BugState::Correcting => FIXED_STROKE,
        _ => FAULT_STROKE,
    };
    let cx = frame.trace_x + overlay.x;
    let cy = frame.rows_y + overlay.center_y;
    let label_y = frame.rows_y + overlay.annotation_y;
    writeln!(
        out,
        r#"<g class="highlight"><circle cx="{cx}" cy="{cy}" r="14" fill="none" stroke="{stroke}" stroke-width="2"/><rect x="{}" y="{label_y}" width="112" height="20" rx="3" fill="{BACKGROUND}" stroke="{stroke}"/><text x="{cx}" y="{}" font-size="11" fill="{stroke}" text-anchor="middle">{}</text></g>"#,
        cx - 56.0,
        label_y + 14.0,
        overlay.annotation
    )
}

fn row_id(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::Clock => "clk",
        SignalKind::Reset => "reset_n",
        SignalKind::Valid => "valid",
        SignalKind::Data => "data",
    }
}

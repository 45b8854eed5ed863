//! End-to-end scenarios for the simulation controller.
//!
//! These drive a [`Simulation`] purely through its public API, stepping the
//! virtual clock the way a frame loop would and checking what a viewer would
//! see at each point.

use std::time::Duration;

use wavebug_core::{
    Bit, BitSource, BugState, FaultTick, SignalKind, SimConfig, Simulation, WaveError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Answers every draw with the same value.
struct Always(bool);

impl BitSource for Always {
    fn chance(&mut self, _p: f64) -> bool {
        self.0
    }
}

/// Alternates true/false, starting with true.
struct Alternating(bool);

impl BitSource for Alternating {
    fn chance(&mut self, _p: f64) -> bool {
        self.0 = !self.0;
        !self.0
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Steps the simulation in 100 ms frames and records each state change with
/// the timer-clock time it was first observed.
fn run_frames<B: BitSource>(sim: &mut Simulation<B>, total: Duration) -> Vec<(BugState, u128)> {
    let mut seen = Vec::new();
    let mut last = sim.state();
    let frames = total.as_millis() / 100;
    for _ in 0..frames {
        sim.advance(ms(100));
        if sim.state() != last {
            last = sim.state();
            seen.push((last, sim.timer_time().as_millis()));
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Fault injection
// ---------------------------------------------------------------------------

#[test]
fn inject_with_valid_high_marks_unknown_cell() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.set_fault_position("45").unwrap();
    assert_eq!(sim.state(), BugState::Idle);
    let data = sim.bits().get(SignalKind::Data);
    assert_eq!(data[45], Bit::Unknown);
    assert_eq!(data.iter().filter(|b| b.is_unknown()).count(), 1);
    let glyphs = &sim.trace(SignalKind::Data).geometry.faults;
    // the doubled loop carries the fault once per copy
    assert_eq!(
        glyphs.iter().map(|g| g.cell).collect::<Vec<_>>(),
        vec![45, 145]
    );
}

#[test]
fn inject_with_valid_low_forces_data_low() {
    let mut sim = Simulation::new(SimConfig::default(), Always(false));
    sim.set_fault_position("45").unwrap();
    let data = sim.bits().get(SignalKind::Data);
    assert_eq!(data[45], Bit::Low);
    assert!(data.iter().all(|&b| b == Bit::Low));
    assert!(!sim.trace(SignalKind::Data).geometry.has_faults());
}

#[test]
fn default_fault_sits_outside_the_valid_window() {
    // 55 % 20 = 15: VALID is always low there, so the fault never shows.
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.set_fault_position("55").unwrap();
    assert_eq!(sim.bits().get(SignalKind::Valid)[55], Bit::Low);
    assert_eq!(sim.bits().get(SignalKind::Data)[55], Bit::Low);
    assert!(!sim.trace(SignalKind::Data).geometry.has_faults());
}

#[test]
fn valid_low_always_means_data_low() {
    let sim = Simulation::new(SimConfig::default(), Alternating(true));
    let valid = sim.bits().get(SignalKind::Valid);
    let data = sim.bits().get(SignalKind::Data);
    for (tick, (&v, &d)) in valid.iter().zip(data).enumerate() {
        if v == Bit::Low {
            assert_eq!(d, Bit::Low, "tick {tick}");
        }
    }
    let healed = &sim.corrected_trace().bits;
    for (tick, (&v, &d)) in valid.iter().zip(healed).enumerate() {
        assert!(!d.is_unknown());
        if v == Bit::Low {
            assert_eq!(d, Bit::Low, "tick {tick}");
        }
    }
}

#[test]
fn invalid_inputs_leave_everything_untouched() {
    let mut sim = Simulation::new(SimConfig::default(), Alternating(false));
    sim.advance(ms(3000));
    let fault = sim.fault_tick();
    let state = sim.state();
    let bits = sim.bits().clone();
    let data = sim.trace(SignalKind::Data).clone();
    let epoch = sim.epoch();
    let anim = sim.animation_time();

    for input in ["150", "-1", "abc", "", "100", "4.5"] {
        let err = sim.set_fault_position(input).unwrap_err();
        assert!(matches!(err, WaveError::InvalidFaultTick { .. }), "{input}");
        assert_eq!(sim.fault_tick(), fault);
        assert_eq!(sim.state(), state);
        assert_eq!(sim.bits(), &bits);
        assert_eq!(sim.trace(SignalKind::Data), &data);
        assert_eq!(sim.epoch(), epoch);
        assert_eq!(sim.animation_time(), anim);
    }
}

#[test]
fn boundary_ticks_are_accepted() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    assert_eq!(sim.set_fault_position("0").unwrap(), FaultTick::new(0).unwrap());
    assert_eq!(sim.fault_tick().get(), 0);
    assert_eq!(sim.set_fault_position(" 99 ").unwrap().get(), 99);
    assert_eq!(sim.fault_tick().get(), 99);
}

// ---------------------------------------------------------------------------
// Lifecycle timing
// ---------------------------------------------------------------------------

#[test]
fn default_fault_walks_lifecycle_on_schedule() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    let seen = run_frames(&mut sim, ms(15_000));
    assert_eq!(
        seen,
        vec![
            (BugState::Detected, 6500),
            (BugState::Correcting, 7500),
            (BugState::Fixed, 9000),
        ]
    );
}

#[test]
fn early_fault_is_detected_sooner() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.set_fault_position("0").unwrap();
    let seen = run_frames(&mut sim, ms(5000));
    assert_eq!(seen[0], (BugState::Detected, 1000));
    assert_eq!(seen.last(), Some(&(BugState::Fixed, 3500)));
}

#[test]
fn double_inject_only_runs_the_latest_timers() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.set_fault_position("10").unwrap();
    sim.set_fault_position("80").unwrap();
    assert_eq!(sim.active_timers(), 1);

    // 10 would have been detected at 2 s; 80 is due at 9 s.
    let seen = run_frames(&mut sim, ms(12_000));
    assert_eq!(
        seen,
        vec![
            (BugState::Detected, 9000),
            (BugState::Correcting, 10_000),
            (BugState::Fixed, 11_500),
        ]
    );
}

#[test]
fn reinject_mid_lifecycle_resets_to_idle() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.advance(ms(7000));
    assert_eq!(sim.state(), BugState::Detected);
    sim.set_fault_position("20").unwrap();
    assert_eq!(sim.state(), BugState::Idle);
    assert!(sim.overlay().is_none());
    assert!(!sim.is_paused());
    assert_eq!(sim.next_transition_in(), Some(ms(3000)));
}

// ---------------------------------------------------------------------------
// Pause and visibility
// ---------------------------------------------------------------------------

#[test]
fn pause_during_detection_then_resume_starts_over() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.advance(ms(6600));
    assert_eq!(sim.state(), BugState::Detected);

    assert!(sim.toggle_manual_pause());
    sim.advance(ms(10_000));
    assert_eq!(sim.state(), BugState::Detected);
    assert_eq!(sim.active_timers(), 0);

    assert!(!sim.toggle_manual_pause());
    assert_eq!(sim.state(), BugState::Idle);
    let seen = run_frames(&mut sim, ms(7000));
    assert_eq!(seen, vec![(BugState::Detected, 6500)]);
}

#[test]
fn hidden_data_row_suppresses_overlay_until_shown() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.toggle_signal_visibility(SignalKind::Data);
    sim.advance(ms(6500));
    assert_eq!(sim.state(), BugState::Detected);
    assert!(sim.overlay().is_none());

    sim.toggle_signal_visibility(SignalKind::Data);
    let overlay = sim.overlay().unwrap();
    assert_eq!(overlay.x, 888.0);
    assert_eq!(overlay.center_y, 188.0);
}

#[test]
fn hiding_rows_above_data_moves_overlay_up() {
    let mut sim = Simulation::new(SimConfig::default(), Always(true));
    sim.advance(ms(6500));
    sim.toggle_signal_visibility(SignalKind::Clock);
    sim.toggle_signal_visibility(SignalKind::Reset);
    sim.toggle_signal_visibility(SignalKind::Valid);
    let overlay = sim.overlay().unwrap();
    assert_eq!(overlay.row_top, 0.0);
    assert_eq!(overlay.center_y, 20.0);
    assert_eq!(overlay.annotation_y, -25.0);
}

#[test]
fn reset_row_releases_at_tick_fifteen() {
    let sim = Simulation::new(SimConfig::default(), Always(true));
    // RESET_N is low for the first 15 ticks and high afterwards.
    let reset = sim.trace(SignalKind::Reset).geometry.path_data();
    assert!(reset.starts_with("M 0,30 L 240,30 L 240,10"));
}

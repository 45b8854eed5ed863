//! The simulation controller.
//!
//! [`Simulation`] owns everything one widget instance needs: the fault
//! position, the generated traces, the bug lifecycle, row visibility, the
//! playback flags, and the timer queue that drives the lifecycle. All
//! mutation goes through a handful of event methods (inject, pause toggle,
//! visibility toggle, restart) plus [`Simulation::advance`], which feeds
//! elapsed time in.
//!
//! Two clocks run side by side:
//!
//! - the *timer clock* inside the [`Scheduler`], which runs whenever the
//!   simulation is not manually paused and drives lifecycle transitions;
//! - the *animation clock*, which drives scrolling and the scanner bar and
//!   stops whenever playback is effectively paused (manual pause, or the bug
//!   being detected/corrected).

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::bit::Bit;
use crate::error::WaveError;
use crate::layout::{overlay_for, Overlay, RowLayout, Visibility};
use crate::lifecycle::{BugState, Lifecycle, Timing};
use crate::path::{build_looped_trace, TraceGeometry};
use crate::scheduler::{Epoch, Fired, Scheduler};
use crate::signal::{corrected_data, generate_loop, BitSource, FaultTick, LoopBits, SignalKind};

/// Construction parameters for a [`Simulation`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimConfig {
    /// Scanner and lifecycle timing.
    pub timing: Timing,
    /// Row geometry.
    pub layout: RowLayout,
    /// Initial fault position.
    pub fault: FaultTick,
    /// Initial row visibility.
    pub visibility: Visibility,
}

/// One generated signal row: its bits and their geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    /// Which signal this row shows.
    pub kind: SignalKind,
    /// One loop of bits (not doubled).
    pub bits: Vec<Bit>,
    /// Geometry for the doubled loop.
    pub geometry: TraceGeometry,
}

impl Trace {
    fn build(kind: SignalKind, bits: &[Bit], layout: &RowLayout) -> Self {
        Self {
            kind,
            bits: bits.to_vec(),
            geometry: build_looped_trace(bits, layout.bit_width, layout.levels()),
        }
    }
}

/// State for one bug-detection widget.
#[derive(Debug)]
pub struct Simulation<B> {
    timing: Timing,
    layout: RowLayout,
    source: B,
    fault: FaultTick,
    lifecycle: Lifecycle,
    visibility: Visibility,
    manually_paused: bool,
    bits: LoopBits,
    traces: Vec<Trace>,
    corrected: Trace,
    scheduler: Scheduler<BugState>,
    animation: Duration,
    restarts: u64,
}

impl<B: BitSource> Simulation<B> {
    /// Creates a simulation, generates the first traces, and starts the
    /// lifecycle timers.
    pub fn new(config: SimConfig, mut source: B) -> Self {
        let (bits, traces, corrected) = generate(config.fault, &config.layout, &mut source);
        let mut sim = Self {
            timing: config.timing,
            layout: config.layout,
            source,
            fault: config.fault,
            lifecycle: Lifecycle::new(),
            visibility: config.visibility,
            manually_paused: false,
            bits,
            traces,
            corrected,
            scheduler: Scheduler::new(),
            animation: Duration::ZERO,
            restarts: 0,
        };
        sim.restart();
        sim
    }

    /// Validates and applies a user-entered fault tick.
    ///
    /// On success behaves like [`set_fault_tick`](Self::set_fault_tick). On
    /// failure returns [`WaveError::InvalidFaultTick`] and leaves every part
    /// of the simulation untouched.
    pub fn set_fault_position(&mut self, input: &str) -> Result<FaultTick, WaveError> {
        let fault: FaultTick = input.parse().inspect_err(|e| {
            warn!(%e, "rejected fault tick");
        })?;
        self.set_fault_tick(fault);
        Ok(fault)
    }

    /// Injects a fault at `fault`: regenerates all traces, clears the
    /// manual pause, and restarts the animation and lifecycle.
    pub fn set_fault_tick(&mut self, fault: FaultTick) {
        self.fault = fault;
        self.manually_paused = false;
        self.regenerate();
        self.restart();
    }

    /// Flips the manual pause flag and returns the new value.
    ///
    /// Pausing cancels pending lifecycle timers and nothing else. Resuming
    /// performs a full restart so timers and visuals line up again.
    pub fn toggle_manual_pause(&mut self) -> bool {
        if self.manually_paused {
            self.manually_paused = false;
            self.restart();
        } else {
            self.manually_paused = true;
            let epoch = self.scheduler.cancel_all();
            debug!(%epoch, state = %self.lifecycle.state(), "paused");
        }
        self.manually_paused
    }

    /// Shows or hides a signal row and returns its new visibility.
    pub fn toggle_signal_visibility(&mut self, kind: SignalKind) -> bool {
        let visible = self.visibility.toggle(kind);
        debug!(signal = %kind, visible, "toggled row");
        visible
    }

    /// Restarts the animation and lifecycle from zero with the current
    /// traces.
    ///
    /// Starts a new timer epoch first, so nothing scheduled before the
    /// restart can fire afterwards.
    pub fn restart(&mut self) {
        let epoch = self.scheduler.restart();
        self.lifecycle.reset();
        self.animation = Duration::ZERO;
        self.restarts += 1;
        info!(%epoch, fault = %self.fault, "simulation restarted");
        if !self.manually_paused {
            self.schedule_next();
        }
    }

    /// Advances both clocks by `dt`, firing due lifecycle transitions in
    /// order.
    ///
    /// Does nothing while manually paused. The animation clock only
    /// accumulates the parts of `dt` during which playback was not paused by
    /// the lifecycle.
    pub fn advance(&mut self, dt: Duration) {
        if self.manually_paused {
            return;
        }
        let target = self.scheduler.now() + dt;
        let mut mark = self.scheduler.now();
        while let Some(fired) = self.scheduler.pop_due(target) {
            self.run_animation(fired.due.saturating_sub(mark));
            mark = fired.due;
            self.on_timer(fired);
        }
        self.run_animation(target.saturating_sub(mark));
        self.scheduler.advance_to(target);
    }

    fn regenerate(&mut self) {
        let (bits, traces, corrected) = generate(self.fault, &self.layout, &mut self.source);
        self.bits = bits;
        self.traces = traces;
        self.corrected = corrected;
        debug!(fault = %self.fault, "regenerated traces");
    }
}

impl<B> Simulation<B> {
    fn schedule_next(&mut self) {
        let state = self.lifecycle.state();
        if let (Some(next), Some(delay)) = (state.successor(), self.timing.dwell(state, self.fault))
        {
            self.scheduler.schedule_after(delay, next);
        }
    }

    fn on_timer(&mut self, fired: Fired<BugState>) {
        if fired.epoch != self.scheduler.epoch() {
            warn!(stale = %fired.epoch, "ignoring timer from a previous epoch");
            return;
        }
        let from = self.lifecycle.state();
        if self.lifecycle.advance_to(fired.payload) {
            info!(%from, to = %fired.payload, at_ms = fired.due.as_millis() as u64, "bug lifecycle");
            self.schedule_next();
        } else {
            debug!(%from, refused = %fired.payload, "out-of-order transition");
        }
    }

    fn run_animation(&mut self, d: Duration) {
        if !self.is_paused() {
            self.animation += d;
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BugState {
        self.lifecycle.state()
    }

    /// Current fault position.
    pub fn fault_tick(&self) -> FaultTick {
        self.fault
    }

    /// Whether the user paused the simulation.
    pub fn is_manually_paused(&self) -> bool {
        self.manually_paused
    }

    /// Effective playback flag: manual pause or a bug in flight.
    pub fn is_paused(&self) -> bool {
        self.manually_paused || self.lifecycle.state().pauses_playback()
    }

    /// Row visibility.
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Row geometry.
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Timing parameters.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// The generated bits, including the faulty data row.
    pub fn bits(&self) -> &LoopBits {
        &self.bits
    }

    /// The healed data row.
    pub fn corrected_trace(&self) -> &Trace {
        &self.corrected
    }

    /// The trace currently shown for `kind`; the data row switches to the
    /// healed trace once correction starts.
    pub fn trace(&self, kind: SignalKind) -> &Trace {
        if kind == SignalKind::Data && self.lifecycle.state().shows_corrected_trace() {
            &self.corrected
        } else {
            &self.traces[kind.index()]
        }
    }

    /// The fault highlight to draw, if any.
    pub fn overlay(&self) -> Option<Overlay> {
        overlay_for(
            self.lifecycle.state(),
            self.fault,
            &self.layout,
            &self.visibility,
        )
    }

    /// Animation time since the last restart, excluding paused spans.
    pub fn animation_time(&self) -> Duration {
        self.animation
    }

    /// Time on the timer clock since the last restart.
    pub fn timer_time(&self) -> Duration {
        self.scheduler.now()
    }

    /// Scroll position as a fraction of one loop, in `[0, 1)`.
    pub fn scroll_phase(&self) -> f64 {
        phase(self.animation, self.timing.scroll_duration)
    }

    /// Horizontal scroll offset in pixels.
    pub fn scroll_offset_px(&self) -> f64 {
        self.scroll_phase() * self.layout.loop_width()
    }

    /// Scanner position as a fraction of one loop, or `None` during the
    /// initial delay.
    pub fn scanner_phase(&self) -> Option<f64> {
        let since = self.animation.checked_sub(self.timing.scan_delay)?;
        Some(phase(since, self.timing.scan_duration))
    }

    /// Scanner x position in trace coordinates.
    pub fn scanner_x(&self) -> Option<f64> {
        self.scanner_phase().map(|p| p * self.layout.loop_width())
    }

    /// Current timer epoch.
    pub fn epoch(&self) -> Epoch {
        self.scheduler.epoch()
    }

    /// Number of live lifecycle timers.
    pub fn active_timers(&self) -> usize {
        self.scheduler.active()
    }

    /// Time remaining until the next lifecycle transition, if one is pending.
    pub fn next_transition_in(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.scheduler.now()))
    }

    /// Number of restarts since construction (the first start included).
    pub fn restarts(&self) -> u64 {
        self.restarts
    }
}

fn generate(
    fault: FaultTick,
    layout: &RowLayout,
    source: &mut impl BitSource,
) -> (LoopBits, Vec<Trace>, Trace) {
    let bits = generate_loop(fault, source);
    let traces = bits
        .iter()
        .map(|(kind, row)| Trace::build(kind, row, layout))
        .collect();
    let healed = corrected_data(bits.get(SignalKind::Valid), source);
    let corrected = Trace::build(SignalKind::Data, &healed, layout);
    (bits, traces, corrected)
}

fn phase(elapsed: Duration, period: Duration) -> f64 {
    if period.is_zero() {
        return 0.0;
    }
    (elapsed.as_secs_f64() / period.as_secs_f64()).fract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::test_sources::Constant;
    use crate::signal::RngBits;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn seeded() -> Simulation<RngBits<StdRng>> {
        Simulation::new(SimConfig::default(), RngBits(StdRng::seed_from_u64(1)))
    }

    #[test]
    fn starts_idle_with_one_timer() {
        let sim = seeded();
        assert_eq!(sim.state(), BugState::Idle);
        assert_eq!(sim.fault_tick().get(), 55);
        assert_eq!(sim.active_timers(), 1);
        assert_eq!(sim.next_transition_in(), Some(ms(6500)));
        assert!(!sim.is_paused());
    }

    #[test]
    fn lifecycle_runs_on_schedule() {
        let mut sim = seeded();
        sim.advance(ms(6499));
        assert_eq!(sim.state(), BugState::Idle);
        sim.advance(ms(1));
        assert_eq!(sim.state(), BugState::Detected);
        sim.advance(ms(999));
        assert_eq!(sim.state(), BugState::Detected);
        sim.advance(ms(1));
        assert_eq!(sim.state(), BugState::Correcting);
        sim.advance(ms(1499));
        assert_eq!(sim.state(), BugState::Correcting);
        sim.advance(ms(1));
        assert_eq!(sim.state(), BugState::Fixed);
        assert_eq!(sim.active_timers(), 0);
        sim.advance(ms(60_000));
        assert_eq!(sim.state(), BugState::Fixed);
    }

    #[test]
    fn large_step_walks_every_state() {
        let mut sim = seeded();
        sim.advance(ms(20_000));
        assert_eq!(sim.state(), BugState::Fixed);
        assert_eq!(sim.lifecycle.transitions(), 3);
    }

    #[test]
    fn animation_freezes_while_bug_in_flight() {
        let mut sim = seeded();
        sim.advance(ms(10_000));
        // 6.5 s of motion until detection; frozen through correcting (2.5 s);
        // moving again for the last 1 s after fixed.
        assert_eq!(sim.state(), BugState::Fixed);
        assert_eq!(sim.animation_time(), ms(7500));
        assert_eq!(sim.timer_time(), ms(10_000));
    }

    #[test]
    fn effective_pause_during_detected_and_correcting() {
        let mut sim = seeded();
        sim.advance(ms(6500));
        assert!(sim.is_paused());
        assert!(!sim.is_manually_paused());
        sim.advance(ms(1000));
        assert_eq!(sim.state(), BugState::Correcting);
        assert!(sim.is_paused());
        sim.advance(ms(1500));
        assert!(!sim.is_paused());
    }

    #[test]
    fn data_trace_swaps_when_correcting() {
        let config = SimConfig {
            fault: FaultTick::new(45).unwrap(),
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config, Constant(true));
        assert!(sim.trace(SignalKind::Data).geometry.has_faults());
        sim.advance(ms(5500));
        assert_eq!(sim.state(), BugState::Detected);
        assert!(sim.trace(SignalKind::Data).geometry.has_faults());
        sim.advance(ms(1000));
        assert_eq!(sim.state(), BugState::Correcting);
        assert!(!sim.trace(SignalKind::Data).geometry.has_faults());
        assert_eq!(sim.trace(SignalKind::Data), sim.corrected_trace());
        sim.advance(ms(1500));
        assert!(!sim.trace(SignalKind::Data).geometry.has_faults());
    }

    #[test]
    fn manual_pause_cancels_timers_only() {
        let mut sim = seeded();
        sim.advance(ms(1000));
        let anim = sim.animation_time();
        let epoch = sim.epoch();
        assert!(sim.toggle_manual_pause());
        assert_ne!(sim.epoch(), epoch);
        assert_eq!(sim.active_timers(), 0);
        assert_eq!(sim.state(), BugState::Idle);
        sim.advance(ms(30_000));
        assert_eq!(sim.state(), BugState::Idle);
        assert_eq!(sim.animation_time(), anim);
        assert!(sim.is_paused());
    }

    #[test]
    fn resume_restarts() {
        let mut sim = seeded();
        sim.advance(ms(7000));
        assert_eq!(sim.state(), BugState::Detected);
        sim.toggle_manual_pause();
        assert_eq!(sim.state(), BugState::Detected);
        let bits = sim.bits().clone();
        assert!(!sim.toggle_manual_pause());
        assert_eq!(sim.state(), BugState::Idle);
        assert_eq!(sim.animation_time(), Duration::ZERO);
        assert_eq!(sim.active_timers(), 1);
        // Resuming does not regenerate geometry.
        assert_eq!(sim.bits(), &bits);
    }

    #[test]
    fn inject_clears_manual_pause() {
        let mut sim = seeded();
        sim.toggle_manual_pause();
        sim.set_fault_position("10").unwrap();
        assert!(!sim.is_manually_paused());
        assert_eq!(sim.active_timers(), 1);
        assert_eq!(sim.next_transition_in(), Some(ms(2000)));
    }

    #[test]
    fn visibility_moves_overlay() {
        let mut sim = seeded();
        sim.advance(ms(6500));
        let before = sim.overlay().unwrap();
        assert!(!sim.toggle_signal_visibility(SignalKind::Reset));
        let after = sim.overlay().unwrap();
        assert_eq!(before.row_top - after.row_top, 56.0);
        sim.toggle_signal_visibility(SignalKind::Data);
        assert!(sim.overlay().is_none());
    }

    #[test]
    fn scroll_and_scanner_positions() {
        let mut sim = seeded();
        assert_eq!(sim.scanner_x(), None);
        sim.advance(ms(2500));
        assert!((sim.scroll_offset_px() - 400.0).abs() < 1e-6);
        assert!((sim.scanner_x().unwrap() - 240.0).abs() < 1e-6);
    }

    #[test]
    fn scanner_reaches_fault_at_detection() {
        let mut sim = seeded();
        sim.advance(ms(6500));
        let x = sim.scanner_x().unwrap();
        assert!((x - 55.0 * 16.0).abs() < 1e-6);
    }

    #[test]
    fn restart_counter() {
        let mut sim = seeded();
        assert_eq!(sim.restarts(), 1);
        sim.restart();
        sim.set_fault_position("3").unwrap();
        assert_eq!(sim.restarts(), 3);
    }
}

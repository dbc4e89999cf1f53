//! Fixed-timestep frame clock.
//!
//! The clock decouples the simulation rate from the presentation rate with
//! the classic accumulator pattern: wall-clock time is banked into an
//! `unprocessed` pool, and the simulation advances in constant-size ticks
//! drawn from that pool. A stalled frame simply accumulates time and is
//! caught up across subsequent iterations, one tick per inner-loop pass,
//! so the update math stays deterministic under variable display refresh
//! rates.
//!
//! The clock is a plain value owned by the engine instance; FPS is exposed
//! through [`FrameClock::fps`] rather than shared process-wide state.

use std::time::{Duration, Instant};

/// Default simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 1000;

/// The outcome of one outer-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Number of fixed-size ticks consumed this iteration. The caller runs
    /// the simulation update once per tick worth of catch-up but renders at
    /// most once regardless of this count.
    pub ticks: u32,
    /// Set when a full second of frame accounting elapsed during this
    /// iteration; carries the measured frames-per-second for that second.
    pub fps_sample: Option<u32>,
}

impl Step {
    /// Whether any simulation time elapsed, i.e. whether the caller should
    /// update and render this iteration.
    #[must_use]
    pub fn elapsed(&self) -> bool {
        self.ticks > 0
    }
}

/// Accumulator state for the fixed-timestep loop.
#[derive(Debug)]
pub struct FrameClock {
    /// Duration of one simulation tick, in seconds.
    tick_duration: f64,
    /// Timestamp of the previous [`advance`](Self::advance) call.
    last_time: Instant,
    /// Wall-clock seconds not yet consumed by simulation ticks.
    unprocessed: f64,
    /// Time accumulated since the last FPS sample.
    frame_counter: Duration,
    /// Render passes counted since the last FPS sample.
    frames: u32,
    /// The most recent FPS measurement.
    fps: u32,
}

impl FrameClock {
    /// Create a clock running at `tick_rate` ticks per second, anchored at
    /// `now`.
    ///
    /// # Panics
    ///
    /// Panics if `tick_rate` is zero.
    #[must_use]
    pub fn new(tick_rate: u32, now: Instant) -> Self {
        assert!(tick_rate > 0, "tick rate must be non-zero");
        Self {
            tick_duration: 1.0 / f64::from(tick_rate),
            last_time: now,
            unprocessed: 0.0,
            frame_counter: Duration::ZERO,
            frames: 0,
            fps: 0,
        }
    }

    /// Bank the time passed since the last call and drain it in fixed-size
    /// ticks.
    ///
    /// Each inner-loop pass consumes exactly one tick; when the frame
    /// counter crosses one full second the current frame count is
    /// snapshotted as the FPS measurement and both counters reset.
    pub fn advance(&mut self, now: Instant) -> Step {
        let passed = now.saturating_duration_since(self.last_time);
        self.last_time = now;

        self.unprocessed += passed.as_secs_f64();
        self.frame_counter += passed;

        let mut ticks = 0;
        let mut fps_sample = None;
        while self.unprocessed > self.tick_duration {
            self.unprocessed -= self.tick_duration;
            ticks += 1;

            if self.frame_counter >= Duration::from_secs(1) {
                self.fps = self.frames;
                fps_sample = Some(self.frames);
                self.frames = 0;
                self.frame_counter = Duration::ZERO;
            }
        }

        Step { ticks, fps_sample }
    }

    /// Record one render pass toward the current FPS sample window.
    pub fn count_frame(&mut self) {
        self.frames += 1;
    }

    /// The most recently measured frames-per-second value.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Duration of one simulation tick, in seconds.
    #[must_use]
    pub fn tick_duration(&self) -> f64 {
        self.tick_duration
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Half-tick phase offset at 1000 ticks/s. Keeps the accumulator away
    /// from exact tick boundaries so strict-inequality draining is stable
    /// across float rounding.
    const PHASE: Duration = Duration::from_micros(500);

    /// Drive a 1000 Hz clock one simulated millisecond per iteration,
    /// rendering whenever a tick elapsed. Returns (updates, renders,
    /// last sample seen).
    fn run_millis(
        clock: &mut FrameClock,
        start: Instant,
        range: std::ops::RangeInclusive<u64>,
    ) -> (u64, u64, Option<u32>) {
        let mut updates = 0;
        let mut renders = 0;
        let mut sample = None;
        for ms in range {
            let step = clock.advance(start + PHASE + Duration::from_millis(ms));
            updates += u64::from(step.ticks);
            if step.fps_sample.is_some() {
                sample = step.fps_sample;
            }
            if step.elapsed() {
                renders += 1;
                clock.count_frame();
            }
        }
        (updates, renders, sample)
    }

    #[test]
    fn tick_count_matches_elapsed_over_tick_duration() {
        let start = Instant::now();
        // 50 ticks per second, one second of simulated time in 4 steps.
        let mut clock = FrameClock::new(50, start);
        let mut total = 0;
        for quarter in 1..=4u64 {
            let step = clock.advance(start + Duration::from_millis(250 * quarter));
            total += step.ticks;
        }
        // floor(1.0 / 0.02) = 50, within one tick of rounding since the
        // accumulator drains on strict inequality.
        assert!((49..=50).contains(&total), "got {total} ticks");
    }

    #[test]
    fn lag_is_caught_up_in_single_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::new(100, start);
        // A 505ms stall banks 50 ticks, all consumed in one iteration;
        // the caller still renders only once for it.
        let step = clock.advance(start + Duration::from_millis(505));
        assert_eq!(step.ticks, 50);
        assert!(step.elapsed());
    }

    #[test]
    fn no_tick_no_render() {
        let start = Instant::now();
        let mut clock = FrameClock::new(10, start);
        // 10ms is well under the 100ms tick.
        let step = clock.advance(start + Duration::from_millis(10));
        assert_eq!(step.ticks, 0);
        assert!(!step.elapsed());
    }

    #[test]
    fn fps_sample_equals_render_count_over_one_second() {
        let start = Instant::now();
        let mut clock = FrameClock::new(1000, start);
        // Settle the phase offset first (no tick elapses for half a tick).
        assert_eq!(clock.advance(start + PHASE).ticks, 0);

        let (_, renders, _) = run_millis(&mut clock, start, 1..=999);
        // The frame counter crosses one second during this iteration.
        let step = clock.advance(start + PHASE + Duration::from_millis(1000));
        let sample = step.fps_sample.unwrap();
        assert_eq!(u64::from(sample), renders);
        assert_eq!(clock.fps(), sample);
    }

    #[test]
    fn counters_reset_after_sample() {
        let start = Instant::now();
        let mut clock = FrameClock::new(1000, start);
        clock.advance(start + PHASE);
        run_millis(&mut clock, start, 1..=999);

        let step = clock.advance(start + PHASE + Duration::from_millis(1000));
        assert!(step.fps_sample.is_some());
        assert_eq!(clock.frame_counter, Duration::ZERO);
        assert_eq!(clock.frames, 0);
    }

    #[test]
    fn second_sample_window_counts_only_new_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::new(1000, start);
        clock.advance(start + PHASE);
        run_millis(&mut clock, start, 1..=1000);

        // Second simulated second produces an independent sample.
        let (_, _, sample) = run_millis(&mut clock, start, 1001..=2000);
        let sample = sample.unwrap();
        assert!(sample > 0);
        assert!(u64::from(sample) <= 1000);
    }

    #[test]
    #[should_panic(expected = "tick rate must be non-zero")]
    fn zero_tick_rate_panics() {
        let _ = FrameClock::new(0, Instant::now());
    }
}

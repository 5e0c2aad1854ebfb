//! Frame-stepped sequences.
//!
//! Timed effects (fades, sphere growth, delayed scene loads) are small state
//! objects advanced by a system once per frame with that frame's delta.
//! Stopping a sequence means dropping it: whatever value it reached stays.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Finished,
}

impl Progress {
    pub fn is_finished(self) -> bool {
        self == Progress::Finished
    }
}

/// Counts down a fixed number of seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    remaining: f32,
}

impl Delay {
    pub fn new(secs: f32) -> Self {
        Self {
            remaining: secs.max(0.0),
        }
    }

    pub fn advance(&mut self, dt: f32) -> Progress {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= 0.0 {
            Progress::Finished
        } else {
            Progress::Running
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Linear interpolation from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Ramp {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Ramp {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) -> Progress {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if self.elapsed >= self.duration {
            Progress::Finished
        } else {
            Progress::Running
        }
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from + (self.to - self.from) * t
    }
}

/// Grows a value toward a target at a fixed rate per second.
#[derive(Debug, Clone, PartialEq)]
pub struct Growth {
    current: f32,
    target: f32,
    speed: f32,
}

impl Growth {
    pub fn new(start: f32, target: f32, speed: f32) -> Self {
        Self {
            current: start,
            target,
            speed: speed.abs(),
        }
    }

    pub fn advance(&mut self, dt: f32) -> Progress {
        let step = self.speed * dt.max(0.0);
        if self.current < self.target {
            self.current = (self.current + step).min(self.target);
        } else {
            self.current = (self.current - step).max(self.target);
        }
        if (self.current - self.target).abs() <= f32::EPSILON {
            Progress::Finished
        } else {
            Progress::Running
        }
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

/// Endless sinusoidal oscillation between `min` and `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pulse {
    pub min: f32,
    pub max: f32,
    pub speed: f32,
    phase: f32,
}

impl Pulse {
    pub fn new(min: f32, max: f32, speed: f32) -> Self {
        Self {
            min: min.min(max),
            max,
            speed,
            phase: 0.0,
        }
    }

    /// Advance and return the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.phase += dt.max(0.0) * self.speed;
        self.value()
    }

    pub fn value(&self) -> f32 {
        let t = (self.phase.sin() + 1.0) * 0.5;
        self.min + (self.max - self.min) * t
    }
}

/// One step of a `StepQueue`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Hold the current value.
    Hold(Delay),
    /// Move the value along a ramp.
    Ramp(Ramp),
}

/// A list of steps run back to back, tracking a single value
/// (typically an alpha). Used for fade-in / hold / fade-out cards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepQueue {
    steps: VecDeque<Step>,
    value: f32,
}

impl StepQueue {
    pub fn new(initial: f32) -> Self {
        Self {
            steps: VecDeque::new(),
            value: initial,
        }
    }

    pub fn then_hold(mut self, secs: f32) -> Self {
        self.steps.push_back(Step::Hold(Delay::new(secs)));
        self
    }

    pub fn then_ramp(mut self, to: f32, secs: f32) -> Self {
        // The ramp's start is rebased on the live value when it becomes current.
        self.steps.push_back(Step::Ramp(Ramp::new(f32::NAN, to, secs)));
        self
    }

    /// Fade in over `fade`, hold for `hold`, fade out over `fade`.
    pub fn fade_card(fade: f32, hold: f32) -> Self {
        StepQueue::new(0.0)
            .then_ramp(1.0, fade)
            .then_hold(hold)
            .then_ramp(0.0, fade)
    }

    pub fn advance(&mut self, mut dt: f32) -> Progress {
        while let Some(step) = self.steps.front_mut() {
            let progress = match step {
                Step::Hold(delay) => {
                    let before = delay.remaining();
                    let progress = delay.advance(dt);
                    dt = (dt - before).max(0.0);
                    progress
                }
                Step::Ramp(ramp) => {
                    if ramp.from.is_nan() {
                        *ramp = Ramp::new(self.value, ramp.to, ramp.duration);
                    }
                    let before = ramp.duration - ramp.elapsed;
                    let progress = ramp.advance(dt);
                    self.value = ramp.value();
                    dt = (dt - before).max(0.0);
                    progress
                }
            };
            if progress.is_finished() {
                self.steps.pop_front();
            } else {
                return Progress::Running;
            }
            if dt <= 0.0 && !self.steps.is_empty() {
                return Progress::Running;
            }
        }
        Progress::Finished
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_finishes_after_duration() {
        let mut delay = Delay::new(2.0);
        assert_eq!(delay.advance(1.0), Progress::Running);
        assert_eq!(delay.advance(0.5), Progress::Running);
        assert_eq!(delay.advance(0.5), Progress::Finished);
        assert_eq!(delay.remaining(), 0.0);
    }

    #[test]
    fn test_growth_clamps_at_target() {
        let mut growth = Growth::new(0.0, 100.0, 50.0);
        assert_eq!(growth.advance(1.0), Progress::Running);
        assert!((growth.value() - 50.0).abs() < 1e-4);
        assert_eq!(growth.advance(5.0), Progress::Finished);
        assert_eq!(growth.value(), 100.0);
    }

    #[test]
    fn test_pulse_stays_within_bounds() {
        let mut pulse = Pulse::new(90.0, 110.0, 1.0);
        for _ in 0..200 {
            let v = pulse.advance(0.1);
            assert!((90.0..=110.0).contains(&v), "pulse value {v} out of range");
        }
    }

    #[test]
    fn test_ramp_interpolates() {
        let mut ramp = Ramp::new(0.0, 1.0, 0.5);
        ramp.advance(0.25);
        assert!((ramp.value() - 0.5).abs() < 1e-4);
        assert_eq!(ramp.advance(0.25), Progress::Finished);
        assert_eq!(ramp.value(), 1.0);
    }

    #[test]
    fn test_fade_card_runs_in_then_out() {
        let mut card = StepQueue::fade_card(0.5, 3.0);
        card.advance(0.5);
        assert!((card.value() - 1.0).abs() < 1e-4, "fully visible after fade in");
        card.advance(2.0);
        assert!((card.value() - 1.0).abs() < 1e-4, "still held");
        assert_eq!(card.advance(1.0), Progress::Running);
        assert_eq!(card.advance(0.5), Progress::Finished);
        assert!(card.value().abs() < 1e-4);
        assert!(card.is_finished());
    }
}

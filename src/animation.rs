use std::time::{Duration, Instant};

use log::debug;

use crate::config::{Config, FlingPolicy};
use crate::math::Rotation;

/// Where the fling animation is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    /// `started` is captured by the first frame after entry
    Animating { started: Option<Instant> },
}

/// Output of one animated paint pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Cumulative rotation to apply to the needle this pass
    pub rotation: Rotation,
    /// Delay before the next frame, `None` once the duration is spent
    pub next: Option<Duration>,
}

/// Fixed-duration, fixed-rate spin animation
pub struct AnimationClock {
    state: AnimationState,
    rotation: Rotation,
    step_degrees: f64,
    duration: Duration,
    interval: Duration,
    policy: FlingPolicy,
}

impl AnimationClock {
    pub fn new(config: &Config) -> Self {
        AnimationClock {
            state: AnimationState::Idle,
            rotation: Rotation::NONE,
            step_degrees: config.rotation_step_degrees,
            duration: config.animation_duration(),
            interval: config.frame_interval(),
            policy: config.fling_policy,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating { .. })
    }

    /// Whether the next frame has to capture a fresh start time
    pub fn needs_restart(&self) -> bool {
        matches!(
            self.state,
            AnimationState::Idle | AnimationState::Animating { started: None }
        )
    }

    /// Cumulative rotation; survives the return to idle
    #[cfg(test)]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Handles a fling, entering the animation from idle
    pub fn fling(&mut self) {
        match self.state {
            AnimationState::Idle => {
                debug!("fling: idle -> animating");
                self.state = AnimationState::Animating { started: None };
            }
            AnimationState::Animating { .. } => match self.policy {
                FlingPolicy::Ignore => debug!("fling absorbed by running animation"),
                FlingPolicy::Restart => {
                    debug!("fling restarts animation clock");
                    self.state = AnimationState::Animating { started: None };
                }
            },
        }
    }

    /// Advances the clock for a paint pass at `now`; `None` while idle
    pub fn advance(&mut self, now: Instant) -> Option<Frame> {
        let AnimationState::Animating { started } = self.state else {
            return None;
        };
        let started = started.unwrap_or(now);
        let elapsed = now.saturating_duration_since(started);
        self.rotation = self.rotation.extend(self.step_degrees);

        let next = if elapsed < self.duration {
            self.state = AnimationState::Animating {
                started: Some(started),
            };
            Some(self.interval)
        } else {
            debug!(
                "animation finished after {elapsed:?} at {:.0} degrees",
                self.rotation.degrees()
            );
            self.state = AnimationState::Idle;
            None
        };

        Some(Frame {
            rotation: self.rotation,
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(policy: FlingPolicy) -> AnimationClock {
        AnimationClock::new(&Config {
            fling_policy: policy,
            ..Config::default()
        })
    }

    #[test]
    fn starts_idle_and_needing_restart() {
        let mut clock = clock(FlingPolicy::Ignore);
        assert_eq!(clock.state(), AnimationState::Idle);
        assert!(clock.needs_restart());
        assert_eq!(clock.advance(Instant::now()), None);
        assert_eq!(clock.rotation(), Rotation::NONE);
    }

    #[test]
    fn first_frame_captures_start_time() {
        let mut clock = clock(FlingPolicy::Ignore);
        let start = Instant::now();
        clock.fling();
        assert!(clock.is_animating());
        assert!(clock.needs_restart());

        let frame = clock.advance(start).unwrap();
        assert_eq!(frame.next, Some(Duration::from_millis(10)));
        assert_eq!(
            clock.state(),
            AnimationState::Animating {
                started: Some(start)
            }
        );
        assert!(!clock.needs_restart());
    }

    #[test]
    fn each_frame_adds_one_step() {
        let mut clock = clock(FlingPolicy::Ignore);
        let start = Instant::now();
        clock.fling();
        let mut previous = Rotation::NONE;
        for i in 0..5 {
            let frame = clock.advance(start + Duration::from_millis(i * 10)).unwrap();
            assert_eq!(frame.rotation.degrees() - previous.degrees(), 60.0);
            previous = frame.rotation;
        }
    }

    #[test]
    fn returns_to_idle_once_duration_is_spent() {
        let mut clock = clock(FlingPolicy::Ignore);
        let start = Instant::now();
        clock.fling();
        clock.advance(start);

        let last = clock.advance(start + Duration::from_secs(10)).unwrap();
        assert_eq!(last.next, None);
        assert_eq!(clock.state(), AnimationState::Idle);
        assert!(clock.needs_restart());
        // The accumulated spin is kept
        assert_eq!(clock.rotation().degrees(), 120.0);
        assert_eq!(clock.advance(start + Duration::from_secs(11)), None);
    }

    #[test]
    fn ignore_policy_keeps_running_clock() {
        let mut clock = clock(FlingPolicy::Ignore);
        let start = Instant::now();
        clock.fling();
        clock.advance(start);
        clock.fling();
        assert_eq!(
            clock.state(),
            AnimationState::Animating {
                started: Some(start)
            }
        );
        let frame = clock.advance(start + Duration::from_secs(10)).unwrap();
        assert_eq!(frame.next, None);
    }

    #[test]
    fn restart_policy_starts_fresh_clock() {
        let mut clock = clock(FlingPolicy::Restart);
        let start = Instant::now();
        clock.fling();
        clock.advance(start);
        clock.fling();
        assert!(clock.needs_restart());

        let restarted = start + Duration::from_secs(9);
        clock.advance(restarted);
        let frame = clock.advance(start + Duration::from_secs(10)).unwrap();
        assert_eq!(frame.next, Some(Duration::from_millis(10)));
        assert_eq!(
            clock.state(),
            AnimationState::Animating {
                started: Some(restarted)
            }
        );
    }

    #[test]
    fn fling_after_finish_starts_new_clock() {
        let mut clock = clock(FlingPolicy::Ignore);
        let start = Instant::now();
        clock.fling();
        clock.advance(start);
        clock.advance(start + Duration::from_secs(10));

        let later = start + Duration::from_secs(30);
        clock.fling();
        let frame = clock.advance(later).unwrap();
        assert_eq!(frame.next, Some(Duration::from_millis(10)));
        assert_eq!(frame.rotation.degrees(), 180.0);
    }
}

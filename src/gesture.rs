use std::time::{Duration, Instant};

use crate::config::Config;
use crate::math::Point;

/// Raw pointer action delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Raw pointer input in viewport units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Point, time: Instant) -> Self {
        PointerEvent {
            kind,
            position,
            time,
        }
    }
}

/// A recognised gesture primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Down,
    Tap,
    /// Movement since the previous event of the same press
    Scroll { delta: Point },
    LongPress,
    /// Release velocity in viewport units per second
    Fling { velocity: Point },
}

/// An in-progress press
#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    down_at: Instant,
    last_position: Point,
    last_time: Instant,
    velocity: Point,
    scrolling: bool,
    long_pressed: bool,
}

/// Turns raw pointer events into gestures
pub struct GestureRecognizer {
    touch_slop: f64,
    long_press_timeout: Duration,
    min_fling_velocity: f64,
    press: Option<Press>,
}

impl GestureRecognizer {
    pub fn new(config: &Config) -> Self {
        GestureRecognizer {
            touch_slop: config.touch_slop,
            long_press_timeout: config.long_press_timeout(),
            min_fling_velocity: config.min_fling_velocity,
            press: None,
        }
    }

    /// Classifies one raw event. Events outside a press yield nothing
    pub fn classify(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event.kind {
            PointerKind::Down => {
                self.press = Some(Press {
                    origin: event.position,
                    down_at: event.time,
                    last_position: event.position,
                    last_time: event.time,
                    velocity: Point::ZERO,
                    scrolling: false,
                    long_pressed: false,
                });
                Some(Gesture::Down)
            }
            PointerKind::Move => {
                let touch_slop = self.touch_slop;
                let long_press_timeout = self.long_press_timeout;
                let press = self.press.as_mut()?;
                if press.long_pressed {
                    return None;
                }
                if !press.scrolling {
                    if event.position.distance(press.origin) <= touch_slop {
                        if event.time.duration_since(press.down_at) >= long_press_timeout {
                            press.long_pressed = true;
                            return Some(Gesture::LongPress);
                        }
                        return None;
                    }
                    press.scrolling = true;
                }
                let delta = track(press, event);
                Some(Gesture::Scroll { delta })
            }
            PointerKind::Up => {
                let mut press = self.press.take()?;
                if press.long_pressed {
                    return None;
                }
                if !press.scrolling && event.position.distance(press.origin) <= self.touch_slop {
                    if event.time.duration_since(press.down_at) >= self.long_press_timeout {
                        return Some(Gesture::LongPress);
                    }
                    return Some(Gesture::Tap);
                }
                track(&mut press, event);
                let velocity = press.velocity;
                (velocity.length() >= self.min_fling_velocity).then_some(Gesture::Fling { velocity })
            }
        }
    }

    /// Reports a long press for a pointer held still past the timeout
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        let press = self.press.as_mut()?;
        if press.scrolling || press.long_pressed {
            return None;
        }
        if now.duration_since(press.down_at) >= self.long_press_timeout {
            press.long_pressed = true;
            return Some(Gesture::LongPress);
        }
        None
    }
}

/// Records a new sample, updating the velocity when time has passed
fn track(press: &mut Press, event: PointerEvent) -> Point {
    let delta = event.position - press.last_position;
    let dt = event.time.duration_since(press.last_time).as_secs_f64();
    if dt > 0.0 {
        press.velocity = delta * (1.0 / dt);
    }
    press.last_position = event.position;
    press.last_time = event.time;
    delta
}

use std::time::Instant;

use log::{debug, trace};

use crate::animation::{AnimationClock, AnimationState};
use crate::config::Config;
use crate::gesture::{Gesture, GestureRecognizer, PointerEvent};
use crate::graphics::{Style, Surface};
use crate::host::Host;
use crate::math::{needle_endpoint, Point};
use crate::state::CompassState;

/// Wind compass widget
pub struct CompassWidget {
    state: CompassState,
    clock: AnimationClock,
    recognizer: GestureRecognizer,
    /// Gap between the rose circle and the viewport edge
    circle_inset: f64,
    /// Gap between the cardinal glyphs and the viewport edge
    direction_spacing: f64,
}

impl CompassWidget {
    pub fn new(config: &Config) -> Self {
        CompassWidget {
            state: CompassState::new(config.viewport_width, config.viewport_height),
            clock: AnimationClock::new(config),
            recognizer: GestureRecognizer::new(config),
            circle_inset: config.circle_inset,
            direction_spacing: config.direction_spacing,
        }
    }

    pub fn state(&self) -> &CompassState {
        &self.state
    }

    pub fn animation(&self) -> AnimationState {
        self.clock.state()
    }

    /// Accessibility text for the current direction
    pub fn describe(&self) -> String {
        self.state.describe()
    }

    /// Replaces the wind direction and requests a repaint
    pub fn set_direction<H: Host>(&mut self, degrees: f64, host: &mut H) {
        self.state.set_degrees(degrees);
        debug!("direction set to {degrees} degrees");
        if host.accessibility_enabled() {
            host.announce(&self.state.describe());
        }
        host.request_paint();
    }

    /// Endpoint of the needle before any animation rotation
    pub fn needle_endpoint<S: Surface>(&self, surface: &S) -> Point {
        let glyph_width = surface.measure_text("N").floor();
        let scalar = self.state.viewport_width / 2.0 - glyph_width;
        needle_endpoint(self.state.center(), scalar, self.state.direction_radians)
    }

    /// Paints the rose and needle, advancing the animation when one is playing
    pub fn render<S: Surface, H: Host>(&mut self, surface: &mut S, host: &mut H, now: Instant) {
        let width = self.state.viewport_width;
        let height = self.state.viewport_height;
        let center = self.state.center();

        // Draw outer circle
        surface.draw_circle(center, height / 2.0 - self.circle_inset, Style::CIRCLE);

        // Draw letters for directions
        let glyph_width = surface.measure_text("N").floor();
        let half_glyph = (glyph_width / 2.0).floor();
        let spacing = self.direction_spacing;
        surface.draw_text("N", Point::new(center.x, 2.0 * glyph_width), Style::TEXT);
        surface.draw_text(
            "E",
            Point::new(width - glyph_width - spacing, center.y + half_glyph),
            Style::TEXT,
        );
        surface.draw_text(
            "S",
            Point::new(center.x, height - half_glyph - spacing),
            Style::TEXT,
        );
        surface.draw_text(
            "W",
            Point::new(glyph_width + spacing, center.y + half_glyph),
            Style::TEXT,
        );

        // Spin the needle while animating
        if self.clock.is_animating() && self.clock.needs_restart() {
            debug!("animation clock starts");
        }
        let frame = self.clock.advance(now);
        if let Some(frame) = frame {
            surface.set_rotation(frame.rotation, center);
        }

        let end = self.needle_endpoint(&*surface);
        surface.draw_line(center, end, Style::NEEDLE);

        if let Some(delay) = frame.and_then(|f| f.next) {
            trace!("next frame in {delay:?}");
            host.schedule_paint(delay);
        }
    }

    /// Feeds a raw pointer event through the recognizer
    pub fn handle_pointer<H: Host>(
        &mut self,
        event: PointerEvent,
        host: &mut H,
    ) -> Option<Gesture> {
        let gesture = self.recognizer.classify(event);
        if let Some(gesture) = gesture {
            self.handle_gesture(gesture);
        }
        host.request_paint();
        gesture
    }

    /// Lets the recognizer report a long press for a held pointer
    pub fn poll_gestures<H: Host>(&mut self, now: Instant, host: &mut H) -> Option<Gesture> {
        let gesture = self.recognizer.poll(now)?;
        self.handle_gesture(gesture);
        host.request_paint();
        Some(gesture)
    }

    /// Applies a recognised gesture; only a fling has an effect
    pub fn handle_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Fling { velocity } => {
                debug!("fling at {:.0} units/s", velocity.length());
                self.clock.fling();
            }
            Gesture::Down | Gesture::Tap | Gesture::Scroll { .. } | Gesture::LongPress => {}
        }
    }
}

use crate::math::{degrees_to_radians, radians_to_degrees, Point};

const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Direction and intrinsic size of the compass
#[derive(Debug, Clone, PartialEq)]
pub struct CompassState {
    /// Current wind direction, clockwise from north
    pub direction_radians: f64,
    /// Intrinsic draw surface size, fixed at construction
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl CompassState {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        CompassState {
            direction_radians: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    /// Replaces the direction. Any value is accepted, NaN included.
    pub fn set_degrees(&mut self, degrees: f64) {
        self.direction_radians = degrees_to_radians(degrees);
    }

    pub fn center(&self) -> Point {
        Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Human-readable direction, e.g. `Wind direction 225°, SW`
    pub fn describe(&self) -> String {
        if !self.direction_radians.is_finite() {
            return "Wind direction unknown".to_string();
        }
        let degrees = radians_to_degrees(self.direction_radians)
            .rem_euclid(360.0)
            .round()
            % 360.0;
        let point = POINTS[((degrees + 22.5) / 45.0) as usize % POINTS.len()];
        format!("Wind direction {degrees:.0}°, {point}")
    }
}

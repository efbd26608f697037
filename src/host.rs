use std::time::Duration;

/// Services the compass widget needs from whatever hosts it
pub trait Host {
    /// Requests a paint pass as soon as possible
    fn request_paint(&mut self);

    /// Requests a paint pass after `delay`
    fn schedule_paint(&mut self, delay: Duration);

    /// Whether value-changed notifications are being listened to
    fn accessibility_enabled(&self) -> bool;

    /// Emits a value-changed notification carrying `description`
    fn announce(&mut self, description: &str);
}

/// Host that records every request, for driving the widget in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub paint_requests: usize,
    pub scheduled: Vec<Duration>,
    pub accessibility: bool,
    pub announcements: Vec<String>,
}

#[cfg(test)]
impl RecordingHost {
    pub fn with_accessibility() -> Self {
        RecordingHost {
            accessibility: true,
            ..Self::default()
        }
    }

    /// Sum of every scheduled delay
    pub fn scheduled_total(&self) -> Duration {
        self.scheduled.iter().sum()
    }
}

#[cfg(test)]
impl Host for RecordingHost {
    fn request_paint(&mut self) {
        self.paint_requests += 1;
    }

    fn schedule_paint(&mut self, delay: Duration) {
        self.scheduled.push(delay);
    }

    fn accessibility_enabled(&self) -> bool {
        self.accessibility
    }

    fn announce(&mut self, description: &str) {
        self.announcements.push(description.to_string());
    }
}

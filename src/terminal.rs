use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use log::{debug, info};

use crate::config::Config;
use crate::gesture::{Gesture, PointerEvent, PointerKind};
use crate::graphics::Canvas;
use crate::host::Host;
use crate::math::{radians_to_degrees, Point};
use crate::widget::CompassWidget;

/// Degrees added or removed by one arrow key press
const DIRECTION_STEP: f64 = 15.0;
/// Longest wait for input, so held pointers still get long-press checks
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Paint requests collected between loop iterations
#[derive(Debug, Default)]
struct TerminalHost {
    paint_requested: bool,
    /// At most one pending animation frame
    next_frame: Option<Instant>,
    status: String,
}

impl TerminalHost {
    /// Turns a due frame into a paint request
    fn collect_due(&mut self, now: Instant) {
        if self.next_frame.is_some_and(|deadline| deadline <= now) {
            self.next_frame = None;
            self.paint_requested = true;
        }
    }

    /// Claims a pending paint. Any paint pass supersedes the pending frame,
    /// which the render reschedules if the animation is still running
    fn take_paint(&mut self) -> bool {
        if !self.paint_requested {
            return false;
        }
        self.paint_requested = false;
        self.next_frame = None;
        true
    }

    fn next_timeout(&self, now: Instant) -> Duration {
        self.next_frame.map_or(IDLE_POLL, |deadline| {
            deadline.saturating_duration_since(now).min(IDLE_POLL)
        })
    }
}

impl Host for TerminalHost {
    fn request_paint(&mut self) {
        self.paint_requested = true;
    }

    fn schedule_paint(&mut self, delay: Duration) {
        self.next_frame = Some(Instant::now() + delay);
    }

    /// The status line always shows the description
    fn accessibility_enabled(&self) -> bool {
        true
    }

    fn announce(&mut self, description: &str) {
        self.status = description.to_string();
    }
}

/// Runs the compass until the user quits
pub fn run(config: &Config, direction: f64) -> io::Result<()> {
    let (cols, rows) = canvas_size();
    info!("canvas {cols}x{rows} cells");
    let mut canvas = Canvas::new(
        cols,
        rows,
        config.viewport_width,
        config.viewport_height,
        config.glyph_width,
    );

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let result = event_loop(&mut stdout, &mut canvas, config, direction);

    execute!(stdout, ResetColor, Show, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// Grid size that keeps the rose round on cells twice as tall as wide
fn canvas_size() -> (usize, usize) {
    let (cols, rows) = termsize::get().map_or((80, 24), |size| (size.cols, size.rows));
    // Leave the last row for the status line
    let rows = usize::from(rows.saturating_sub(1).max(1));
    let cols = usize::from(cols.max(1)).min(rows * 2);
    (cols, rows)
}

fn event_loop(
    out: &mut Stdout,
    canvas: &mut Canvas,
    config: &Config,
    direction: f64,
) -> io::Result<()> {
    let mut widget = CompassWidget::new(config);
    let mut host = TerminalHost::default();
    widget.set_direction(direction, &mut host);
    info!("{}", widget.describe());

    loop {
        let now = Instant::now();
        host.collect_due(now);
        widget.poll_gestures(now, &mut host);

        if host.take_paint() {
            canvas.clear();
            widget.render(canvas, &mut host, now);
            draw(out, canvas, &host.status)?;
        }

        if !event::poll(host.next_timeout(Instant::now()))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    // Scheduled frames die with the loop
                    debug!(
                        "quit while {:?}, frame pending: {}",
                        widget.animation(),
                        host.next_frame.is_some()
                    );
                    return Ok(());
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    let degrees = current_degrees(&widget) - DIRECTION_STEP;
                    widget.set_direction(degrees, &mut host);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    let degrees = current_degrees(&widget) + DIRECTION_STEP;
                    widget.set_direction(degrees, &mut host);
                }
                KeyCode::Char('f') => {
                    widget.handle_gesture(Gesture::Fling {
                        velocity: Point::new(config.min_fling_velocity, 0.0),
                    });
                    host.request_paint();
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let kind = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
                    MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
                    MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
                    _ => continue,
                };
                let position = canvas.to_viewport(mouse.column, mouse.row);
                let event = PointerEvent::new(kind, position, Instant::now());
                if let Some(gesture) = widget.handle_pointer(event, &mut host) {
                    debug!("gesture {gesture:?}");
                }
            }
            Event::Resize(..) => host.request_paint(),
            _ => {}
        }
    }
}

fn current_degrees(widget: &CompassWidget) -> f64 {
    radians_to_degrees(widget.state().direction_radians)
}

fn draw(out: &mut Stdout, canvas: &Canvas, status: &str) -> io::Result<()> {
    for row in 0..canvas.rows() {
        queue!(out, MoveTo(0, row as u16))?;
        for cell in canvas.row(row) {
            queue!(out, SetForegroundColor(cell.color), Print(cell.glyph))?;
        }
    }
    queue!(
        out,
        MoveTo(0, canvas.rows() as u16),
        ResetColor,
        Clear(ClearType::CurrentLine),
        Print(status),
        Print("  [←/→ direction, f fling, q quit]"),
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;
    use crate::graphics::RecordingSurface;

    #[test]
    fn due_frame_becomes_paint_request() {
        let mut host = TerminalHost::default();
        let now = Instant::now();
        host.next_frame = Some(now + Duration::from_millis(30));

        host.collect_due(now);
        assert!(!host.paint_requested);
        assert_eq!(host.next_timeout(now), Duration::from_millis(30));

        host.collect_due(now + Duration::from_millis(30));
        assert!(host.paint_requested);
        assert_eq!(host.next_frame, None);
    }

    #[test]
    fn extra_repaint_keeps_single_frame_chain() {
        let mut host = TerminalHost::default();
        let mut widget = CompassWidget::new(&Config::default());
        let start = Instant::now();
        widget.handle_gesture(Gesture::Fling {
            velocity: Point::new(500.0, 0.0),
        });
        host.request_paint();

        assert!(host.take_paint());
        widget.render(&mut RecordingSurface::default(), &mut host, start);
        assert!(host.next_frame.is_some());

        // A direction update lands between two frames
        widget.set_direction(45.0, &mut host);
        assert!(host.take_paint());
        widget.render(
            &mut RecordingSurface::default(),
            &mut host,
            start + Duration::from_millis(3),
        );
        assert!(host.next_frame.is_some());

        // The paint that ends the animation leaves nothing pending
        host.request_paint();
        assert!(host.take_paint());
        widget.render(
            &mut RecordingSurface::default(),
            &mut host,
            start + Duration::from_secs(10),
        );
        assert_eq!(widget.animation(), AnimationState::Idle);
        assert_eq!(host.next_frame, None);
        assert!(!host.take_paint());
    }

    #[test]
    fn idle_host_polls_at_fixed_rate() {
        let mut host = TerminalHost::default();
        host.collect_due(Instant::now());
        assert!(!host.paint_requested);
        assert_eq!(host.next_timeout(Instant::now()), IDLE_POLL);
    }

    #[test]
    fn announcements_feed_status_line() {
        let mut host = TerminalHost::default();
        let mut widget = CompassWidget::new(&Config::default());
        widget.set_direction(180.0, &mut host);
        assert_eq!(host.status, "Wind direction 180°, S");
        assert!(host.paint_requested);
    }
}

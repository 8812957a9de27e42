//! In-world log console
//!
//! Log records reach the console through an injected [`LogSink`]. The host
//! installs a [`ConsoleLayer`] next to the normal fmt layer, so terminal
//! logging is untouched and the console only sees what the layer forwards.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// One console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:>5} {}", self.timestamp, self.level, self.message)
    }
}

/// Bounded line buffer with a clamped 2D scroll position
///
/// `offset_y` counts lines scrolled back from the newest line, `offset_x`
/// counts columns scrolled right.
#[derive(Debug, Clone)]
pub struct ConsoleBuffer {
    lines: VecDeque<ConsoleLine>,
    capacity: usize,
    visible_lines: usize,
    offset_x: f32,
    offset_y: f32,
    visible: bool,
}

impl ConsoleBuffer {
    pub fn new(capacity: usize, visible_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            visible_lines: visible_lines.max(1),
            offset_x: 0.0,
            offset_y: 0.0,
            visible: false,
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        self.lines.push_back(ConsoleLine {
            timestamp: chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
            level,
            message: message.into(),
        });
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
        self.clamp_offsets();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.lines.iter()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Scroll by columns/lines; positive `dy` moves toward newer lines
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() {
            self.offset_x += dx;
        }
        if dy.is_finite() {
            self.offset_y -= dy;
        }
        self.clamp_offsets();
    }

    pub fn offsets(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    fn max_offset_y(&self) -> f32 {
        self.lines.len().saturating_sub(self.visible_lines) as f32
    }

    fn max_offset_x(&self) -> f32 {
        self.lines
            .iter()
            .map(|line| line.to_string().chars().count())
            .max()
            .unwrap_or(0) as f32
    }

    fn clamp_offsets(&mut self) {
        self.offset_y = self.offset_y.clamp(0.0, self.max_offset_y());
        self.offset_x = self.offset_x.clamp(0.0, self.max_offset_x());
    }

    /// Lines currently in view, horizontally scrolled
    pub fn window(&self) -> Vec<String> {
        let end = self.lines.len() - (self.offset_y.floor() as usize).min(self.lines.len());
        let start = end.saturating_sub(self.visible_lines);
        let skip = self.offset_x.floor() as usize;
        self.lines
            .range(start..end)
            .map(|line| line.to_string().chars().skip(skip).collect())
            .collect()
    }
}

/// Destination for log records shown in-world
pub trait LogSink: Send + Sync {
    fn push(&self, level: Level, message: &str);
}

/// Console buffer shared between the logging layer and the frame loop
#[derive(Debug, Clone)]
pub struct SharedConsole(Arc<Mutex<ConsoleBuffer>>);

impl SharedConsole {
    pub fn new(capacity: usize, visible_lines: usize) -> Self {
        Self(Arc::new(Mutex::new(ConsoleBuffer::new(capacity, visible_lines))))
    }

    /// Never log while holding this guard: the layer locks the same buffer
    pub fn lock(&self) -> MutexGuard<'_, ConsoleBuffer> {
        self.0.lock()
    }
}

impl LogSink for SharedConsole {
    fn push(&self, level: Level, message: &str) {
        self.0.lock().push(level, message);
    }
}

/// `tracing` layer forwarding events at or above `min_level` into a sink
pub struct ConsoleLayer<K> {
    sink: K,
    min_level: Level,
}

impl<K: LogSink> ConsoleLayer<K> {
    pub fn new(sink: K, min_level: Level) -> Self {
        Self { sink, min_level }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber,
    K: LogSink + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > self.min_level {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let mut text = visitor.message;
        for field in visitor.fields {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&field);
        }
        self.sink.push(*event.metadata().level(), &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn filled(n: usize, visible: usize) -> ConsoleBuffer {
        let mut buffer = ConsoleBuffer::new(100, visible);
        for i in 0..n {
            buffer.push(Level::INFO, format!("line {}", i));
        }
        buffer
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut buffer = ConsoleBuffer::new(3, 2);
        for i in 0..5 {
            buffer.push(Level::INFO, format!("line {}", i));
        }
        let messages: Vec<&str> = buffer.lines().map(|l| l.message.as_str()).collect();
        assert_eq!(messages, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_window_shows_newest_by_default() {
        let buffer = filled(10, 3);
        let window = buffer.window();
        assert_eq!(window.len(), 3);
        assert!(window[2].ends_with("line 9"));
    }

    #[test]
    fn test_vertical_scroll_is_clamped() {
        let mut buffer = filled(10, 3);
        buffer.scroll(0.0, -100.0);
        assert_eq!(buffer.offsets().1, 7.0);
        assert!(buffer.window()[0].ends_with("line 0"));

        buffer.scroll(0.0, 2.5);
        assert_eq!(buffer.offsets().1, 4.5);
        buffer.scroll(0.0, 100.0);
        assert_eq!(buffer.offsets().1, 0.0);
    }

    #[test]
    fn test_horizontal_scroll_is_clamped() {
        let mut buffer = filled(2, 3);
        buffer.scroll(-5.0, 0.0);
        assert_eq!(buffer.offsets().0, 0.0);
        buffer.scroll(10_000.0, 0.0);
        let longest = buffer.lines().map(|l| l.to_string().chars().count()).max().unwrap();
        assert_eq!(buffer.offsets().0, longest as f32);
        assert!(buffer.window().iter().all(String::is_empty));
    }

    #[test]
    fn test_short_buffer_cannot_scroll() {
        let mut buffer = filled(2, 5);
        buffer.scroll(0.0, -3.0);
        assert_eq!(buffer.offsets().1, 0.0);
        assert_eq!(buffer.window().len(), 2);
    }

    #[test]
    fn test_layer_forwards_events() {
        let console = SharedConsole::new(10, 5);
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(console.clone(), Level::INFO));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(gallery = "Zeta", "loaded");
            tracing::debug!("hidden");
            tracing::warn!("careful");
        });

        let buffer = console.lock();
        let lines: Vec<(Level, String)> = buffer.lines().map(|l| (l.level, l.message.clone())).collect();
        assert_eq!(
            lines,
            vec![
                (Level::INFO, "loaded gallery=Zeta".to_string()),
                (Level::WARN, "careful".to_string()),
            ]
        );
    }
}

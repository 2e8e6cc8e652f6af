//! # Trace Capture
//!
//! Collects the diagnostics a step handler emits while it runs.
//!
//! Handlers log with the ordinary `tracing` macros. Each execution opens a [`CaptureScope`]
//! which installs a thread-scoped dispatcher writing into a private buffer, so two scopes on
//! different threads never see each other's events. The scope detaches when it is collected
//! or dropped, including during a panic unwind.
//!
//! Each event becomes one line: the message, then any other fields as ` key=value`.

use parking_lot::Mutex;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::config::{ConfigResult, TraceConfig};

/// Factory for capture scopes with a fixed level and forwarding policy
#[derive(Debug, Clone)]
pub struct TraceCapture {
    level: LevelFilter,
    forward_to_log: bool,
}

impl Default for TraceCapture {
    fn default() -> Self {
        Self::new(LevelFilter::TRACE, true)
    }
}

impl TraceCapture {
    pub fn new(level: LevelFilter, forward_to_log: bool) -> Self {
        Self {
            level,
            forward_to_log,
        }
    }

    pub fn from_config(config: &TraceConfig) -> ConfigResult<Self> {
        Ok(Self::new(config.level_filter()?, config.forward_to_log))
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Start capturing events emitted on the current thread
    pub fn open(&self) -> CaptureScope {
        let buffer = Arc::new(Mutex::new(String::new()));
        let subscriber = tracing_subscriber::registry().with(
            CaptureLayer {
                buffer: Arc::clone(&buffer),
            }
            .with_filter(self.level),
        );

        CaptureScope {
            buffer,
            guard: Some(tracing::subscriber::set_default(subscriber)),
            forward_to_log: self.forward_to_log,
        }
    }
}

/// An open capture window. Dropping it detaches without returning the text.
pub struct CaptureScope {
    buffer: Arc<Mutex<String>>,
    guard: Option<DefaultGuard>,
    forward_to_log: bool,
}

impl CaptureScope {
    /// Detach and return everything captured, verbatim
    pub fn collect(mut self) -> String {
        self.guard.take();
        let output = std::mem::take(&mut *self.buffer.lock());

        if self.forward_to_log && !output.is_empty() {
            tracing::debug!(output = %output.trim_end(), "Captured step output");
        }
        output
    }
}

impl fmt::Debug for CaptureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureScope")
            .field("attached", &self.guard.is_some())
            .field("captured_bytes", &self.buffer.lock().len())
            .finish()
    }
}

/// Whether a capture scope is attached to the current thread
pub fn is_capturing() -> bool {
    tracing::dispatcher::get_default(|dispatch| dispatch.downcast_ref::<CaptureLayer>().is_some())
}

struct CaptureLayer {
    buffer: Arc<Mutex<String>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        self.buffer.lock().push_str(&line.finish());
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        let mut line = self.message;
        if line.is_empty() {
            line.push_str(self.fields.trim_start());
        } else {
            line.push_str(&self.fields);
        }
        line.push('\n');
        line
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

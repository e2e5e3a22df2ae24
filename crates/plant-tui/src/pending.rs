//! Tracking for requests that are on the wire.
//!
//! A read or write is fired as a background task and the result comes back
//! later as an `AppMessage`.  While it is outstanding the UI shows a pulsing
//! indicator; once it has been out longer than `SLOW_AFTER` the indicator
//! turns into a warning so the user knows the backend is slow rather than
//! the app being stuck.
//!
//! ```text
//!  Pending (< SLOW_AFTER)   -> render pulsing
//!  Pending (>= SLOW_AFTER)  -> render with warning colour
//! ```

use std::time::{Duration, Instant};

/// Threshold after which an outstanding request is considered slow.
pub const SLOW_AFTER: Duration = Duration::from_millis(3000);

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Marks one outstanding request.
#[derive(Debug, Clone, Copy)]
pub struct Pending {
    since: Instant,
}

impl Pending {
    pub fn start() -> Self {
        Self {
            since: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.since.elapsed()
    }

    pub fn is_slow(&self) -> bool {
        self.elapsed() >= SLOW_AFTER
    }

    /// How to render the indicator right now.
    pub fn render_hint(&self) -> RenderHint {
        if self.is_slow() {
            return RenderHint::Slow;
        }
        // Pulse on/off every 400ms
        if (self.elapsed().as_millis() / 400) % 2 == 0 {
            RenderHint::PendingVisible
        } else {
            RenderHint::PendingHidden
        }
    }

    /// Spinner glyph for the current instant.
    pub fn spinner(&self) -> &'static str {
        let frame = (self.elapsed().as_millis() / 100) as usize % SPINNER_FRAMES.len();
        SPINNER_FRAMES[frame]
    }
}

/// How to render something that is waiting on the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderHint {
    /// Pending, pulse-on frame: full indicator color.
    PendingVisible,
    /// Pending, pulse-off frame: indicator dimmed.
    PendingHidden,
    /// Outstanding for longer than `SLOW_AFTER`.
    Slow,
}

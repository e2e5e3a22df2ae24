//! Toast notifications: transient status messages in the top-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
    /// Lifetime of info/success toasts; errors linger longer.
    base_duration: Duration,
}

impl ToastManager {
    pub fn new(base_duration: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 4,
            base_duration,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        // Same message again just refreshes its expiry
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, self.base_duration);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, self.base_duration);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, self.base_duration + Duration::from_secs(2));
    }

    /// Remove expired toasts. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Messages currently queued, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = (Severity, &str)> {
        self.toasts.iter().map(|t| (t.severity, t.message.as_str()))
    }

    /// Render toasts in the top-right corner of `area`, newest on top.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width * 2 / 3).clamp(30, 72).min(area.width);
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            if y >= area.y + area.height {
                break;
            }
            // Clamp in usize before narrowing; messages can exceed u16::MAX chars
            let w = toast
                .message
                .chars()
                .count()
                .saturating_add(4)
                .min(usize::from(max_width)) as u16;
            let x = area.x + area.width.saturating_sub(w + 1);

            let color = match toast.severity {
                Severity::Info => C_TOAST_INFO,
                Severity::Success => C_TOAST_SUCCESS,
                Severity::Error => C_TOAST_ERROR,
            };

            let toast_area = Rect {
                x,
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            let paragraph = Paragraph::new(Line::from(vec![Span::styled(
                format!(" {} {} ", toast.severity.icon(), &toast.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]));
            frame.render_widget(paragraph, toast_area);
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_is_replaced() {
        let mut toasts = ToastManager::new(Duration::from_secs(3));
        toasts.info("refreshing");
        toasts.info("refreshing");
        assert_eq!(toasts.messages().count(), 1);
    }

    #[test]
    fn test_expired_toasts_are_dropped() {
        let mut toasts = ToastManager::new(Duration::from_secs(3));
        toasts.push("gone", Severity::Info, Duration::ZERO);
        toasts.success("stays");
        toasts.tick();
        let left: Vec<&str> = toasts.messages().map(|(_, m)| m).collect();
        assert_eq!(left, vec!["stays"]);
    }

    #[test]
    fn test_oversized_message_is_clipped_to_area() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut toasts = ToastManager::new(Duration::from_secs(3));
        toasts.error("x".repeat(usize::from(u16::MAX) + 10));
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal.draw(|f| toasts.draw(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..40u16)
            .map(|x| buffer[(x, 1u16)].symbol().to_string())
            .collect();
        assert!(row.contains("✗ xxx"));
    }

    #[test]
    fn test_queue_is_capped() {
        let mut toasts = ToastManager::new(Duration::from_secs(3));
        for i in 0..20 {
            toasts.error(format!("e{}", i));
        }
        assert_eq!(toasts.messages().count(), 8);
    }
}

//! Keys bar: bottom line with the input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_BROWSE, C_MODE_CONFIRM, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    /// Moving between cards.
    Browse,
    /// The selected card is asking for confirmation.
    Confirm,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Browse => "PLANTS",
            Self::Confirm => "CONFIRM",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Browse => C_MODE_BROWSE,
            Self::Confirm => C_MODE_CONFIRM,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Browse => {
                " ↑↓/jk select  i info  Enter/w/c care  r refresh  K keys  ? help  q quit"
            }
            Self::Confirm => " y yes  n/Esc no  i info  ↑↓/jk select  q quit",
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

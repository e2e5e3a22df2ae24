//! Color palette and style constants for the plantcare TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::pending::RenderHint;

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 20, 16);
pub const C_ACCENT: Color = Color::Rgb(120, 200, 110);
pub const C_WATER: Color = Color::Rgb(90, 160, 230);
pub const C_CLEAN: Color = Color::Rgb(220, 190, 90);
pub const C_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_PENDING: Color = Color::Rgb(255, 184, 80);
pub const C_MUTED: Color = Color::Rgb(80, 88, 80);
pub const C_SECONDARY: Color = Color::Rgb(128, 140, 128);
pub const C_PRIMARY: Color = Color::Rgb(215, 225, 210);
pub const C_SELECTION_BG: Color = Color::Rgb(26, 34, 26);
pub const C_PANEL_BORDER: Color = Color::Rgb(44, 56, 44);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 200, 110);
pub const C_KEY_HINT: Color = Color::Rgb(100, 120, 100);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(120, 200, 110);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_BROWSE: Color = Color::Rgb(128, 140, 128);
pub const C_MODE_CONFIRM: Color = Color::Rgb(255, 184, 80);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_error() -> Style {
    Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

/// Colour that marks a plant's care type.
pub fn care_color(care_type: plant_proto::CareType) -> Color {
    match care_type {
        plant_proto::CareType::Water => C_WATER,
        plant_proto::CareType::Clean => C_CLEAN,
    }
}

/// Indicator style for an outstanding request: pulses between accent and
/// muted, then turns bold once the request is slow.
pub fn style_pending(hint: RenderHint) -> Style {
    match hint {
        RenderHint::PendingVisible => Style::default().fg(C_PENDING),
        RenderHint::PendingHidden => Style::default().fg(C_MUTED),
        RenderHint::Slow => Style::default().fg(C_PENDING).add_modifier(Modifier::BOLD),
    }
}

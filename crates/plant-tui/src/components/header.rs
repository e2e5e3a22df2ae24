//! Header component: 1-row top bar.
//!
//! Left: app title and how many plants need care (or the load state).
//! Right: refresh indicator and the backend in use.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    app_state::AppState,
    component::Component,
    loader::LoadState,
    pending::RenderHint,
    theme::{style_pending, C_ACCENT, C_ERROR, C_MUTED, C_PENDING, C_SECONDARY},
};

pub struct Header;

impl Component for Header {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Paragraph::new(build_left(state)), area);
        frame.render_widget(
            Paragraph::new(build_right(state)).alignment(Alignment::Right),
            area,
        );
    }
}

fn build_left(state: &AppState) -> Line<'static> {
    let summary = match state.loader.state() {
        LoadState::Loading => Span::styled("loading", Style::default().fg(C_PENDING)),
        LoadState::Error(_) => Span::styled("unavailable", Style::default().fg(C_ERROR)),
        LoadState::Loaded(plants) => match plants.len() {
            0 => Span::styled("nothing to do", Style::default().fg(C_SECONDARY)),
            1 => Span::styled("1 plant needs care", Style::default().fg(C_SECONDARY)),
            n => Span::styled(
                format!("{} plants need care", n),
                Style::default().fg(C_SECONDARY),
            ),
        },
    };
    Line::from(vec![
        Span::styled(
            " plantcare ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("· ", Style::default().fg(C_MUTED)),
        summary,
    ])
}

fn build_right(state: &AppState) -> Line<'static> {
    let mut spans = Vec::new();
    if state.loader.is_refreshing() {
        if let Some(pending) = state.loader.in_flight() {
            let hint = pending.render_hint();
            let label = if hint == RenderHint::Slow {
                "still refreshing"
            } else {
                "refreshing"
            };
            spans.push(Span::styled(
                format!("{} {}  ", pending.spinner(), label),
                style_pending(hint),
            ));
        }
    }
    spans.push(Span::styled(
        format!("{} ", state.backend),
        Style::default().fg(C_MUTED),
    ));
    Line::from(spans)
}

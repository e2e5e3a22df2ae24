//! PlantList component: the card list for plants that need care.
//!
//! Draws whichever state the loader is in (loading, error, or the cards).
//! Each card owns its own `CardState`; the list only tracks selection,
//! scrolling and the clickable regions from the last frame.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use plant_proto::{Plant, PlantId};

use crate::{
    action::Action,
    app_state::AppState,
    card::{CardState, CardStates, Control, WriteState},
    component::Component,
    loader::LoadState,
    pending::RenderHint,
    theme::{
        care_color, style_error, style_muted, style_pending, style_secondary, C_ACCENT, C_KEY_HINT, C_PENDING,
        C_PRIMARY, C_SELECTION_BG,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

/// Where a button landed inside a card, relative to the card's inner area.
struct Button {
    row: u16,
    x: u16,
    width: u16,
    control: Control,
}

/// A clickable region drawn in the last frame.
struct Hitbox {
    area: Rect,
    index: usize,
    target: Option<(PlantId, Control)>,
}

pub struct PlantList {
    cards: CardStates,
    selected: usize,
    /// Index of the first card drawn.
    scroll: usize,
    hitboxes: Vec<Hitbox>,
}

impl PlantList {
    pub fn new() -> Self {
        Self {
            cards: CardStates::default(),
            selected: 0,
            scroll: 0,
            hitboxes: Vec::new(),
        }
    }

    pub fn cards(&self) -> &CardStates {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut CardStates {
        &mut self.cards
    }

    pub fn selected_plant<'a>(&self, state: &'a AppState) -> Option<&'a Plant> {
        state.loader.plants().get(self.selected)
    }

    /// True when the selected card is showing its confirm prompt.
    pub fn selected_confirming(&self, state: &AppState) -> bool {
        self.selected_plant(state)
            .map(|p| self.cards.get(&p.id).confirm_visible)
            .unwrap_or(false)
    }

    fn select_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    fn select_down(&mut self, step: usize, count: usize) {
        if count > 0 {
            self.selected = (self.selected + step).min(count - 1);
        }
    }

    fn clamp_selection(&mut self, count: usize) {
        self.selected = self.selected.min(count.saturating_sub(1));
        self.scroll = self.scroll.min(self.selected);
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    fn draw_cards(&mut self, frame: &mut Frame, area: Rect, plants: &[Plant]) {
        self.clamp_selection(plants.len());
        let inner_width = area.width.saturating_sub(2) as usize;
        let heights: Vec<u16> = plants
            .iter()
            .map(|p| card_height(p, &self.cards.get(&p.id), inner_width))
            .collect();

        // Keep the selected card on screen
        while self.scroll < self.selected
            && heights[self.scroll..=self.selected].iter().sum::<u16>() > area.height
        {
            self.scroll += 1;
        }

        let mut y = area.y;
        let bottom = area.y + area.height;
        for (index, plant) in plants.iter().enumerate().skip(self.scroll) {
            if y >= bottom {
                break;
            }
            let height = heights[index].min(bottom - y);
            let card_area = Rect {
                x: area.x,
                y,
                width: area.width,
                height,
            };
            let card = self.cards.get(&plant.id);
            self.draw_card(frame, card_area, index, plant, &card);
            y += height;
        }
    }

    fn draw_card(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        index: usize,
        plant: &Plant,
        card: &CardState,
    ) {
        let focused = index == self.selected;
        let badge = Badge {
            text: plant.care_type.label(),
            color: care_color(plant.care_type),
        };
        let mut block = pane_chrome(&plant.name, focused, Some(badge));
        if focused {
            block = block.style(Style::default().bg(C_SELECTION_BG));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.hitboxes.push(Hitbox {
            area,
            index,
            target: None,
        });

        let mut lines: Vec<Line> = Vec::new();
        let mut buttons: Vec<Button> = Vec::new();

        lines.push(button_row(plant, 0, &[Control::Info, Control::Care], &mut buttons, 0));

        if card.description_visible {
            for text in wrap_text(&plant.description, inner.width.saturating_sub(2) as usize) {
                lines.push(Line::from(Span::styled(
                    format!(" {}", text),
                    Style::default().fg(C_PRIMARY),
                )));
            }
            if !plant.image_url.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!(" {}", plant.image_url),
                    style_muted(),
                )));
            }
        }

        if card.confirm_visible {
            let row = lines.len() as u16;
            let question = format!(" {}  ", plant.care_type.question());
            let mut line = button_row(
                plant,
                question.width() as u16,
                &[Control::No, Control::Yes],
                &mut buttons,
                row,
            );
            line.spans.insert(
                0,
                Span::styled(
                    question,
                    Style::default()
                        .fg(care_color(plant.care_type))
                        .add_modifier(Modifier::BOLD),
                ),
            );
            match &card.write {
                WriteState::Idle => {}
                WriteState::InFlight(pending) => {
                    let hint = pending.render_hint();
                    let label = if hint == RenderHint::Slow {
                        "still saving"
                    } else {
                        "saving"
                    };
                    line.spans.push(Span::styled(
                        format!("  {} {}", pending.spinner(), label),
                        style_pending(hint),
                    ));
                }
                WriteState::Failed(reason) => {
                    line.spans
                        .push(Span::styled(format!("  ✗ {}", reason), style_error()));
                }
            }
            lines.push(line);
        }

        for button in &buttons {
            if button.row >= inner.height || button.x >= inner.width {
                continue;
            }
            self.hitboxes.push(Hitbox {
                area: Rect {
                    x: inner.x + button.x,
                    y: inner.y + button.row,
                    width: button.width.min(inner.width - button.x),
                    height: 1,
                },
                index,
                target: Some((plant.id.clone(), button.control)),
            });
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for PlantList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PlantList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let count = state.loader.plants().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_up(1);
                return vec![];
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_down(1, count);
                return vec![];
            }
            KeyCode::PageUp => {
                self.select_up(5);
                return vec![];
            }
            KeyCode::PageDown => {
                self.select_down(5, count);
                return vec![];
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                return vec![];
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = count.saturating_sub(1);
                return vec![];
            }
            _ => {}
        }

        let Some(plant) = self.selected_plant(state) else {
            return vec![];
        };
        let control = match key.code {
            KeyCode::Char('i') => Control::Info,
            KeyCode::Enter => Control::Care,
            KeyCode::Char(c) if c == plant.care_type.hotkey() => Control::Care,
            KeyCode::Char('y') => Control::Yes,
            KeyCode::Char('n') | KeyCode::Esc => Control::No,
            _ => return vec![],
        };
        vec![Action::Activate(plant.id.clone(), control)]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let count = state.loader.plants().len();
        match event.kind {
            MouseEventKind::ScrollUp => self.select_up(1),
            MouseEventKind::ScrollDown => self.select_down(1, count),
            MouseEventKind::Down(MouseButton::Left) => {
                // Buttons are pushed after their card, so search from the end
                let hit = self
                    .hitboxes
                    .iter()
                    .rev()
                    .find(|h| contains(h.area, event.column, event.row));
                if let Some(hit) = hit {
                    self.selected = hit.index;
                    if let Some((id, control)) = &hit.target {
                        return vec![Action::Activate(id.clone(), *control)];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::Activate(id, control) => match state.loader.plant(id) {
                Some(plant) => self.cards.get_mut(id).activate(plant, *control),
                None => {
                    debug!("plant list: {} is no longer listed", id);
                    vec![]
                }
            },
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.hitboxes.clear();
        match state.loader.state() {
            LoadState::Loading => {
                let spinner = state.loader.in_flight().map(|p| p.spinner()).unwrap_or(" ");
                draw_centered(
                    frame,
                    area,
                    vec![Line::from(Span::styled(
                        format!("{} Loading...", spinner),
                        Style::default().fg(C_PENDING),
                    ))],
                );
            }
            LoadState::Error(message) => {
                draw_centered(
                    frame,
                    area,
                    vec![
                        Line::from(Span::styled(format!("Error: {}", message), style_error())),
                        Line::from(Span::styled(
                            "press r to try again",
                            Style::default().fg(C_KEY_HINT),
                        )),
                    ],
                );
            }
            LoadState::Loaded(plants) if plants.is_empty() => {
                self.clamp_selection(0);
                draw_centered(
                    frame,
                    area,
                    vec![Line::from(Span::styled(
                        "All plants are cared for.",
                        Style::default().fg(C_ACCENT),
                    ))],
                );
            }
            LoadState::Loaded(plants) => self.draw_cards(frame, area, plants),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One row of buttons, each recorded with its row and column.
fn button_row(
    plant: &Plant,
    start: u16,
    controls: &[Control],
    buttons: &mut Vec<Button>,
    row: u16,
) -> Line<'static> {
    let mut spans = Vec::new();
    let mut x = start;
    for control in controls {
        spans.push(Span::raw(" "));
        x += 1;
        let text = button_text(plant, *control);
        let width = text.width() as u16;
        buttons.push(Button {
            row,
            x,
            width,
            control: *control,
        });
        let style = match control {
            Control::Care => Style::default()
                .fg(care_color(plant.care_type))
                .add_modifier(Modifier::BOLD),
            Control::Yes => Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            Control::Info | Control::No => style_secondary(),
        };
        spans.push(Span::styled(text, style));
        x += width;
        spans.push(Span::raw(" "));
        x += 1;
    }
    Line::from(spans)
}

fn button_text(plant: &Plant, control: Control) -> String {
    format!("[{}] {}", control.hotkey(plant), control.label(plant))
}

fn card_height(plant: &Plant, card: &CardState, inner_width: usize) -> u16 {
    let mut rows = 1;
    if card.description_visible {
        rows += wrap_text(&plant.description, inner_width.saturating_sub(2)).len();
        if !plant.image_url.is_empty() {
            rows += 1;
        }
    }
    if card.confirm_visible {
        rows += 1;
    }
    rows as u16 + 2
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

fn draw_centered(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let target = Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height: area.height - top,
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

/// Greedy word wrap by display width. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut rest = word.to_string();
        while !rest.is_empty() {
            let sep = usize::from(!current.is_empty());
            if current.width() + sep + rest.width() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(&rest);
                rest.clear();
            } else if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            } else {
                let (head, tail) = split_at_width(&rest, width);
                lines.push(head);
                rest = tail;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split off the longest prefix that fits in `width` columns (at least one char).
fn split_at_width(s: &str, width: usize) -> (String, String) {
    let mut head = String::new();
    let mut used = 0;
    let mut split = s.len();
    for (i, ch) in s.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width && !head.is_empty() {
            split = i;
            break;
        }
        head.push(ch);
        used += w;
    }
    (head, s[split..].to_string())
}

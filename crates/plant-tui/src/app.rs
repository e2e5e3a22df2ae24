//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks:
//!   the terminal reader, plant list reads and care writes.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use plant_proto::config::Config;
use plant_proto::{CareLog, CareType, Plant, PlantApi, PlantId};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    components::{header::Header, help_overlay::HelpOverlay, plant_list::PlantList},
    loader::LoadState,
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    /// A plant list read finished.
    PlantsLoaded {
        generation: u64,
        result: Result<Vec<Plant>, String>,
    },
    /// A care write finished.
    CareFinished {
        plant_id: PlantId,
        care_type: CareType,
        result: Result<CareLog, String>,
    },
}

pub struct App {
    api: Arc<dyn PlantApi>,
    state: AppState,
    tx: mpsc::Sender<AppMessage>,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    plant_list: PlantList,
    help_overlay: HelpOverlay,

    // ── UI ────────────────────────────────────────────────────────────────────
    toast: ToastManager,
    show_keys_bar: bool,
    /// Where the plant list was drawn last frame, for mouse routing.
    list_area: Rect,
    mounted: bool,
    should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn PlantApi>, config: &Config) -> (Self, mpsc::Receiver<AppMessage>) {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        let backend = api.describe();
        let app = Self {
            api,
            state: AppState::new(backend, config.ui.refresh),
            tx,
            header: Header,
            plant_list: PlantList::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(Duration::from_secs(config.ui.toast_secs)),
            show_keys_bar: config.ui.show_keys_bar,
            list_area: Rect::default(),
            mounted: false,
            should_quit: false,
        };
        (app, rx)
    }

    /// Issue the initial read. Only the first call has any effect.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        info!("mounting against {}", self.state.backend);
        if let Some(generation) = self.state.loader.begin() {
            self.spawn_read(generation);
        }
    }

    pub async fn run(mut self, mut rx: mpsc::Receiver<AppMessage>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, &mut rx).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("plantcare exiting");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        rx: &mut mpsc::Receiver<AppMessage>,
    ) -> anyhow::Result<()> {
        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        self.mount();

        // Toast expiry + spinner animation
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    let mut redraw = self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        redraw |= self.handle_message(next);
                    }
                    needs_redraw = redraw;
                }

                _ = ui_tick.tick() => {
                    self.toast.tick();
                    needs_redraw = self.is_animating() || !self.toast.is_empty();
                }
            }
        }
        Ok(())
    }

    /// True while something on screen is spinning.
    fn is_animating(&self) -> bool {
        self.state.loader.in_flight().is_some()
            || self
                .state
                .loader
                .plants()
                .iter()
                .any(|p| self.plant_list.cards().get(&p.id).is_writing())
    }

    // ── Background requests ───────────────────────────────────────────────────

    fn spawn_read(&self, generation: u64) {
        debug!("spawning plant list read (generation {})", generation);
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.plants_to_care().await.map_err(|e| e.to_string());
            let _ = tx
                .send(AppMessage::PlantsLoaded { generation, result })
                .await;
        });
    }

    fn spawn_care(&self, plant_id: PlantId, care_type: CareType) {
        info!("care request: {} {}", care_type.label(), plant_id);
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api
                .care(&plant_id, care_type)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(AppMessage::CareFinished {
                    plant_id,
                    care_type,
                    result,
                })
                .await;
        });
    }

    // ── Messages ──────────────────────────────────────────────────────────────

    /// Apply one message. Returns whether a redraw is needed.
    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        let redraw = match msg {
            AppMessage::Event(Event::Key(key)) => {
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for action in self.handle_mouse(mouse) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,
            AppMessage::PlantsLoaded { generation, result } => {
                self.on_plants_loaded(generation, result);
                true
            }
            AppMessage::CareFinished {
                plant_id,
                care_type,
                result,
            } => {
                self.on_care_finished(plant_id, care_type, result);
                true
            }
        };
        self.sync_input_mode();
        redraw
    }

    fn on_plants_loaded(&mut self, generation: u64, result: Result<Vec<Plant>, String>) {
        let follow_up = self.state.loader.finish(generation, result);
        if let LoadState::Loaded(plants) = self.state.loader.state() {
            self.plant_list.cards_mut().retain_plants(plants);
        }
        if follow_up {
            if let Some(generation) = self.state.loader.begin() {
                self.spawn_read(generation);
            }
        }
    }

    fn on_care_finished(
        &mut self,
        plant_id: PlantId,
        care_type: CareType,
        result: Result<CareLog, String>,
    ) {
        let name = self
            .state
            .loader
            .plant(&plant_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("plant {}", plant_id));

        match result {
            Ok(log) => {
                info!(
                    "{} {} on {}, next {}",
                    name,
                    care_type.past_tense(),
                    log.performed_on,
                    log.next_suggested
                );
                self.plant_list.cards_mut().remove(&plant_id);
                if let Some(generation) = self.state.loader.after_care(&plant_id) {
                    self.spawn_read(generation);
                }
                self.toast.success(format!(
                    "{} {} · next {}",
                    name,
                    care_type.past_tense(),
                    log.next_suggested
                ));
            }
            Err(e) => {
                warn!("could not {} {}: {}", care_type.label(), name, e);
                // The list may be loading or in error; the card keeps its state either way
                if let Some(card) = self.plant_list.cards_mut().get_existing_mut(&plant_id) {
                    card.write_failed(e.clone());
                }
                self.toast
                    .error(format!("could not {} {}: {}", care_type.label(), name, e));
            }
        }
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.plant_list.selected_confirming(&self.state) {
            InputMode::Confirm
        } else {
            InputMode::Browse
        };
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Char('?') => vec![Action::ToggleHelp],
            KeyCode::Char('r') => vec![Action::Refresh],
            KeyCode::Char('K') => vec![Action::ToggleKeys],
            _ => self.plant_list.handle_key(key, &self.state),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.help_overlay.visible {
            return vec![];
        }
        let area = self.list_area;
        let inside = event.column >= area.x
            && event.column < area.x + area.width
            && event.row >= area.y
            && event.row < area.y + area.height;
        if !inside {
            return vec![];
        }
        self.plant_list.handle_mouse(event, area, &self.state)
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    pub fn dispatch(&mut self, action: Action) {
        // Broadcast action to all components first
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.header.on_action(&action, s));
            out.extend(self.plant_list.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions are applied at the app level only
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        if action != Action::Noop {
            debug!("apply_action: {:?}", action);
        }
        match action {
            Action::Care {
                plant_id,
                care_type,
            } => self.spawn_care(plant_id, care_type),
            Action::Refresh => match self.state.loader.begin() {
                Some(generation) => self.spawn_read(generation),
                None => self.toast.info("refresh queued"),
            },
            Action::ToggleKeys => self.show_keys_bar = !self.show_keys_bar,
            Action::Quit => self.should_quit = true,
            // Handled by components
            Action::Activate(..) | Action::ToggleHelp | Action::Noop => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let status_h = if self.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(status_h),
            ])
            .split(area);

        self.header.draw(frame, outer[0], &self.state);
        self.list_area = outer[1];
        self.plant_list.draw(frame, outer[1], &self.state);
        if self.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[2], self.state.input_mode);
        }

        // Overlays last
        self.help_overlay.draw(frame, area, &self.state);
        self.toast.draw(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plant_proto::config::RefreshStrategy;
    use plant_proto::MemoryApi;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::{MouseButton, MouseEvent};

    fn plant(id: &str, name: &str, description: &str, care_type: CareType) -> Plant {
        Plant {
            id: PlantId::new(id),
            name: name.to_string(),
            image_url: format!("https://examples.com/{}.png", id),
            description: description.to_string(),
            care_type,
        }
    }

    fn pancake() -> Plant {
        plant(
            "1",
            "Pancake plant",
            "A plant that grows pancakes every morning",
            CareType::Water,
        )
    }

    fn ufo() -> Plant {
        plant("2", "UFO plant", "A plant that summons aliens", CareType::Clean)
    }

    fn config(refresh: RefreshStrategy) -> Config {
        let mut config = Config::default();
        config.ui.refresh = refresh;
        config
    }

    fn build(api: &Arc<MemoryApi>, refresh: RefreshStrategy) -> (App, mpsc::Receiver<AppMessage>) {
        let api: Arc<dyn PlantApi> = api.clone();
        App::new(api, &config(refresh))
    }

    /// Mounted app with the initial read applied.
    async fn loaded(
        api: &Arc<MemoryApi>,
        refresh: RefreshStrategy,
    ) -> (App, mpsc::Receiver<AppMessage>) {
        let (mut app, mut rx) = build(api, refresh);
        app.mount();
        pump(&mut app, &mut rx, 1).await;
        (app, rx)
    }

    async fn pump(app: &mut App, rx: &mut mpsc::Receiver<AppMessage>, n: usize) {
        for _ in 0..n {
            let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timed out waiting for a message")
                .expect("channel closed");
            app.handle_message(msg);
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_message(AppMessage::Event(Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        ))));
    }

    fn render(app: &mut App) -> Vec<String> {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn screen(app: &mut App) -> String {
        render(app).join("\n")
    }

    /// Cell position of the first occurrence of `needle`.
    fn find_cell(rows: &[String], needle: &str) -> Option<(u16, u16)> {
        rows.iter().enumerate().find_map(|(y, row)| {
            row.find(needle)
                .map(|byte| (row[..byte].chars().count() as u16, y as u16))
        })
    }

    fn card_names(app: &App) -> Vec<String> {
        app.state
            .loader
            .plants()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn plants_loaded(generation: u64, result: Result<Vec<Plant>, String>) -> AppMessage {
        AppMessage::PlantsLoaded { generation, result }
    }

    fn care_finished(id: &str, care_type: CareType, ok: bool) -> AppMessage {
        let today = NaiveDate::from_ymd_opt(2021, 10, 22).unwrap();
        let result = if ok {
            Ok(CareLog {
                plant_id: PlantId::new(id),
                care_type,
                performed_on: today,
                next_suggested: NaiveDate::from_ymd_opt(2021, 10, 29).unwrap(),
            })
        } else {
            Err("backend down".to_string())
        };
        AppMessage::CareFinished {
            plant_id: PlantId::new(id),
            care_type,
            result,
        }
    }

    #[tokio::test]
    async fn test_loading_indicator_before_read_resolves() {
        let api = Arc::new(
            MemoryApi::new(vec![pancake(), ufo()]).with_latency(Duration::from_millis(200)),
        );
        let (mut app, mut rx) = build(&api, RefreshStrategy::Refetch);
        app.mount();

        let text = screen(&mut app);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("Pancake plant"));

        pump(&mut app, &mut rx, 1).await;
        let text = screen(&mut app);
        assert!(!text.contains("Loading..."));
        assert!(text.contains("Pancake plant"));
    }

    #[tokio::test]
    async fn test_mount_reads_once() {
        let api = Arc::new(MemoryApi::new(vec![pancake()]));
        let (mut app, mut rx) = build(&api, RefreshStrategy::Refetch);
        app.mount();
        app.mount();
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(api.load_calls(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_read_shows_error_only() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        api.fail_next_loads(1);
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        let text = screen(&mut app);
        assert!(text.contains("Error: An error occured"));
        assert!(!text.contains("Loading..."));
        assert!(!text.contains("Pancake plant"));
        assert!(!text.contains("UFO plant"));
    }

    #[tokio::test]
    async fn test_refresh_recovers_from_error() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        api.fail_next_loads(1);
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('r'));
        assert!(screen(&mut app).contains("Loading..."));
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(card_names(&app), vec!["Pancake plant", "UFO plant"]);
        assert!(!screen(&mut app).contains("Error"));
    }

    #[tokio::test]
    async fn test_loaded_cards_follow_response_order() {
        let third = plant("3", "Monstera", "Big leaves", CareType::Clean);
        let api = Arc::new(MemoryApi::new(vec![ufo(), third, pancake()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        let rows = render(&mut app);
        let ufo_row = find_cell(&rows, "UFO plant").unwrap().1;
        let monstera_row = find_cell(&rows, "Monstera").unwrap().1;
        let pancake_row = find_cell(&rows, "Pancake plant").unwrap().1;
        assert!(ufo_row < monstera_row && monstera_row < pancake_row);
        assert_eq!(app.state.loader.plants().len(), 3);
    }

    #[tokio::test]
    async fn test_info_toggles_only_its_own_card() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('i'));
        let text = screen(&mut app);
        assert!(text.contains("A plant that grows pancakes every morning"));
        assert!(!text.contains("A plant that summons aliens"));

        press(&mut app, KeyCode::Char('i'));
        let text = screen(&mut app);
        assert!(!text.contains("A plant that grows pancakes every morning"));
        assert!(api.care_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_care_control_shows_matching_question() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('w'));
        let text = screen(&mut app);
        assert!(text.contains("Watered?"));
        assert!(text.contains("[n] No"));
        assert!(text.contains("[y] Yes"));
        assert_eq!(app.state.input_mode, InputMode::Confirm);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert!(screen(&mut app).contains("Cleaned?"));
    }

    #[tokio::test]
    async fn test_other_care_key_does_not_open_prompt() {
        let api = Arc::new(MemoryApi::new(vec![pancake()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('c'));
        assert!(!screen(&mut app).contains("Watered?"));
    }

    #[tokio::test]
    async fn test_decline_hides_prompt_and_keeps_plant() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        let text = screen(&mut app);
        assert!(!text.contains("Watered?"));
        assert!(!text.contains("[n] No"));
        assert!(!text.contains("[y] Yes"));
        assert!(text.contains("Pancake plant"));
        assert!(api.care_calls().await.is_empty());
        assert_eq!(app.state.input_mode, InputMode::Browse);
    }

    #[tokio::test]
    async fn test_confirm_removes_only_that_plant() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));

        // write, then the refetch
        pump(&mut app, &mut rx, 2).await;

        assert_eq!(
            api.care_calls().await,
            vec![(PlantId::new("1"), CareType::Water)]
        );
        assert_eq!(card_names(&app), vec!["UFO plant"]);
        let text = screen(&mut app);
        assert!(!text.contains("Pancake plant"));
        assert!(text.contains("UFO plant"));
        assert_eq!(api.load_calls(), 2);
    }

    #[tokio::test]
    async fn test_clean_plant_uses_clean_write() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('y'));
        pump(&mut app, &mut rx, 2).await;

        assert_eq!(
            api.care_calls().await,
            vec![(PlantId::new("2"), CareType::Clean)]
        );
        assert_eq!(card_names(&app), vec!["Pancake plant"]);
    }

    #[tokio::test]
    async fn test_success_toast_names_next_date() {
        let today = NaiveDate::from_ymd_opt(2021, 10, 22).unwrap();
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]).with_today(today));
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Local).await;

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        pump(&mut app, &mut rx, 1).await;

        let messages: Vec<&str> = app.toast.messages().map(|(_, m)| m).collect();
        assert_eq!(messages, vec!["Pancake plant watered · next 2021-10-29"]);
        assert!(screen(&mut app).contains("Pancake plant watered · next 2021-10-29"));
    }

    #[tokio::test]
    async fn test_local_strategy_skips_refetch() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Local).await;

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(card_names(&app), vec!["UFO plant"]);
        assert_eq!(api.load_calls(), 1);
        assert!(app.state.loader.in_flight().is_none());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_prompt_and_allows_retry() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        api.fail_care_for(PlantId::new("1")).await;
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        pump(&mut app, &mut rx, 1).await;

        let text = screen(&mut app);
        assert!(text.contains("Pancake plant"));
        assert!(text.contains("Watered?"));
        assert!(text.contains("could not record care for plant 1"));
        assert!(app
            .toast
            .messages()
            .any(|(_, m)| m.starts_with("could not water Pancake plant")));

        api.heal_care(&PlantId::new("1")).await;
        press(&mut app, KeyCode::Char('y'));
        pump(&mut app, &mut rx, 2).await;
        assert_eq!(card_names(&app), vec!["UFO plant"]);
    }

    #[tokio::test]
    async fn test_repeat_confirm_while_writing_is_ignored() {
        let api = Arc::new(
            MemoryApi::new(vec![pancake(), ufo()]).with_latency(Duration::from_millis(50)),
        );
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Local).await;

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('n'));
        assert!(screen(&mut app).contains("saving"));

        pump(&mut app, &mut rx, 1).await;
        assert_eq!(api.care_calls().await.len(), 1);
        assert_eq!(card_names(&app), vec!["UFO plant"]);
    }

    #[tokio::test]
    async fn test_concurrent_confirms_keep_a_single_read_outstanding() {
        let third = plant("3", "Monstera", "Big leaves", CareType::Clean);
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo(), third]));
        let (mut app, mut rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('y'));

        // two writes, the refetch, and the queued follow-up
        pump(&mut app, &mut rx, 4).await;

        assert_eq!(card_names(&app), vec!["Monstera"]);
        assert_eq!(api.load_calls(), 3);
        assert!(app.state.loader.in_flight().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refresh_during_read_is_queued() {
        let api = Arc::new(MemoryApi::new(vec![pancake()]));
        let (mut app, mut rx) = build(&api, RefreshStrategy::Refetch);
        app.mount();
        press(&mut app, KeyCode::Char('r'));

        pump(&mut app, &mut rx, 2).await;
        assert_eq!(api.load_calls(), 2);
        assert!(app.state.loader.in_flight().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_mouse_click_on_info_label() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        let rows = render(&mut app);
        let (column, row) = find_cell(&rows, "[i] info").unwrap();
        app.handle_message(AppMessage::Event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })));

        assert!(app.plant_list.cards().get(&PlantId::new("1")).description_visible);
        assert!(screen(&mut app).contains("A plant that grows pancakes every morning"));
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let api = Arc::new(MemoryApi::new(vec![pancake()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        press(&mut app, KeyCode::Char('?'));
        assert!(screen(&mut app).contains("keyboard shortcuts"));

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        let text = screen(&mut app);
        assert!(!text.contains("keyboard shortcuts"));
        assert!(!text.contains("Watered?"));
    }

    #[tokio::test]
    async fn test_keys_bar_toggle_and_quit() {
        let api = Arc::new(MemoryApi::new(vec![pancake()]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;

        assert!(screen(&mut app).contains("PLANTS"));
        press(&mut app, KeyCode::Char('K'));
        assert!(!screen(&mut app).contains("PLANTS"));

        app.handle_message(AppMessage::Event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        ))));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_empty_list_message() {
        let api = Arc::new(MemoryApi::new(vec![]));
        let (mut app, _rx) = loaded(&api, RefreshStrategy::Refetch).await;
        assert!(screen(&mut app).contains("All plants are cared for."));
    }

    // Messages below are injected by hand so reads and writes can resolve in
    // any order; the spawned requests' own replies are never pumped.

    #[tokio::test]
    async fn test_read_issued_before_care_does_not_bring_plant_back() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, _rx) = build(&api, RefreshStrategy::Refetch);
        app.mount();
        app.handle_message(plants_loaded(1, Ok(vec![pancake(), ufo()])));

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('r'));

        app.handle_message(care_finished("1", CareType::Water, true));
        assert_eq!(card_names(&app), vec!["UFO plant"]);

        // The refresh went out before the write landed and still lists the plant
        app.handle_message(plants_loaded(2, Ok(vec![pancake(), ufo()])));
        assert_eq!(card_names(&app), vec!["UFO plant"]);
        assert!(!screen(&mut app).contains("[w] water"));

        // Queued follow-up read is on its way
        assert!(app.state.loader.in_flight().is_some());
        app.handle_message(plants_loaded(3, Ok(vec![ufo()])));
        assert_eq!(card_names(&app), vec!["UFO plant"]);
    }

    #[tokio::test]
    async fn test_refetch_racing_second_write_keeps_both_removed() {
        let third = plant("3", "Monstera", "Big leaves", CareType::Clean);
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo(), third.clone()]));
        let (mut app, _rx) = build(&api, RefreshStrategy::Refetch);
        app.mount();
        app.handle_message(plants_loaded(
            1,
            Ok(vec![pancake(), ufo(), third.clone()]),
        ));

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('y'));

        app.handle_message(care_finished("1", CareType::Water, true));
        app.handle_message(care_finished("2", CareType::Clean, true));
        // Refetch after the first write, read before the second one landed
        app.handle_message(plants_loaded(2, Ok(vec![ufo(), third.clone()])));

        assert_eq!(card_names(&app), vec!["Monstera"]);
        assert!(app.state.loader.in_flight().is_some());
    }

    #[tokio::test]
    async fn test_write_failing_during_read_error_releases_card() {
        let api = Arc::new(MemoryApi::new(vec![pancake(), ufo()]));
        let (mut app, _rx) = build(&api, RefreshStrategy::Refetch);
        app.mount();
        app.handle_message(plants_loaded(1, Ok(vec![pancake(), ufo()])));

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Char('r'));
        app.handle_message(plants_loaded(2, Err("An error occured".to_string())));
        assert!(screen(&mut app).contains("Error: An error occured"));

        app.handle_message(care_finished("1", CareType::Water, false));
        press(&mut app, KeyCode::Char('r'));
        app.handle_message(plants_loaded(3, Ok(vec![pancake(), ufo()])));

        let id = PlantId::new("1");
        assert!(!app.plant_list.cards().get(&id).is_writing());
        let text = screen(&mut app);
        assert!(text.contains("Watered?"));
        assert!(text.contains("✗ backend down"));
        assert!(!text.contains("saving"));

        press(&mut app, KeyCode::Char('n'));
        assert!(!screen(&mut app).contains("Watered?"));

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.plant_list.cards().get(&id).is_writing());
    }
}

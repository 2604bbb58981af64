use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use crate::config::Config;
use crate::router::Route;
use crate::screens::{DetailScreen, Dispatcher, ListScreen};
use crate::theme::ColorScheme;
use crate::types::AppEvent;
use crate::worker::Request;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Knobs the App needs from the resolved configuration.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub fps: u32,
    pub fps_choices: Vec<u32>,
    pub page_size: u32,
    pub eager_detail_limit: usize,
    pub default_search: String,
    pub generation_enabled: bool,
    pub speech_language: String,
    pub colors: ColorScheme,
}

impl AppSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            fps: cfg.render_fps,
            fps_choices: vec![20, 30, 60],
            page_size: cfg.page_size,
            eager_detail_limit: cfg.eager_detail_limit,
            default_search: cfg.default_search.clone(),
            generation_enabled: cfg.gemini_api_key.is_some(),
            speech_language: cfg.speech_language.clone(),
            colors: cfg.theme.colors(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            fps_choices: vec![20, 30, 60],
            page_size: 100,
            eager_detail_limit: 20,
            default_search: "Goku".to_string(),
            generation_enabled: false,
            speech_language: "es-ES".to_string(),
            colors: ColorScheme::default(),
        }
    }
}

const SPINNER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

pub struct App {
    quit: bool,
    route: Route,
    list: ListScreen,
    detail: Option<DetailScreen>,
    dispatcher: Dispatcher,
    input_mode: InputMode,

    fps: u32,
    fps_choices: Vec<u32>,
    colors: ColorScheme,
    generation_enabled: bool,
    speech_language: String,

    spinner_frame: usize,

    // Debug log (Ctrl+D)
    debug_log: Vec<String>,
    debug_visible: bool,

    toast_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(settings: AppSettings, requests: UnboundedSender<Request>) -> Self {
        let list = ListScreen::new(
            &settings.default_search,
            settings.page_size,
            settings.eager_detail_limit,
        );
        Self {
            quit: false,
            route: Route::List,
            list,
            detail: None,
            dispatcher: Dispatcher::new(requests),
            input_mode: InputMode::Normal,
            fps: settings.fps,
            fps_choices: settings.fps_choices,
            colors: settings.colors,
            generation_enabled: settings.generation_enabled,
            speech_language: settings.speech_language,
            spinner_frame: 0,
            debug_log: Vec::new(),
            debug_visible: false,
            toast_message: None,
        }
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 {
        self.fps
    }
    pub fn quit_flag(&self) -> bool {
        self.quit
    }
    pub fn route(&self) -> &Route {
        &self.route
    }
    pub fn list(&self) -> &ListScreen {
        &self.list
    }
    pub fn detail(&self) -> Option<&DetailScreen> {
        self.detail.as_ref()
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }
    pub fn debug_log(&self) -> &[String] {
        &self.debug_log
    }
    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    /// Show a toast notification for 2 seconds
    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    pub fn toast_message(&self) -> Option<&str> {
        const TOAST_DURATION: Duration = Duration::from_secs(2);
        self.toast_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < TOAST_DURATION {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    // ----- knobs -----
    pub fn cycle_fps(&mut self) {
        if self.fps_choices.is_empty() {
            return;
        }
        let idx = self
            .fps_choices
            .iter()
            .position(|&v| v == self.fps)
            .map_or(0, |i| (i + 1) % self.fps_choices.len());
        self.fps = self.fps_choices[idx];
        self.show_toast(format!("{} fps", self.fps));
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.spinner_frame]
    }

    /// Append to the in-memory debug panel and mirror to the log file.
    pub fn log_debug(&mut self, msg: String) {
        const MAX_LOG_ENTRIES: usize = 50;
        log::debug!("{msg}");
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        self.debug_log.push(format!("[{timestamp}] {msg}"));
        if self.debug_log.len() > MAX_LOG_ENTRIES {
            self.debug_log.remove(0);
        }
    }

    pub fn toggle_debug_panel(&mut self) {
        self.debug_visible = !self.debug_visible;
        self.log_debug(format!(
            "Debug panel: {}",
            if self.debug_visible { "visible" } else { "hidden" }
        ));
    }

    // ----- navigation -----
    pub fn navigate(&mut self, route: Route) {
        self.log_debug(format!("navigate {} -> {}", self.route.path(), route.path()));
        match route {
            Route::List => {
                self.unmount_detail();
                self.input_mode = InputMode::Normal;
                self.list.mount(&mut self.dispatcher);
            }
            Route::Character { id } => {
                let same = self.detail.as_ref().is_some_and(|d| d.id() == id);
                if !same {
                    self.unmount_detail();
                    self.detail = Some(DetailScreen::new(
                        id,
                        self.generation_enabled,
                        &self.speech_language,
                    ));
                }
                self.input_mode = InputMode::Normal;
                if let Some(d) = self.detail.as_mut() {
                    d.mount(&mut self.dispatcher);
                }
            }
        }
        self.route = route;
    }

    /// Detail back to the list; no-op on the list itself.
    pub fn back(&mut self) {
        if matches!(self.route, Route::Character { .. }) {
            self.navigate(Route::List);
        }
    }

    pub fn open_selected(&mut self) {
        if self.route != Route::List {
            return;
        }
        if let Some(id) = self.list.selected_id() {
            self.navigate(Route::Character { id });
        }
    }

    pub fn quit(&mut self) {
        self.unmount_detail();
        self.list.cancel();
        self.quit = true;
    }

    fn unmount_detail(&mut self) {
        if let Some(mut d) = self.detail.take() {
            d.unmount();
        }
    }

    // ----- list actions -----
    pub fn start_search_input(&mut self) {
        if self.route == Route::List {
            self.input_mode = InputMode::Search;
        }
    }

    pub fn cancel_search_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn search_add_char(&mut self, c: char) {
        self.list.push_char(c);
    }

    pub fn search_backspace(&mut self) {
        self.list.backspace();
    }

    pub fn search_clear(&mut self) {
        self.list.clear_query();
    }

    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        if !self.list.submit_search(&mut self.dispatcher) {
            self.show_toast("Type a name to search".to_string());
        }
    }

    pub fn up(&mut self) {
        if self.route == Route::List {
            self.list.select_up();
        }
    }

    pub fn down(&mut self) {
        if self.route == Route::List {
            self.list.select_down();
        }
    }

    pub fn left(&mut self) {
        match self.detail.as_mut() {
            Some(d) if self.route != Route::List => d.prev_form(),
            _ => self.list.card_prev_form(),
        }
    }

    pub fn right(&mut self) {
        match self.detail.as_mut() {
            Some(d) if self.route != Route::List => d.next_form(),
            _ => self.list.card_next_form(),
        }
    }

    // ----- detail actions -----
    pub fn reload(&mut self) {
        match (&self.route, self.detail.as_mut()) {
            (Route::Character { .. }, Some(d)) => d.reload(&mut self.dispatcher),
            _ => {
                self.list.submit_search(&mut self.dispatcher);
            }
        }
    }

    pub fn generate_description(&mut self) {
        if let Some(d) = self.detail.as_mut() {
            if !d.request_generation(&mut self.dispatcher) && d.is_generating() {
                self.show_toast("Already generating…".to_string());
            }
        }
    }

    pub fn toggle_speech(&mut self) {
        let Some(d) = self.detail.as_mut() else {
            return;
        };
        if d.description().is_none() && !d.speech_pending() {
            self.show_toast("Generate a description first".to_string());
            return;
        }
        d.toggle_speech(&mut self.dispatcher);
    }

    // ----- events -----
    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Quit => self.quit(),
            AppEvent::SearchFinished { ticket, result } => {
                let count = result.as_ref().map(|h| h.len()).ok();
                if self.list.on_search_finished(ticket, result) {
                    self.log_debug(format!("search #{ticket} settled, hits={count:?}"));
                }
            }
            AppEvent::CharacterLoaded { ticket, result } => {
                if let Some(d) = self.detail.as_mut() {
                    d.on_character_loaded(ticket, result);
                }
            }
            AppEvent::DescriptionGenerated { ticket, result } => {
                let applied = self
                    .detail
                    .as_mut()
                    .is_some_and(|d| d.on_description(ticket, result));
                if applied {
                    self.log_debug(format!("description #{ticket} settled"));
                }
            }
            AppEvent::SpeechStarted { ticket } => {
                if let Some(d) = self.detail.as_mut() {
                    d.on_speech_started(ticket);
                }
            }
            AppEvent::SpeechFinished { ticket, result } => {
                let applied = self
                    .detail
                    .as_mut()
                    .is_some_and(|d| d.on_speech_finished(ticket, result));
                if !applied {
                    log::debug!("[app] ignoring speech event #{ticket}");
                }
            }
        }
    }
}

// app state for the tui

use crate::Rating;
use crate::tui::theme::{Theme, ThemeKind, detect_theme};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Video,
    Resolvers,
    Question,
    Response,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Themes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Single line text field. `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default)]
pub struct Input {
    pub text: String,
    pub cursor: usize,
}

impl Input {
    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.text.remove(at);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index();
            self.text.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn start(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, text: String) {
        self.text = text;
        self.cursor = self.len();
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub panel: Panel,
    pub popup: Popup,
    pub theme_kind: ThemeKind,
    pub theme: Theme,

    // inputs
    pub url: Input,
    pub question: Input,

    // resolvers
    pub resolvers: Vec<String>,
    pub resolver_index: usize,
    pub active_resolver: Option<String>,

    // conversation
    pub transcript_chars: Option<usize>,
    pub asked: Option<String>,
    pub response: Option<String>,
    pub latency_ms: Option<u64>,

    pub logs: Vec<LogEntry>,

    // state
    pub loading: bool,
    pub started: Option<Instant>,

    // scroll
    pub response_scroll: u16,
    pub log_scroll: usize,
    pub theme_scroll: usize,

    // question history
    pub history: Vec<String>,
    pub history_index: Option<usize>,
}

impl App {
    pub fn new(resolvers: Vec<String>) -> Self {
        Self::with_theme(resolvers, detect_theme())
    }

    pub fn with_theme(resolvers: Vec<String>, theme_kind: ThemeKind) -> Self {
        let mut app = Self {
            running: true,
            mode: Mode::Normal,
            panel: Panel::Video,
            popup: Popup::None,
            theme_kind,
            theme: Theme::from_kind(theme_kind),
            url: Input::default(),
            question: Input::default(),
            resolvers,
            resolver_index: 0,
            active_resolver: None,
            transcript_chars: None,
            asked: None,
            response: None,
            latency_ms: None,
            logs: Vec::new(),
            loading: false,
            started: None,
            response_scroll: 0,
            log_scroll: 0,
            theme_scroll: theme_kind.index(),
            history: Vec::new(),
            history_index: None,
        };

        app.log(
            LogLevel::Info,
            format!("{} resolvers loaded", app.resolvers.len()),
        );
        app.log(
            LogLevel::Info,
            "paste a video url, pick a resolver, then ask away".to_string(),
        );
        app
    }

    pub fn log(&mut self, level: LogLevel, message: String) {
        self.logs.push(LogEntry { level, message });
        // keep the newest lines in view
        self.log_scroll = self.logs.len().saturating_sub(1);
    }

    // themes

    pub fn set_theme(&mut self, kind: ThemeKind) {
        self.theme_kind = kind;
        self.theme = Theme::from_kind(kind);
        self.theme_scroll = kind.index();
    }

    pub fn open_theme_popup(&mut self) {
        self.popup = Popup::Themes;
        self.theme_scroll = self.theme_kind.index();
    }

    pub fn close_popup(&mut self) {
        self.popup = Popup::None;
    }

    pub fn theme_scroll_up(&mut self) {
        if self.theme_scroll > 0 {
            self.set_theme(ThemeKind::ALL[self.theme_scroll - 1]);
        }
    }

    pub fn theme_scroll_down(&mut self) {
        if self.theme_scroll + 1 < ThemeKind::ALL.len() {
            self.set_theme(ThemeKind::ALL[self.theme_scroll + 1]);
        }
    }

    pub fn select_theme(&mut self) {
        self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        self.close_popup();
    }

    // navigation

    pub fn cycle_panel(&mut self) {
        self.panel = match self.panel {
            Panel::Video => Panel::Resolvers,
            Panel::Resolvers => Panel::Question,
            Panel::Question => Panel::Response,
            Panel::Response => Panel::Logs,
            Panel::Logs => Panel::Video,
        };
    }

    pub fn cycle_panel_back(&mut self) {
        self.panel = match self.panel {
            Panel::Video => Panel::Logs,
            Panel::Resolvers => Panel::Video,
            Panel::Question => Panel::Resolvers,
            Panel::Response => Panel::Question,
            Panel::Logs => Panel::Response,
        };
    }

    // only the two text panels can be edited
    pub fn enter_insert(&mut self) {
        if matches!(self.panel, Panel::Video | Panel::Question) {
            self.mode = Mode::Insert;
        }
    }

    pub fn exit_insert(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn input_mut(&mut self) -> Option<&mut Input> {
        match self.panel {
            Panel::Video => Some(&mut self.url),
            Panel::Question => Some(&mut self.question),
            _ => None,
        }
    }

    // resolvers

    pub fn resolver_up(&mut self) {
        self.resolver_index = self.resolver_index.saturating_sub(1);
    }

    pub fn resolver_down(&mut self) {
        if self.resolver_index + 1 < self.resolvers.len() {
            self.resolver_index += 1;
        }
    }

    pub fn highlighted_resolver(&self) -> Option<String> {
        self.resolvers.get(self.resolver_index).cloned()
    }

    pub fn set_active_resolver(&mut self, name: String) {
        self.log(LogLevel::Ok, format!("resolver selected: {name}"));
        self.active_resolver = Some(name);
    }

    // submissions

    pub fn submit_url(&mut self) -> Option<String> {
        if self.url.is_blank() {
            return None;
        }
        self.start();
        Some(self.url.text.trim().to_string())
    }

    pub fn submit_question(&mut self) -> Option<String> {
        if self.question.is_blank() {
            return None;
        }
        let question = self.question.text.trim().to_string();
        self.history.push(question.clone());
        self.history_index = None;
        self.question.clear();
        self.start();
        Some(question)
    }

    fn start(&mut self) {
        self.loading = true;
        self.started = Some(Instant::now());
    }

    fn finish(&mut self) {
        self.loading = false;
        if let Some(start) = self.started.take() {
            self.latency_ms = Some(start.elapsed().as_millis() as u64);
        }
    }

    pub fn set_transcript(&mut self, chars: usize, message: &str) {
        self.finish();
        self.transcript_chars = Some(chars);
        self.log(LogLevel::Ok, format!("{message} ({chars} chars)"));
    }

    pub fn set_reply(&mut self, question: String, reply: String) {
        self.finish();
        self.asked = Some(question);
        self.response = Some(reply);
        self.response_scroll = 0;
        self.log(LogLevel::Ok, "got a reply, rate it with + or -".to_string());
    }

    // the answer has been rated, so it leaves the screen
    pub fn feedback_recorded(&mut self, rating: Rating, message: &str) {
        self.asked = None;
        self.response = None;
        self.response_scroll = 0;
        self.log(LogLevel::Ok, format!("{message} ({rating})"));
    }

    pub fn set_error(&mut self, err: String) {
        self.finish();
        self.log(LogLevel::Error, err);
    }

    // history

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_index = Some(index);
        self.question.set(self.history[index].clone());
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.history_index = Some(i + 1);
                self.question.set(self.history[i + 1].clone());
            }
            Some(_) => {
                self.history_index = None;
                self.question.clear();
            }
            None => {}
        }
    }

    // scrolling

    pub fn scroll_up(&mut self) {
        match self.panel {
            Panel::Resolvers => self.resolver_up(),
            Panel::Response => self.response_scroll = self.response_scroll.saturating_sub(1),
            Panel::Logs => self.log_scroll = self.log_scroll.saturating_sub(1),
            _ => {}
        }
    }

    pub fn scroll_down(&mut self) {
        match self.panel {
            Panel::Resolvers => self.resolver_down(),
            Panel::Response => self.response_scroll = self.response_scroll.saturating_add(1),
            Panel::Logs => {
                self.log_scroll = (self.log_scroll + 1).min(self.logs.len().saturating_sub(1))
            }
            _ => {}
        }
    }
}

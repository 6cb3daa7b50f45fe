// event handling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::tui::app::{App, Mode, Panel, Popup};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    LoadTranscript(String),
    SelectResolver(String),
    Ask(String),
    Feedback(&'static str),
    CopyResponse,
    ExportTranscript,
}

pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_event(app: &mut App, event: Event) -> Action {
    match event {
        // windows reports releases too
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        _ => Action::None,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.popup == Popup::Themes {
        return handle_theme_popup(app, key);
    }

    match app.mode {
        Mode::Normal => handle_normal_key(app, key),
        Mode::Insert => handle_insert_key(app, key),
    }
}

fn handle_theme_popup(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_popup(),
        KeyCode::Char('j') | KeyCode::Down => app.theme_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.theme_scroll_up(),
        KeyCode::Enter => app.select_theme(),
        _ => {}
    }
    Action::None
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => return Action::Quit,

        KeyCode::Char('i') => app.enter_insert(),
        KeyCode::Char('a') => {
            if let Some(input) = app.input_mut() {
                input.end();
            }
            app.enter_insert();
        }

        KeyCode::Tab => app.cycle_panel(),
        KeyCode::BackTab => app.cycle_panel_back(),

        KeyCode::Char('t') => app.open_theme_popup(),

        // rate the last answer
        KeyCode::Char('+') => return Action::Feedback("positive"),
        KeyCode::Char('-') => return Action::Feedback("negative"),

        KeyCode::Char('y') => return Action::CopyResponse,
        KeyCode::Char('x') => return Action::ExportTranscript,

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),

        KeyCode::Enter => return submit(app),

        _ => {}
    }
    Action::None
}

fn handle_insert_key(app: &mut App, key: KeyEvent) -> Action {
    let panel = app.panel;
    let Some(input) = app.input_mut() else {
        app.exit_insert();
        return Action::None;
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('a') => input.start(),
            KeyCode::Char('e') => input.end(),
            KeyCode::Char('u') => input.clear(),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc => app.exit_insert(),
        KeyCode::Enter => {
            app.exit_insert();
            return submit(app);
        }

        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.delete_back(),
        KeyCode::Delete => input.delete_forward(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.start(),
        KeyCode::End => input.end(),

        KeyCode::Up if panel == Panel::Question => app.history_up(),
        KeyCode::Down if panel == Panel::Question => app.history_down(),

        _ => {}
    }
    Action::None
}

// enter does whatever the focused panel is for
fn submit(app: &mut App) -> Action {
    match app.panel {
        Panel::Video => app.submit_url().map(Action::LoadTranscript),
        Panel::Resolvers => app.highlighted_resolver().map(Action::SelectResolver),
        Panel::Question => app.submit_question().map(Action::Ask),
        Panel::Response | Panel::Logs => None,
    }
    .unwrap_or(Action::None)
}

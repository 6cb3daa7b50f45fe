// terminal ui

mod app;
mod event;
mod theme;
mod ui;

use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Write, stdout};
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Error, FEEDBACK_THANKS, Session, TRANSCRIPT_LOADED};
use app::{App, LogLevel, Mode};
use event::{Action, handle_event, poll_event};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

// clipboard tools to try, in order
const CLIPBOARD_TOOLS: [(&str, &[&str]); 4] = [
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

fn copy_to_clipboard(text: &str) -> bool {
    CLIPBOARD_TOOLS
        .iter()
        .any(|(cmd, args)| pipe_to(cmd, args, text))
}

fn pipe_to(cmd: &str, args: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    else {
        return false;
    };

    // dropping stdin closes the pipe so the tool can finish
    let written = child
        .stdin
        .take()
        .map(|mut stdin| stdin.write_all(text.as_bytes()).is_ok())
        .unwrap_or(false);

    written && child.wait().map(|s| s.success()).unwrap_or(false)
}

pub async fn run(session: Session) -> Result<(), Error> {
    // setup terminal
    enable_raw_mode().map_err(|e| Error::Server(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| Error::Server(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| Error::Server(e.to_string()))?;

    let result = run_app(&mut terminal, session).await;

    // restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

fn draw(terminal: &mut Term, app: &mut App) -> Result<(), Error> {
    terminal
        .draw(|frame| ui::render(frame, app))
        .map(|_| ())
        .map_err(|e| Error::Server(e.to_string()))
}

async fn run_app(terminal: &mut Term, mut session: Session) -> Result<(), Error> {
    let mut app = App::new(session.resolver_names());
    let mut last_mode = app.mode;

    info!("tui started");

    loop {
        if app.mode != last_mode {
            let cursor_style = match app.mode {
                Mode::Insert => SetCursorStyle::BlinkingBar,
                Mode::Normal => SetCursorStyle::BlinkingBlock,
            };
            execute!(terminal.backend_mut(), cursor_style).ok();
            last_mode = app.mode;
        }

        draw(terminal, &mut app)?;

        let Some(event) =
            poll_event(Duration::from_millis(100)).map_err(|e| Error::Server(e.to_string()))?
        else {
            continue;
        };

        // each action runs to completion before the next key is read
        match handle_event(&mut app, event) {
            Action::Quit => break,
            Action::LoadTranscript(url) => {
                app.log(LogLevel::Info, format!("fetching transcript: {url}"));
                draw(terminal, &mut app)?;

                match session.load_transcript(&url).await {
                    Ok(chars) => app.set_transcript(chars, TRANSCRIPT_LOADED),
                    Err(e) => app.set_error(e.to_string()),
                }
            }
            Action::SelectResolver(name) => match session.select_resolver(&name) {
                Ok(()) => app.set_active_resolver(name),
                Err(e) => app.set_error(e.to_string()),
            },
            Action::Ask(question) => {
                let resolver = session.active_resolver().unwrap_or("-").to_string();
                app.log(LogLevel::Info, format!("asking {resolver}"));
                draw(terminal, &mut app)?;

                match session.ask(&question).await {
                    Ok(reply) => app.set_reply(question, reply),
                    Err(e) => app.set_error(e.to_string()),
                }
            }
            Action::Feedback(rating) => match session.record_feedback(rating) {
                Ok(rating) => app.feedback_recorded(rating, FEEDBACK_THANKS),
                Err(e) => app.set_error(e.to_string()),
            },
            Action::CopyResponse => {
                let (level, message) = match app.response.as_deref() {
                    Some(response) if copy_to_clipboard(response) => {
                        (LogLevel::Ok, "response copied to clipboard")
                    }
                    Some(_) => (LogLevel::Warn, "clipboard not available"),
                    None => (LogLevel::Warn, "no response to copy"),
                };
                app.log(level, message.to_string());
            }
            Action::ExportTranscript => {
                if session.transcript().is_empty() {
                    app.log(LogLevel::Warn, "no transcript to export".to_string());
                } else {
                    let filename = format!(
                        "vidchat_transcript_{}.txt",
                        chrono::Local::now().format("%Y%m%d_%H%M%S")
                    );
                    match std::fs::write(&filename, session.transcript()) {
                        Ok(_) => app.log(LogLevel::Ok, format!("exported to {filename}")),
                        Err(e) => {
                            warn!(error = %e, "transcript export failed");
                            app.log(LogLevel::Error, format!("export failed: {e}"));
                        }
                    }
                }
            }
            Action::None => {}
        }

        if !app.running {
            break;
        }
    }

    info!("tui stopped");
    Ok(())
}

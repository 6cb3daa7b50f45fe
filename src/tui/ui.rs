// ui rendering

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::tui::app::{App, Input, LogLevel, Mode, Panel, Popup};
use crate::tui::theme::{Theme, ThemeKind};

pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;

    // clear with bg color
    frame.render_widget(Clear, frame.area());
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    // header + content + footer
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, main[0]);
    render_content(frame, app, main[1]);
    render_footer(frame, app, main[2]);

    if app.popup == Popup::Themes {
        render_theme_popup(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let resolver = app.active_resolver.as_deref().unwrap_or("none");
    let transcript = app
        .transcript_chars
        .map(|c| format!("{c} chars"))
        .unwrap_or_else(|| "none".to_string());
    let latency = app
        .latency_ms
        .map(|ms| format!("{ms}ms"))
        .unwrap_or_else(|| "-".to_string());
    let status = if app.loading {
        Span::styled("working...", theme.warning())
    } else if app.response.is_some() {
        Span::styled("awaiting feedback", theme.accent())
    } else {
        Span::styled("ready", theme.success())
    };

    let line = Line::from(vec![
        Span::styled(" vidchat ", theme.title()),
        Span::styled("| Resolver: ", theme.muted()),
        Span::styled(resolver, theme.base()),
        Span::styled(" | Transcript: ", theme.muted()),
        Span::styled(transcript, theme.base()),
        Span::styled(" | ", theme.muted()),
        Span::styled(latency, theme.accent()),
        Span::styled(" | ", theme.muted()),
        status,
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.base());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(8),
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(30)])
        .split(rows[1]);

    let chat = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(middle[1]);

    render_input(
        frame,
        app,
        rows[0],
        Panel::Video,
        " Video URL ",
        &app.url,
        "press 'i' to paste a youtube url...",
    );
    render_resolvers(frame, app, middle[0]);
    render_input(
        frame,
        app,
        chat[0],
        Panel::Question,
        " Question ",
        &app.question,
        "press 'i' to ask about the video...",
    );
    render_response(frame, app, chat[1]);
    render_logs(frame, app, rows[2]);
}

fn panel_block<'a>(theme: &Theme, title: &'a str, active: bool) -> Block<'a> {
    let border_style = if active {
        theme.accent()
    } else {
        theme.border()
    };

    Block::default()
        .title(Span::styled(title, theme.title()))
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(theme.base())
}

fn render_input(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    panel: Panel,
    title: &str,
    input: &Input,
    placeholder: &str,
) {
    let theme = &app.theme;
    let active = app.panel == panel;
    let editing = active && app.mode == Mode::Insert;
    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let width = inner.width.max(1) as usize;

    // scroll horizontally so the cursor stays visible
    let skip = (input.cursor + 1).saturating_sub(width);

    let line = if input.text.is_empty() && !editing {
        Line::styled(placeholder.to_string(), theme.muted())
    } else {
        let visible: String = input.text.chars().skip(skip).take(width).collect();
        Line::styled(visible, theme.base())
    };

    frame.render_widget(
        Paragraph::new(line).block(panel_block(theme, title, active)),
        area,
    );

    // real terminal cursor while typing
    if editing {
        let x = inner.x + (input.cursor - skip) as u16;
        if x < inner.right() {
            frame.set_cursor_position((x, inner.y));
        }
    }
}

fn render_resolvers(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.panel == Panel::Resolvers;

    let mut lines: Vec<Line> = app
        .resolvers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let marker = if app.active_resolver.as_deref() == Some(name.as_str()) {
                "* "
            } else {
                "  "
            };
            let style = if i == app.resolver_index && active {
                theme.selected().fg(theme.accent)
            } else {
                theme.base()
            };
            Line::from(vec![
                Span::styled(marker, theme.success()),
                Span::styled(name.clone(), style),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::styled("no resolvers configured", theme.muted()));
    }

    frame.render_widget(
        Paragraph::new(lines).block(panel_block(theme, " Resolvers ", active)),
        area,
    );
}

fn render_response(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.panel == Panel::Response;

    let lines: Vec<Line> = match (&app.asked, &app.response) {
        (Some(question), Some(response)) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Q: ", theme.accent()),
                    Span::styled(question.clone(), theme.muted()),
                ]),
                Line::from(""),
            ];
            lines.extend(
                response
                    .lines()
                    .map(|l| Line::styled(l.to_string(), theme.base())),
            );
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("rate this answer: ", theme.muted()),
                Span::styled("+", theme.success()),
                Span::styled(" / ", theme.muted()),
                Span::styled("-", theme.error()),
            ]));
            lines
        }
        _ if app.loading => vec![Line::styled("thinking...", theme.warning())],
        _ => vec![Line::styled(
            "the reply will appear here",
            theme.muted(),
        )],
    };

    let paragraph = Paragraph::new(lines)
        .block(panel_block(theme, " Response ", active))
        .wrap(Wrap { trim: false })
        .scroll((app.response_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.panel == Panel::Logs;

    // show the window of entries that ends at log_scroll
    let height = area.height.saturating_sub(2) as usize;
    let end = (app.log_scroll + 1).min(app.logs.len());
    let start = end.saturating_sub(height);

    let lines: Vec<Line> = app.logs[start..end]
        .iter()
        .map(|entry| {
            let (prefix, style) = match entry.level {
                LogLevel::Ok => ("[OK]", theme.success()),
                LogLevel::Info => ("[--]", theme.muted()),
                LogLevel::Warn => ("[!!]", theme.warning()),
                LogLevel::Error => ("[ERR]", theme.error()),
            };
            Line::from(vec![
                Span::styled(format!("{prefix} "), style),
                Span::styled(entry.message.clone(), theme.base()),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel_block(theme, " Logs ", active))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let key = |k: &'static str| Span::styled(k, theme.accent());
    let label = |l: &'static str| Span::styled(l, theme.muted());
    let sep = || Span::styled("| ", theme.border());

    let line = Line::from(vec![
        Span::styled(" Enter ", Style::default().bg(theme.accent).fg(theme.bg)),
        label(" Submit "),
        sep(),
        key("i "),
        label("Edit "),
        sep(),
        key("Tab "),
        label("Panels "),
        sep(),
        key("+/- "),
        label("Rate "),
        sep(),
        key("y "),
        label("Copy "),
        sep(),
        key("x "),
        label("Export "),
        sep(),
        key("t "),
        label("Theme "),
        sep(),
        key("q "),
        label("Quit "),
    ]);

    frame.render_widget(
        Paragraph::new(line)
            .style(theme.base())
            .alignment(Alignment::Center),
        area,
    );
}

fn render_theme_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(30, 40, frame.area());

    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = ThemeKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &kind)| {
            if i == app.theme_scroll {
                Line::from(vec![
                    Span::styled(" > ", theme.accent()),
                    Span::styled(kind.name(), theme.selected().fg(theme.accent)),
                ])
            } else {
                Line::styled(format!("   {}", kind.name()), theme.base())
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" j/k ", theme.accent()),
        Span::styled("move  ", theme.muted()),
        Span::styled("enter ", theme.accent()),
        Span::styled("pick  ", theme.muted()),
        Span::styled("esc ", theme.accent()),
        Span::styled("close", theme.muted()),
    ]));

    let block = Block::default()
        .title(Span::styled(" theme ", theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .style(theme.base());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

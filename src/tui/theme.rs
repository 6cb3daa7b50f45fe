// theme support for the tui

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
    Gruvbox,
    Solarized,
}

impl ThemeKind {
    pub const ALL: &'static [ThemeKind] = &[Self::Dark, Self::Light, Self::Gruvbox, Self::Solarized];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Gruvbox => "gruvbox",
            Self::Solarized => "solarized",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }
}

// ask the terminal for its background brightness, fall back to dark
pub fn detect_theme() -> ThemeKind {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeKind::Light,
        _ => ThemeKind::Dark,
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub border: Color,
    pub selection: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub muted: Color,
}

impl Theme {
    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self {
                bg: Color::Rgb(22, 22, 28),
                fg: Color::Rgb(214, 214, 222),
                accent: Color::Rgb(255, 96, 96),
                border: Color::Rgb(64, 64, 78),
                selection: Color::Rgb(52, 52, 66),
                error: Color::Rgb(255, 110, 110),
                success: Color::Rgb(120, 220, 140),
                warning: Color::Rgb(240, 190, 90),
                muted: Color::Rgb(128, 128, 144),
            },
            ThemeKind::Light => Self {
                bg: Color::Rgb(248, 248, 246),
                fg: Color::Rgb(36, 36, 44),
                accent: Color::Rgb(200, 30, 40),
                border: Color::Rgb(204, 204, 210),
                selection: Color::Rgb(236, 226, 226),
                error: Color::Rgb(190, 40, 40),
                success: Color::Rgb(40, 140, 70),
                warning: Color::Rgb(190, 130, 30),
                muted: Color::Rgb(130, 130, 140),
            },
            ThemeKind::Gruvbox => Self {
                bg: Color::Rgb(40, 40, 40),
                fg: Color::Rgb(235, 219, 178),
                accent: Color::Rgb(254, 128, 25),
                border: Color::Rgb(80, 73, 69),
                selection: Color::Rgb(60, 56, 54),
                error: Color::Rgb(251, 73, 52),
                success: Color::Rgb(184, 187, 38),
                warning: Color::Rgb(250, 189, 47),
                muted: Color::Rgb(146, 131, 116),
            },
            ThemeKind::Solarized => Self {
                bg: Color::Rgb(0, 43, 54),
                fg: Color::Rgb(147, 161, 161),
                accent: Color::Rgb(38, 139, 210),
                border: Color::Rgb(7, 54, 66),
                selection: Color::Rgb(7, 54, 66),
                error: Color::Rgb(220, 50, 47),
                success: Color::Rgb(133, 153, 0),
                warning: Color::Rgb(181, 137, 0),
                muted: Color::Rgb(88, 110, 117),
            },
        }
    }

    // style helpers
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

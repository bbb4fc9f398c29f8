use std::fmt::Display;

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 light. Absent or unparseable values yield
/// `BackgroundType::Unknown`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map_or(BackgroundType::Unknown, background_from_colorfgbg)
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Unknown,
    }
}

/// Styles used by prompts and report rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub prompt: ContentStyle,
    pub heading: ContentStyle,
    pub label: ContentStyle,
    pub value: ContentStyle,
    pub dim: ContentStyle,
    pub notice: ContentStyle,
    pub error: ContentStyle,
}

impl Theme {
    /// Resolve a theme by name: `dark`, `light`, `plain`, or `auto`.
    ///
    /// `auto` honours `NO_COLOR`, then the detected terminal background,
    /// defaulting to dark. Unknown names fall back to `auto`.
    pub fn for_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            "plain" => Self::plain(),
            _ => {
                if std::env::var_os("NO_COLOR").is_some() {
                    return Self::plain();
                }
                match detect_background() {
                    BackgroundType::Light => Self::light(),
                    BackgroundType::Dark | BackgroundType::Unknown => Self::dark(),
                }
            }
        }
    }

    pub fn dark() -> Self {
        Self {
            prompt: fg(Color::Green),
            heading: bold(fg(Color::Cyan)),
            label: fg(Color::Grey),
            value: bold(fg(Color::White)),
            dim: fg(Color::DarkGrey),
            notice: fg(Color::Yellow),
            error: bold(fg(Color::Red)),
        }
    }

    pub fn light() -> Self {
        Self {
            prompt: fg(Color::DarkGreen),
            heading: bold(fg(Color::DarkBlue)),
            label: fg(Color::DarkGrey),
            value: bold(fg(Color::Black)),
            dim: fg(Color::Grey),
            notice: fg(Color::DarkYellow),
            error: bold(fg(Color::DarkRed)),
        }
    }

    /// No colours or attributes; output is plain text.
    pub fn plain() -> Self {
        Self {
            prompt: ContentStyle::new(),
            heading: ContentStyle::new(),
            label: ContentStyle::new(),
            value: ContentStyle::new(),
            dim: ContentStyle::new(),
            notice: ContentStyle::new(),
            error: ContentStyle::new(),
        }
    }

    pub fn paint<D: Display>(style: ContentStyle, content: D) -> StyledContent<D> {
        style.apply(content)
    }
}

fn fg(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::new()
    }
}

fn bold(mut style: ContentStyle) -> ContentStyle {
    style.attributes.set(Attribute::Bold);
    style
}

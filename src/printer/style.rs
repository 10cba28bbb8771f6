use colored::{Color, Colorize};

use crate::core::Level;

/// Foreground palette keyed by severity. `None` renders unstyled.
fn level_color(level: Level) -> Option<Color> {
    match level {
        Level::Trace => Some(Color::BrightBlack),
        Level::Debug => None,
        Level::Info => Some(Color::BrightBlue),
        Level::Warning => Some(Color::Yellow),
        Level::Error => Some(Color::Red),
        Level::Fatal => Some(Color::BrightMagenta),
    }
}

// Two fixed background entries for error text: one for fatal events, one
// for everything else.
fn error_background(level: Level) -> Color {
    match level {
        Level::Fatal => Color::BrightMagenta,
        _ => Color::Red,
    }
}

/// Applies the severity palette, or passes text through untouched when
/// colors are off.
#[derive(Clone, Copy, Debug)]
pub struct Styler {
    colors: bool,
    emojis: bool,
}

impl Styler {
    pub fn new(colors: bool, emojis: bool) -> Self {
        if colors {
            colored::control::set_override(true);
        }
        Self { colors, emojis }
    }

    /// Paint text with the severity's foreground color.
    pub fn paint(&self, text: &str, level: Level) -> String {
        match level_color(level) {
            Some(color) if self.colors => text.color(color).to_string(),
            _ => text.to_string(),
        }
    }

    /// Paint error text with the severity's error background.
    pub fn paint_error(&self, text: &str, level: Level) -> String {
        if self.colors {
            text.on_color(error_background(level)).to_string()
        } else {
            text.to_string()
        }
    }

    /// Per-level emoji glyph (trailing space included), or the empty string
    /// when emoji rendering is off.
    pub fn emoji(&self, level: Level) -> &'static str {
        if !self.emojis {
            return "";
        }
        match level {
            Level::Trace => "",
            Level::Debug => "🐛 ",
            Level::Info => "💡 ",
            Level::Warning => "⚠️ ",
            Level::Error => "⛔ ",
            Level::Fatal => "👾 ",
        }
    }
}

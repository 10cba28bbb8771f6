pub mod style;

use std::collections::BTreeSet;

use chrono::Local;

use crate::core::{Level, LogEvent};
use crate::errors::FormatError;
use crate::trace::{filter_trace, IgnoreList, CAPTURED_TRACE_SKIP};
use style::Styler;

const TOP_LEFT_CORNER: &str = "┌";
const BOTTOM_LEFT_CORNER: &str = "└";
const MIDDLE_CORNER: &str = "├";
const VERTICAL_LINE: &str = "│";
const HEAVY_DIVIDER: &str = "─";
const LIGHT_DIVIDER: &str = "┄";

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Construction-time printer settings.
#[derive(Clone, Debug)]
pub struct PrinterConfig {
    /// Header name; an empty string hides the header line.
    pub name: String,
    /// Frame cap for traces captured at the call site. Zero disables them.
    pub trace_frames: usize,
    /// Frame cap for traces supplied on the event. Zero disables them.
    pub error_trace_frames: usize,
    /// Column width of the border lines.
    pub line_length: usize,
    pub colors: bool,
    pub emojis: bool,
    /// Render the event time (falling back to the current time) as its own
    /// section or on the header line.
    pub timestamps: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            trace_frames: 2,
            error_trace_frames: 8,
            line_length: 120,
            colors: true,
            emojis: true,
            timestamps: false,
        }
    }
}

/// Formats [`LogEvent`]s into bordered, optionally colorized line blocks.
///
/// The printer performs no I/O and keeps no state besides its construction
/// settings and the mutable ignore list; `format` is a pure function of the
/// event and the current ignore-list snapshot.
#[derive(Clone, Debug)]
pub struct PrettyPrinter {
    config: PrinterConfig,
    styler: Styler,
    borders: Borders,
    ignore: IgnoreList,
    stack_source: Option<fn() -> String>,
}

#[derive(Clone, Debug)]
struct Borders {
    top: String,
    middle: String,
    bottom: String,
}

impl Borders {
    fn new(line_length: usize) -> Self {
        let width = line_length.saturating_sub(1);
        Self {
            top: format!("{TOP_LEFT_CORNER}{}", HEAVY_DIVIDER.repeat(width)),
            middle: format!("{MIDDLE_CORNER}{}", LIGHT_DIVIDER.repeat(width)),
            bottom: format!("{BOTTOM_LEFT_CORNER}{}", HEAVY_DIVIDER.repeat(width)),
        }
    }
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new(PrinterConfig::default())
    }
}

impl PrettyPrinter {
    pub fn new(config: PrinterConfig) -> Self {
        let styler = Styler::new(config.colors, config.emojis);
        let borders = Borders::new(config.line_length);
        Self {
            config,
            styler,
            borders,
            ignore: IgnoreList::new(),
            stack_source: None,
        }
    }

    /// Attach a current-call-stack source, used when an event carries no
    /// trace of its own.
    pub fn with_stack_source(mut self, source: fn() -> String) -> Self {
        self.stack_source = Some(source);
        self
    }

    /// Independent copy with only the header name replaced; all other
    /// settings and the full ignore list carry over by value.
    pub fn clone_named(&self, name: impl Into<String>) -> Self {
        let mut clone = self.clone();
        clone.config.name = name.into();
        clone
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Drop frames under this origin prefix at every severity.
    pub fn ignore_origin(&mut self, prefix: &str) {
        self.ignore.add_global(prefix);
    }

    /// Drop frames under this origin prefix for one severity only.
    pub fn ignore_origin_for(&mut self, prefix: &str, level: Level) {
        self.ignore.add_for_level(prefix, level);
    }

    pub fn unignore_origin(&mut self, prefix: &str) -> bool {
        self.ignore.remove_global(prefix)
    }

    pub fn unignore_origin_for(&mut self, prefix: &str, level: Level) -> bool {
        self.ignore.remove_for_level(prefix, level)
    }

    /// Remove the prefix from the global scope and every per-level scope.
    pub fn unignore_origin_everywhere(&mut self, prefix: &str) -> bool {
        self.ignore.remove_everywhere(prefix)
    }

    pub fn clear_ignored_origins(&mut self) {
        self.ignore.clear();
    }

    /// Deduplicated union of every ignored origin prefix.
    pub fn ignored_origins(&self) -> BTreeSet<String> {
        self.ignore.all_prefixes()
    }

    /// Format one event into its bordered line block. The only failure mode
    /// is a structured message that cannot be serialized.
    pub fn format(&self, event: &LogEvent) -> Result<Vec<String>, FormatError> {
        let message = event.message.render()?;
        let stack = self.resolve_stack(event);
        let time = self.config.timestamps.then(|| {
            event
                .time
                .unwrap_or_else(Local::now)
                .format(TIME_FORMAT)
                .to_string()
        });
        Ok(self.assemble(
            event.level,
            &message,
            time.as_deref(),
            event.error.as_deref(),
            stack.as_deref(),
        ))
    }

    // A trace on the event is filtered under the error cap without skipping;
    // otherwise the configured stack source supplies the current stack,
    // whose leading frames are the logging machinery itself.
    fn resolve_stack(&self, event: &LogEvent) -> Option<String> {
        match &event.stack_trace {
            Some(raw) if self.config.error_trace_frames > 0 => filter_trace(
                raw,
                self.config.error_trace_frames,
                Some(event.level),
                0,
                &self.ignore,
            ),
            None if self.config.trace_frames > 0 => {
                let capture = self.stack_source?;
                filter_trace(
                    &capture(),
                    self.config.trace_frames,
                    Some(event.level),
                    CAPTURED_TRACE_SKIP,
                    &self.ignore,
                )
            }
            _ => None,
        }
    }

    // Sections between the top border and the message block each contribute
    // their lines plus one trailing middle border; absent sections contribute
    // nothing.
    fn assemble(
        &self,
        level: Level,
        message: &str,
        time: Option<&str>,
        error: Option<&str>,
        stack: Option<&str>,
    ) -> Vec<String> {
        let time_in_header = !self.config.name.is_empty() && time.is_some();

        let sections = [
            self.header_section(level, time),
            self.error_section(level, error),
            self.stack_section(level, stack),
            if time_in_header {
                None
            } else {
                self.time_section(level, time)
            },
        ];

        let mut lines = vec![self.styler.paint(&self.borders.top, level)];
        for section in sections.into_iter().flatten() {
            lines.extend(section);
            lines.push(self.styler.paint(&self.borders.middle, level));
        }

        let emoji = self.styler.emoji(level);
        for line in message.split('\n') {
            lines.push(
                self.styler
                    .paint(&format!("{VERTICAL_LINE} {emoji}{line}"), level),
            );
        }
        lines.push(self.styler.paint(&self.borders.bottom, level));
        lines
    }

    fn header_section(&self, level: Level, time: Option<&str>) -> Option<Vec<String>> {
        if self.config.name.is_empty() {
            return None;
        }
        let name = &self.config.name;
        let label = level.label();
        let line = match time {
            Some(time) => format!("{name} | {label} | {time}"),
            None => format!("{name} | {label}"),
        };
        Some(vec![self.styler.paint(&line, level)])
    }

    fn error_section(&self, level: Level, error: Option<&str>) -> Option<Vec<String>> {
        let error = error?;
        let glyph = self.styler.paint(VERTICAL_LINE, level);
        Some(
            error
                .split('\n')
                .map(|line| format!("{glyph} {}", self.styler.paint_error(line, level)))
                .collect(),
        )
    }

    fn stack_section(&self, level: Level, stack: Option<&str>) -> Option<Vec<String>> {
        let stack = stack?;
        Some(
            stack
                .split('\n')
                .map(|line| {
                    self.styler
                        .paint(&format!("{VERTICAL_LINE} {line}"), level)
                })
                .collect(),
        )
    }

    fn time_section(&self, level: Level, time: Option<&str>) -> Option<Vec<String>> {
        time.map(|time| vec![self.styler.paint(time, level)])
    }
}

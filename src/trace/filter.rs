use once_cell::sync::Lazy;
use regex::Regex;

use super::ignore::IgnoreList;
use crate::core::Level;

/// Raw lines dropped from the start of a captured current-call stack: the
/// capture helper, the printer, and the logging call site itself. Traces
/// supplied on the event skip nothing.
pub const CAPTURED_TRACE_SKIP: usize = 3;

/// Origin roots that are always dropped: frames of the host logging package,
/// the bundled runtime library, and scheme-qualified core-library frames.
const INTERNAL_ORIGIN_ROOTS: &[&str] = &["logger/", "dart-sdk/", "dart:"];

// Device frames carry the origin parenthesized after a frame index and a
// function reference: `#1      main (package:app/main.dart:10:3)`.
static DEVICE_FRAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\d+\s+(.+) \(([^\s]+)\)").unwrap());

// Bundled web frames start with the bundle or SDK root:
// `packages/app/src/client.dart 10:3  main`.
static WEB_FRAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^((packages|dart-sdk)/[^\s]+/)").unwrap());

// Bare module frames lead with an optionally scheme-qualified path token:
// `package:app/main.dart 10:3  main` or `dart:async/zone.dart ...`.
static BARE_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:package:)?(dart:[^\s]+|[^\s]+)").unwrap());

static FRAME_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\d+\s+").unwrap());

/// Filter, renumber and cap a raw newline-delimited stack trace.
///
/// `skip` leading raw lines are dropped unconditionally (callers pass
/// [`CAPTURED_TRACE_SKIP`] for a captured current stack, 0 for a trace the
/// event carried). Surviving frames are renumbered contiguously from 0 and
/// collection stops as soon as `max_frames` of them exist. Returns `None`
/// when no frame survives, which callers must render as no stack block at
/// all rather than an empty one.
pub fn filter_trace(
    raw: &str,
    max_frames: usize,
    level: Option<Level>,
    skip: usize,
    ignore: &IgnoreList,
) -> Option<String> {
    let mut kept: Vec<String> = Vec::new();
    for line in raw.lines().skip(skip) {
        if kept.len() >= max_frames {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(origin) = frame_origin(line) {
            if is_internal_origin(&origin) || ignore.is_match(&origin, level) {
                continue;
            }
        }
        let body = FRAME_INDEX.replace(line, "");
        kept.push(format!("#{}   {}", kept.len(), body));
    }
    if kept.is_empty() {
        log::debug!("stack trace dropped: every frame was filtered out");
        None
    } else {
        Some(kept.join("\n"))
    }
}

/// Origin path of a recognized frame line, scheme and bundle root stripped.
///
/// The three shapes are tried in a fixed order and only the first matching
/// pattern is consulted; a line recognized by none is never origin-filtered.
fn frame_origin(line: &str) -> Option<String> {
    if let Some(caps) = DEVICE_FRAME.captures(line) {
        return Some(normalize_origin(caps.get(2).map_or("", |m| m.as_str())));
    }
    if let Some(caps) = WEB_FRAME.captures(line) {
        return Some(normalize_origin(caps.get(1).map_or("", |m| m.as_str())));
    }
    if let Some(caps) = BARE_FRAME.captures(line) {
        return Some(normalize_origin(caps.get(1).map_or("", |m| m.as_str())));
    }
    None
}

// One bare ignore entry (`app`) then covers device (`package:app/...`),
// web (`packages/app/...`) and bare (`app/...`) origins alike.
fn normalize_origin(origin: &str) -> String {
    origin
        .strip_prefix("package:")
        .or_else(|| origin.strip_prefix("packages/"))
        .unwrap_or(origin)
        .to_string()
}

fn is_internal_origin(path: &str) -> bool {
    INTERNAL_ORIGIN_ROOTS
        .iter()
        .any(|root| path.starts_with(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_frame_origin() {
        let origin = frame_origin("#0      Logger.log (package:app/src/log.dart:115:29)");
        assert_eq!(origin.as_deref(), Some("app/src/log.dart:115:29"));
    }

    #[test]
    fn test_web_frame_origin_is_the_leading_path_segment() {
        let origin = frame_origin("packages/app/src/client.dart 10:3      main");
        assert_eq!(origin.as_deref(), Some("app/src/"));

        let origin = frame_origin("dart-sdk/lib/async/zone.dart 1450:54  runUnary");
        assert_eq!(origin.as_deref(), Some("dart-sdk/lib/async/"));
    }

    #[test]
    fn test_bare_frame_origin() {
        let origin = frame_origin("package:app/main.dart 10:3  main");
        assert_eq!(origin.as_deref(), Some("app/main.dart"));

        let origin = frame_origin("dart:async/future.dart 12:1  then");
        assert_eq!(origin.as_deref(), Some("dart:async/future.dart"));
    }

    #[test]
    fn test_device_pattern_wins_over_bare() {
        // A device line would also satisfy the bare pattern; the origin must
        // come from the parenthesized segment, not the leading token.
        let origin = frame_origin("#4      _run (packages/app/runner.dart:8:2)");
        assert_eq!(origin.as_deref(), Some("app/runner.dart:8:2"));
    }

    #[test]
    fn test_empty_line_has_no_origin() {
        assert_eq!(frame_origin(""), None);
    }

    #[test]
    fn test_internal_origins() {
        assert!(is_internal_origin("logger/src/printer.dart:10:1"));
        assert!(is_internal_origin("dart-sdk/lib/async/zone.dart"));
        assert!(is_internal_origin("dart:async/future.dart"));
        assert!(!is_internal_origin("app/main.dart"));
    }

    #[test]
    fn test_renumbering_strips_old_indices() {
        let ignore = IgnoreList::new();
        let raw = "#3      alpha (package:app/a.dart:1:1)\n#9      beta (package:app/b.dart:2:2)";
        let filtered = filter_trace(raw, 10, None, 0, &ignore).unwrap();
        assert_eq!(
            filtered,
            "#0   alpha (package:app/a.dart:1:1)\n#1   beta (package:app/b.dart:2:2)"
        );
    }

    #[test]
    fn test_cap_is_an_early_exit() {
        let ignore = IgnoreList::new();
        let raw = "#0      a (package:app/a.dart:1:1)\n#1      b (package:app/b.dart:2:2)\n#2      c (package:app/c.dart:3:3)";
        let filtered = filter_trace(raw, 2, None, 0, &ignore).unwrap();
        assert_eq!(filtered.lines().count(), 2);
        assert!(filtered.ends_with("#1   b (package:app/b.dart:2:2)"));
    }

    #[test]
    fn test_zero_cap_keeps_nothing() {
        let ignore = IgnoreList::new();
        assert_eq!(
            filter_trace("#0      a (package:app/a.dart:1:1)", 0, None, 0, &ignore),
            None
        );
    }

    #[test]
    fn test_blank_trace_yields_none() {
        let ignore = IgnoreList::new();
        assert_eq!(filter_trace("\n   \n\t\n", 8, None, 0, &ignore), None);
    }

    #[test]
    fn test_lines_without_registered_origin_pass_through() {
        let ignore = IgnoreList::new();
        let filtered = filter_trace("<asynchronous suspension>", 8, None, 0, &ignore).unwrap();
        assert_eq!(filtered, "#0   <asynchronous suspension>");
    }
}

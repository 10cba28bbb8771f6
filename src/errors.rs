use thiserror::Error;

/// Errors surfaced while formatting an event.
///
/// Configuration mistakes (blank ignore prefixes, removing an unregistered
/// prefix, querying an unknown level) are deliberately silent no-ops; the
/// only failure the printer propagates is a structured message that cannot
/// be serialized.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to render structured log message: {0}")]
    MessageSerialization(#[from] serde_json::Error),
}

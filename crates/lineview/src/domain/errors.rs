//! Domain-specific errors.

use thiserror::Error;

/// Why a URL fragment could not be read as a line reference.
///
/// These never reach the user: a bad fragment simply means "no selection requested".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("fragment is empty")]
    Empty,
    #[error("expected a two-part line range, found {0} part(s)")]
    PartCount(usize),
    #[error("'{0}' is not a line anchor")]
    InvalidAnchor(String),
}

/// Error returned when a click description such as `shift+L10` cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClickParseError {
    #[error("unknown modifier '{0}' (expected shift, ctrl or meta)")]
    UnknownModifier(String),
    #[error("'{0}' is not a line anchor")]
    InvalidAnchor(String),
}

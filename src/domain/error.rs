//! Error types for the hanzi-cards plugin.
//!
//! [`HanziError`] is the single error type of the crate and [`Result`] its
//! companion alias. None of these errors is fatal: every caller recovers into
//! a well-defined, still-interactive state (a transient notice, an empty list,
//! or a guidance message).

use thiserror::Error;

/// The main error type for hanzi-cards operations.
///
/// # Examples
///
/// ```
/// use hanzi_cards::HanziError;
///
/// let err = HanziError::InsufficientData { available: 1 };
/// assert_eq!(err.to_string(), "Practice needs at least 2 characters, found 1");
/// ```
#[derive(Debug, Error)]
pub enum HanziError {
    /// A required form field was empty after trimming.
    ///
    /// Recovered locally: the form shows a transient message and neither the
    /// store nor the host is touched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The host channel could not accept a message.
    ///
    /// Happens when the plugin has not been granted the permissions it needs
    /// or the channel refuses the payload.
    #[error("Host unavailable: {0}")]
    HostUnavailable(String),

    /// The host replied with something that is not a character list.
    #[error("Malformed host response: {0}")]
    MalformedResponse(String),

    /// Practice was requested with fewer than two characters in the store.
    #[error("Practice needs at least 2 characters, found {available}")]
    InsufficientData {
        /// Number of characters currently loaded.
        available: usize,
    },

    /// A quiz operation was called in a state that does not allow it.
    ///
    /// Answering twice, advancing before answering, or picking an option
    /// that does not exist.
    #[error("Quiz error: {0}")]
    QuizState(String),

    /// Reading or writing the worker's character file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for hanzi-cards operations.
pub type Result<T> = std::result::Result<T, HanziError>;

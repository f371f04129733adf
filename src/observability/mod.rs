//! Structured logging to a rotating file in the plugin data directory.
//!
//! Zellij gives plugins no stdout for diagnostics, so `tracing` events and
//! spans are formatted as plain text and appended to
//! `~/.local/share/zellij/hanzi-cards/hanzi-cards.log`.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → Mutex<RotatingFile> → hanzi-cards.log
//! ```
//!
//! # Configuration
//!
//! The level comes from the `trace_level` plugin option (any `EnvFilter`
//! directive, e.g. `"debug"` or `"hanzi_cards::bridge=trace"`), defaulting to
//! `"info"`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Size-based rotation with backup retention

mod file_writer;
mod init;

pub use file_writer::RotatingFile;
pub use init::init_tracing;

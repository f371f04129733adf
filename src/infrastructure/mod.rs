//! Infrastructure layer for filesystem and runtime interactions.
//!
//! - [`paths`]: Locations inside the Zellij sandbox, where the host
//!   filesystem is mounted under `/host`
//! - [`timers`]: Demultiplexing of Zellij's single timer event

pub mod paths;
pub mod timers;

pub use paths::{expand_tilde, get_data_dir, log_file, storage_file};
pub use timers::{TimerPurpose, TimerQueue};

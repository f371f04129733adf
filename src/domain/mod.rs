//! Domain layer for the hanzi-cards plugin.
//!
//! Core types shared by every other layer, free of Zellij APIs.
//!
//! - [`error`]: Error type and result alias
//! - [`character`]: Character records and their ids

pub mod character;
pub mod error;

pub use character::{CharacterFields, CharacterId, CharacterIdGenerator, CharacterRecord};
pub use error::{HanziError, Result};

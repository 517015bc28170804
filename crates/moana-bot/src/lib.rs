//! # Moana Bot
//!
//! Community management Discord bot: link and spam moderation, support
//! tickets with transcripts, and a set of moderation and utility commands.
//!
//! This is the binary crate that loads configuration, starts logging and
//! runs the Poise framework.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;
pub mod sweeper;

pub use bot::*;
pub use error::*;
pub use sweeper::*;

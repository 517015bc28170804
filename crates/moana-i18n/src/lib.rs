//! # Moana I18n
//!
//! Fluent message catalogs for Moana Bot.
//!
//! Catalogs are embedded at compile time and validated by the build script,
//! so every supported locale defines the same messages with the same
//! variables.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod loader;
pub mod messages;

pub use error::*;
pub use loader::*;
pub use messages::*;

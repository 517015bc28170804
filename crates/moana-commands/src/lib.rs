//! # Moana Commands
//!
//! Discord slash commands, gateway events and ticket buttons for Moana Bot,
//! built on the Poise framework.
//!
//! Moderation and ticket decisions are made by `moana-core`; this crate
//! turns Discord events into core calls and core results into Discord
//! messages.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod embeds;
pub mod events;
pub mod forms;
pub mod framework;
pub mod gateway;
pub mod moderation;
pub mod tickets;
pub mod utility;

pub use framework::*;
pub use gateway::SerenityGateway;

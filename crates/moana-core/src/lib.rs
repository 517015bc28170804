//! # Moana Core
//!
//! Platform-independent moderation and support ticket logic for Moana Bot.
//!
//! The [`RateLimiter`] decides when a member has to be restricted for posting
//! links or flooding a channel, and the [`TicketLifecycle`] owns every open
//! support ticket as an explicit state machine. Both are synchronous and never
//! touch the network; the [`Moderator`] and [`TicketDesk`] orchestrators apply
//! their decisions through a [`PlatformGateway`] after each state change.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod desk;
pub mod gateway;
pub mod moderator;
pub mod rate_limiter;
pub mod ticket;
pub mod transcript;

pub use desk::*;
pub use gateway::*;
pub use moderator::*;
pub use rate_limiter::*;
pub use ticket::*;
pub use transcript::*;

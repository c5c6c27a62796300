//! Entity factories for tests.
//!
//! Factories create entity rows with sensible defaults and a builder pattern
//! for overriding the fields a test cares about.

pub mod giveaway;
pub mod helpers;
pub mod user;

pub use giveaway::{create_giveaway, GiveawayFactory};
pub use user::{create_user, UserFactory};

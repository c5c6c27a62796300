//! Error types and user-facing rejection mapping.
//!
//! This module provides the application's error hierarchy. `AppError` is the
//! top-level error type that wraps infrastructure errors (database, Discord,
//! scheduler, HTTP client) and the domain taxonomy used by the ledger and
//! giveaway operations. Domain variants carry enough context to produce a
//! specific, actionable rejection message for the invoking user, while
//! infrastructure variants are reported generically and logged in full.

pub mod config;
pub mod internal;

use thiserror::Error;

use crate::error::{config::ConfigError, internal::InternalError};

/// Top-level application error type.
///
/// Aggregates all error types that can occur in the bot. Infrastructure
/// variants use `#[from]` for automatic conversion; domain variants are
/// constructed at the call site that detects the violation. Pre-condition
/// violations (invalid argument, wrong state) are raised before any write.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Internal issue indicating unexpected stored state or a bug.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// A caller-supplied value was rejected before any write.
    ///
    /// Covers negative amounts, malformed duration strings, and a winner
    /// count below one.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced user, giveaway, or record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The entrant does not meet the giveaway's role requirement.
    #[error("{0}")]
    Ineligible(String),

    /// Operation requires an open giveaway but it has already ended.
    #[error("giveaway has already ended")]
    AlreadyEnded,

    /// Operation requires an ended giveaway but it is still open.
    #[error("giveaway has not ended yet")]
    NotEnded,

    /// A reroll asked for more winners than there are eligible entrants left.
    #[error("not enough entrants: requested {requested}, only {available} available")]
    InsufficientEntrants { requested: usize, available: usize },

    /// The identity/credential service was unreachable or rejected the call.
    ///
    /// Never fatal to a ledger write; surfaced to the caller after the write
    /// is already durable.
    #[error("external service failure: {0}")]
    ExternalService(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Maps the error to the message shown to the invoking Discord user.
    ///
    /// Domain variants produce a specific, actionable rejection. Everything
    /// else is reported generically; the full error is logged server-side so
    /// internals never leak into chat.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument(msg) => format!("❌ {}", msg),
            Self::NotFound(msg) => format!("❌ {}", msg),
            Self::Ineligible(msg) => format!("❌ {}", msg),
            Self::AlreadyEnded => "❌ This giveaway has already ended.".to_string(),
            Self::NotEnded => {
                "❌ This giveaway has not ended yet. End it first, then reroll.".to_string()
            }
            Self::InsufficientEntrants {
                requested,
                available,
            } => format!(
                "❌ Not enough new entrants to draw {} winner(s). Only {} available.",
                requested, available
            ),
            Self::ExternalService(msg) => {
                tracing::warn!("external service failure: {}", msg);
                "⚠️ The Roblox service could not be reached. Please try again later.".to_string()
            }
            Self::ReqwestErr(e) => {
                tracing::warn!("outbound request failed: {}", e);
                "⚠️ The Roblox service could not be reached. Please try again later.".to_string()
            }
            err => {
                tracing::error!("internal error: {}", err);
                "❌ An unexpected error occurred.".to_string()
            }
        }
    }
}

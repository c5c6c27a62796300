//! Giveaway domain model and lifecycle parameter types.

use sea_orm::ActiveValue;

use crate::error::{internal::InternalError, AppError};

/// One giveaway, keyed by its announcement message ID.
///
/// State machine: OPEN -> ENDED (terminal). Once `ended` is true the only
/// legal mutation is appending reroll winners.
#[derive(Debug, Clone, PartialEq)]
pub struct Giveaway {
    pub message_id: String,
    pub channel_id: String,
    pub guild_id: String,
    pub prize: String,
    pub winner_count: u32,
    /// End of the entry phase, epoch milliseconds.
    pub end_time_ms: i64,
    pub sponsor_id: Option<String>,
    pub required_role_id: Option<String>,
    pub ended: bool,
    /// Ordered, append-only winner list across the initial draw and rerolls.
    pub winners: Vec<String>,
}

impl Giveaway {
    /// Converts an entity row to the domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Giveaway)` - The converted giveaway
    /// - `Err(AppError::InternalErr(CorruptJsonColumn))` - The winners column
    ///   held a value of the wrong shape
    pub fn from_entity(entity: entity::giveaway::Model) -> Result<Self, AppError> {
        let winners: Vec<String> = serde_json::from_value(entity.winners).map_err(|e| {
            InternalError::CorruptJsonColumn {
                column: "winners",
                source: e,
            }
        })?;

        Ok(Self {
            message_id: entity.message_id,
            channel_id: entity.channel_id,
            guild_id: entity.guild_id,
            prize: entity.prize,
            winner_count: entity.winner_count.max(0) as u32,
            end_time_ms: entity.end_time,
            sponsor_id: entity.sponsor_id,
            required_role_id: entity.required_role_id,
            ended: entity.ended,
            winners,
        })
    }

    /// Converts the giveaway to an active model with every column set.
    pub fn into_active_model(self) -> entity::giveaway::ActiveModel {
        entity::giveaway::ActiveModel {
            message_id: ActiveValue::Set(self.message_id),
            channel_id: ActiveValue::Set(self.channel_id),
            guild_id: ActiveValue::Set(self.guild_id),
            prize: ActiveValue::Set(self.prize),
            winner_count: ActiveValue::Set(self.winner_count as i32),
            end_time: ActiveValue::Set(self.end_time_ms),
            sponsor_id: ActiveValue::Set(self.sponsor_id),
            required_role_id: ActiveValue::Set(self.required_role_id),
            ended: ActiveValue::Set(self.ended),
            winners: ActiveValue::Set(serde_json::to_value(&self.winners).unwrap_or_default()),
        }
    }
}

/// Parameters for starting a giveaway.
///
/// The announcement message is posted by the interaction layer first; its ID
/// becomes the giveaway key.
#[derive(Debug, Clone)]
pub struct StartGiveawayParam {
    pub message_id: String,
    pub channel_id: String,
    pub guild_id: String,
    pub prize: String,
    pub winner_count: u32,
    /// Human duration string, e.g. "30m" or "1d 6h".
    pub duration: String,
    pub sponsor_id: Option<String>,
    pub required_role_id: Option<String>,
}

/// Result of a join attempt that passed all preconditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The entrant was appended; carries the updated entrant count for the
    /// announcement embed.
    Joined { entrant_count: u64 },
    /// The entrant was already in the set - a reported no-op, not an error.
    AlreadyEntered,
}

/// Result of ending a giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// Winners drawn from the currently-eligible entrant subset.
    Drawn { winners: Vec<String> },
    /// No entrant passed the final eligibility re-check.
    NoValidEntrants,
    /// The announcement message was deleted; the giveaway was force-closed so
    /// the sweep cannot retry it forever.
    MessageMissing,
}

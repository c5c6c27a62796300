//! Giveaway lifecycle engine.
//!
//! Owns the OPEN -> ENDED state machine independent of the points ledger:
//! creation with duration validation, button-driven entry with eligibility
//! checks, scheduled or manual termination with a final eligibility re-check
//! and a without-replacement draw, and append-only rerolls.
//!
//! Persistence is local-effect-first: the terminal state is written before
//! the announcement side effects run, so an announcement failure can never
//! un-end a giveaway. A join landing between the draw snapshot and the
//! `ended` write stays in the entrant set and is considered by future
//! rerolls.

pub mod draw;

#[cfg(test)]
mod test;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::sync::Arc;

use crate::data::giveaway::GiveawayRepository;
use crate::error::AppError;
use crate::model::giveaway::{EndOutcome, Giveaway, JoinOutcome, StartGiveawayParam};
use crate::service::gateway::DiscordGateway;
use crate::util::parse::{parse_duration, parse_u64_from_string};

/// Service providing the giveaway lifecycle operations.
pub struct GiveawayService<'a> {
    db: &'a DatabaseConnection,
    gateway: Arc<dyn DiscordGateway>,
}

impl<'a> GiveawayService<'a> {
    /// Creates a new GiveawayService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `gateway` - Outbound Discord surface for announcements and checks
    ///
    /// # Returns
    /// - `GiveawayService` - New service instance
    pub fn new(db: &'a DatabaseConnection, gateway: Arc<dyn DiscordGateway>) -> Self {
        Self { db, gateway }
    }

    /// Starts a giveaway.
    ///
    /// Validates the winner count and parses the duration string before any
    /// record is created; a malformed duration rejects the whole operation.
    ///
    /// # Arguments
    /// - `param` - Giveaway configuration including the announcement message ID
    ///
    /// # Returns
    /// - `Ok(Giveaway)` - The persisted OPEN giveaway
    /// - `Err(AppError::InvalidArgument)` - Bad duration or winner count
    /// - `Err(AppError)` - Database error during insert
    pub async fn start(&self, param: StartGiveawayParam) -> Result<Giveaway, AppError> {
        if param.winner_count < 1 {
            return Err(AppError::InvalidArgument(
                "Winner count must be at least 1.".to_string(),
            ));
        }

        let duration = parse_duration(&param.duration)?;
        let end_time_ms = Utc::now().timestamp_millis() + duration.num_milliseconds();

        let giveaway = Giveaway {
            message_id: param.message_id,
            channel_id: param.channel_id,
            guild_id: param.guild_id,
            prize: param.prize,
            winner_count: param.winner_count,
            end_time_ms,
            sponsor_id: param.sponsor_id,
            required_role_id: param.required_role_id,
            ended: false,
            winners: Vec::new(),
        };

        GiveawayRepository::new(self.db).create(giveaway).await
    }

    /// Handles an entry attempt from the join button.
    ///
    /// # Arguments
    /// - `message_id` - Giveaway key from the interaction's message
    /// - `entrant_id` - Discord ID of the joining user
    /// - `entrant_role_ids` - The member's current role IDs
    ///
    /// # Returns
    /// - `Ok(JoinOutcome::Joined)` - Entrant appended, carries the new count
    /// - `Ok(JoinOutcome::AlreadyEntered)` - Reported no-op
    /// - `Err(AppError::NotFound)` - Unknown giveaway
    /// - `Err(AppError::AlreadyEnded)` - Entry phase is over
    /// - `Err(AppError::Ineligible)` - Required role missing
    pub async fn join(
        &self,
        message_id: &str,
        entrant_id: &str,
        entrant_role_ids: &[u64],
    ) -> Result<JoinOutcome, AppError> {
        let repo = GiveawayRepository::new(self.db);
        let giveaway = repo
            .find_by_message_id(message_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Could not find that giveaway.".to_string()))?;

        if giveaway.ended {
            return Err(AppError::AlreadyEnded);
        }

        if let Some(required) = &giveaway.required_role_id {
            let required_id = parse_u64_from_string(required.clone())?;
            if !entrant_role_ids.contains(&required_id) {
                return Err(AppError::Ineligible(format!(
                    "**Entry Failed:** You need the <@&{}> role to join this giveaway.",
                    required
                )));
            }
        }

        if !repo.add_entrant(message_id, entrant_id).await? {
            return Ok(JoinOutcome::AlreadyEntered);
        }

        let entrant_count = repo.entrant_count(message_id).await?;

        // Non-fatal: the entry is already recorded even if the embed edit fails.
        let channel_id = parse_u64_from_string(giveaway.channel_id.clone())?;
        let message_id_num = parse_u64_from_string(giveaway.message_id.clone())?;
        if let Err(e) = self
            .gateway
            .update_entrant_count(channel_id, message_id_num, entrant_count)
            .await
        {
            tracing::warn!(
                "failed to update entrant count on giveaway {}: {}",
                message_id,
                e
            );
        }

        Ok(JoinOutcome::Joined { entrant_count })
    }

    /// Ends a giveaway and draws its winners.
    ///
    /// Safe to call before the deadline - manual early termination is a
    /// supported operation. Each entrant's eligibility is re-validated
    /// against the required role at draw time, since membership may have
    /// changed since joining. If the announcement message was deleted the
    /// giveaway is still forced into the ended state so the sweep cannot
    /// retry it forever.
    ///
    /// # Arguments
    /// - `message_id` - Giveaway key
    ///
    /// # Returns
    /// - `Ok(EndOutcome)` - Winners drawn, no valid entrants, or fail-closed
    /// - `Err(AppError::NotFound)` - Unknown giveaway
    /// - `Err(AppError::AlreadyEnded)` - Already terminal
    pub async fn end(&self, message_id: &str) -> Result<EndOutcome, AppError> {
        let repo = GiveawayRepository::new(self.db);
        let giveaway = repo
            .find_by_message_id(message_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Could not find that giveaway.".to_string()))?;

        if giveaway.ended {
            return Err(AppError::AlreadyEnded);
        }

        let channel_id = parse_u64_from_string(giveaway.channel_id.clone())?;
        let message_id_num = parse_u64_from_string(giveaway.message_id.clone())?;
        let guild_id = parse_u64_from_string(giveaway.guild_id.clone())?;

        if !self.gateway.message_exists(channel_id, message_id_num).await? {
            repo.force_ended(message_id).await?;
            tracing::warn!(
                "giveaway {} announcement was deleted; closed without a draw",
                message_id
            );
            return Ok(EndOutcome::MessageMissing);
        }

        let entrants = repo.entrants(message_id).await?;
        let eligible = self
            .filter_eligible(&giveaway, guild_id, entrants)
            .await?;

        let winners = draw::draw_winners(
            &mut rand::rng(),
            eligible,
            giveaway.winner_count as usize,
        );

        // The write is the authoritative outcome; announcement and embed
        // edits after it are best-effort.
        repo.mark_ended(message_id, &winners).await?;

        if let Err(e) = self
            .gateway
            .announce_giveaway_result(channel_id, message_id_num, &giveaway.prize, &winners)
            .await
        {
            tracing::error!("failed to announce giveaway {} result: {}", message_id, e);
        }
        if let Err(e) = self
            .gateway
            .finalize_giveaway_message(channel_id, message_id_num, &giveaway.prize, &winners)
            .await
        {
            tracing::error!("failed to finalize giveaway {} message: {}", message_id, e);
        }

        if winners.is_empty() {
            Ok(EndOutcome::NoValidEntrants)
        } else {
            Ok(EndOutcome::Drawn { winners })
        }
    }

    /// Draws additional winners from an ended giveaway.
    ///
    /// The pool is the entrant set minus everyone already in the winner
    /// list; prior winners are never reconsidered and never removed.
    ///
    /// # Arguments
    /// - `message_id` - Giveaway key
    /// - `count` - How many additional winners to draw
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - The newly drawn winners, in draw order
    /// - `Err(AppError::NotFound)` - Unknown giveaway
    /// - `Err(AppError::NotEnded)` - Giveaway is still open
    /// - `Err(AppError::InsufficientEntrants)` - Pool smaller than `count`
    pub async fn reroll(&self, message_id: &str, count: u32) -> Result<Vec<String>, AppError> {
        if count < 1 {
            return Err(AppError::InvalidArgument(
                "Reroll count must be at least 1.".to_string(),
            ));
        }

        let repo = GiveawayRepository::new(self.db);
        let giveaway = repo
            .find_by_message_id(message_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Could not find that giveaway.".to_string()))?;

        if !giveaway.ended {
            return Err(AppError::NotEnded);
        }

        let entrants = repo.entrants(message_id).await?;
        let already_won: HashSet<&String> = giveaway.winners.iter().collect();
        let pool: Vec<String> = entrants
            .into_iter()
            .filter(|e| !already_won.contains(e))
            .collect();

        if pool.len() < count as usize {
            return Err(AppError::InsufficientEntrants {
                requested: count as usize,
                available: pool.len(),
            });
        }

        let new_winners = draw::draw_winners(&mut rand::rng(), pool, count as usize);

        let mut all_winners = giveaway.winners.clone();
        all_winners.extend(new_winners.iter().cloned());
        repo.set_winners(message_id, &all_winners).await?;

        let channel_id = parse_u64_from_string(giveaway.channel_id.clone())?;
        if let Err(e) = self
            .gateway
            .announce_reroll(channel_id, &giveaway.prize, &new_winners)
            .await
        {
            tracing::error!("failed to announce reroll for giveaway {}: {}", message_id, e);
        }

        Ok(new_winners)
    }

    /// Ends every open giveaway whose deadline has passed.
    ///
    /// Each due giveaway is ended independently; one failure is logged and
    /// does not stop the rest of the sweep.
    ///
    /// # Arguments
    /// - `now_ms` - Current time in epoch milliseconds
    ///
    /// # Returns
    /// - `Ok(u64)` - How many giveaways reached a terminal state this sweep
    /// - `Err(AppError)` - Database error while querying due giveaways
    pub async fn sweep(&self, now_ms: i64) -> Result<u64, AppError> {
        let due = GiveawayRepository::new(self.db).find_due(now_ms).await?;
        if due.is_empty() {
            return Ok(0);
        }

        tracing::info!("sweep found {} giveaway(s) to end", due.len());

        let mut ended = 0;
        for giveaway in due {
            match self.end(&giveaway.message_id).await {
                Ok(_) => ended += 1,
                // A racing manual end is fine; the giveaway is terminal.
                Err(AppError::AlreadyEnded) => ended += 1,
                Err(e) => {
                    tracing::error!("failed to end giveaway {}: {}", giveaway.message_id, e);
                }
            }
        }

        Ok(ended)
    }

    /// Re-validates entrant eligibility against the required role.
    ///
    /// Without a role requirement every entrant stays eligible. With one,
    /// each entrant's current membership is fetched; entrants who left the
    /// guild or lost the role are excluded from the draw (but remain in the
    /// entrant set).
    async fn filter_eligible(
        &self,
        giveaway: &Giveaway,
        guild_id: u64,
        entrants: Vec<String>,
    ) -> Result<Vec<String>, AppError> {
        let Some(required) = &giveaway.required_role_id else {
            return Ok(entrants);
        };
        let required_id = parse_u64_from_string(required.clone())?;

        let mut eligible = Vec::with_capacity(entrants.len());
        for entrant in entrants {
            let entrant_id = parse_u64_from_string(entrant.clone())?;
            match self.gateway.member_role_ids(guild_id, entrant_id).await? {
                Some(roles) if roles.contains(&required_id) => eligible.push(entrant),
                _ => {}
            }
        }

        Ok(eligible)
    }
}

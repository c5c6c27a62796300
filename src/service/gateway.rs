//! Outbound Discord surface consumed by the services.
//!
//! Services talk to Discord through the narrow `DiscordGateway` trait instead
//! of holding an `Http` client directly, which keeps the lifecycle logic
//! testable against a stub. `SerenityGateway` is the production
//! implementation and owns all embed presentation.

use serenity::all::{
    ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, GuildId, MessageId,
    UserId,
};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::error::AppError;
use crate::model::period::{Champion, Period, PeriodSnapshot};

/// Embed accent used for open giveaways and confirmations.
pub const EMBED_COLOR: u32 = 0x5865F2;
/// Terminal giveaway embeds.
const ENDED_COLOR: u32 = 0xFF0000;
/// Period champion announcements.
const CHAMPION_COLOR: u32 = 0xFFD700;

/// Outbound Discord operations the services depend on.
#[async_trait]
pub trait DiscordGateway: Send + Sync {
    /// Whether a message still exists.
    ///
    /// A fetch failure counts as missing; the giveaway end flow fails closed
    /// on a deleted announcement either way.
    async fn message_exists(&self, channel_id: u64, message_id: u64) -> Result<bool, AppError>;

    /// Current role IDs of a guild member.
    ///
    /// Returns `None` when the user is not (or no longer) a member; a fetch
    /// failure is treated the same way, so eligibility re-checks err on the
    /// side of exclusion.
    async fn member_role_ids(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<Vec<u64>>, AppError>;

    /// Rewrites the entrant count shown on a giveaway announcement.
    async fn update_entrant_count(
        &self,
        channel_id: u64,
        message_id: u64,
        count: u64,
    ) -> Result<(), AppError>;

    /// Announces the outcome of an ended giveaway as a reply to its
    /// announcement message. An empty winner list announces that no valid
    /// participant was found.
    async fn announce_giveaway_result(
        &self,
        channel_id: u64,
        reply_to: u64,
        prize: &str,
        winners: &[String],
    ) -> Result<(), AppError>;

    /// Edits the original announcement into its terminal visual state and
    /// removes the join button.
    async fn finalize_giveaway_message(
        &self,
        channel_id: u64,
        message_id: u64,
        prize: &str,
        winners: &[String],
    ) -> Result<(), AppError>;

    /// Announces rerolled winners in the giveaway channel.
    async fn announce_reroll(
        &self,
        channel_id: u64,
        prize: &str,
        winners: &[String],
    ) -> Result<(), AppError>;

    /// Sends the period champions announcement.
    async fn announce_period_champions(
        &self,
        channel_id: u64,
        period: Period,
        snapshot: &PeriodSnapshot,
    ) -> Result<(), AppError>;

    /// Reports a side-effect failure to the operator channel.
    async fn report_operator(&self, channel_id: u64, message: &str) -> Result<(), AppError>;
}

/// Production gateway backed by the serenity HTTP client.
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    /// Creates a new SerenityGateway instance.
    ///
    /// # Arguments
    /// - `http` - Arc-wrapped Discord HTTP client
    ///
    /// # Returns
    /// - `SerenityGateway` - New gateway instance
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

/// Builds the announcement embed for an open giveaway.
///
/// The description layout is load-bearing: `update_entrant_count` rewrites
/// the `**Participants:**` line in place, so it must stay on its own line.
pub fn giveaway_embed(
    prize: &str,
    winner_count: u32,
    end_time_ms: i64,
    sponsor_id: Option<&str>,
    required_role_id: Option<&str>,
    entrant_count: u64,
) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("🎉 GIVEAWAY 🎉")
        .description(format!(
            "Press the button to enter!\n**Prize:** {}\n**Winners:** {}\n**Ends:** <t:{}:R>\n**Participants:** {}",
            prize,
            winner_count,
            end_time_ms / 1000,
            entrant_count
        ))
        .color(EMBED_COLOR);

    if let Some(sponsor) = sponsor_id {
        embed = embed.field("Sponsored by", format!("<@{}>", sponsor), true);
    }
    if let Some(role) = required_role_id {
        embed = embed.field("Requirement", format!("Must have the <@&{}> role.", role), true);
    }

    embed
}

fn winner_mentions(winners: &[String]) -> String {
    winners
        .iter()
        .map(|id| format!("<@{}>", id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn champion_field(champion: &Option<Champion>, unit: &str) -> String {
    match champion {
        Some(c) => format!("{}\n(**{}** {})", c.mention(), c.value, unit),
        None => "None yet".to_string(),
    }
}

#[async_trait]
impl DiscordGateway for SerenityGateway {
    async fn message_exists(&self, channel_id: u64, message_id: u64) -> Result<bool, AppError> {
        match self
            .http
            .get_message(ChannelId::new(channel_id), MessageId::new(message_id))
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::debug!("message {} fetch failed, treating as missing: {}", message_id, e);
                Ok(false)
            }
        }
    }

    async fn member_role_ids(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<Vec<u64>>, AppError> {
        match self
            .http
            .get_member(GuildId::new(guild_id), UserId::new(user_id))
            .await
        {
            Ok(member) => Ok(Some(member.roles.iter().map(|r| r.get()).collect())),
            Err(e) => {
                tracing::debug!("member {} fetch failed, treating as absent: {}", user_id, e);
                Ok(None)
            }
        }
    }

    async fn update_entrant_count(
        &self,
        channel_id: u64,
        message_id: u64,
        count: u64,
    ) -> Result<(), AppError> {
        let channel = ChannelId::new(channel_id);
        let message = self
            .http
            .get_message(channel, MessageId::new(message_id))
            .await?;

        let Some(embed) = message.embeds.first().cloned() else {
            return Ok(());
        };

        let description = embed.description.clone().unwrap_or_default();
        let rewritten = description
            .lines()
            .map(|line| {
                if line.starts_with("**Participants:**") {
                    format!("**Participants:** {}", count)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let updated = CreateEmbed::from(embed).description(rewritten);
        channel
            .edit_message(
                &self.http,
                MessageId::new(message_id),
                EditMessage::new().embed(updated),
            )
            .await?;

        Ok(())
    }

    async fn announce_giveaway_result(
        &self,
        channel_id: u64,
        reply_to: u64,
        prize: &str,
        winners: &[String],
    ) -> Result<(), AppError> {
        let channel = ChannelId::new(channel_id);
        let content = if winners.is_empty() {
            format!(
                "Could not determine a winner for the **{}**. (No valid participants).",
                prize
            )
        } else {
            format!(
                "Congratulations {}! You won the **{}**!",
                winner_mentions(winners),
                prize
            )
        };

        channel
            .send_message(
                &self.http,
                CreateMessage::new()
                    .content(content)
                    .reference_message((channel, MessageId::new(reply_to))),
            )
            .await?;

        Ok(())
    }

    async fn finalize_giveaway_message(
        &self,
        channel_id: u64,
        message_id: u64,
        prize: &str,
        winners: &[String],
    ) -> Result<(), AppError> {
        let winners_line = if winners.is_empty() {
            "None".to_string()
        } else {
            winner_mentions(winners)
        };

        let embed = CreateEmbed::new()
            .title("🎉 GIVEAWAY ENDED 🎉")
            .color(ENDED_COLOR)
            .description(format!("**Prize:** {}\n**Winners:** {}", prize, winners_line));

        ChannelId::new(channel_id)
            .edit_message(
                &self.http,
                MessageId::new(message_id),
                EditMessage::new().embed(embed).components(Vec::new()),
            )
            .await?;

        Ok(())
    }

    async fn announce_reroll(
        &self,
        channel_id: u64,
        prize: &str,
        winners: &[String],
    ) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .send_message(
                &self.http,
                CreateMessage::new().content(format!(
                    "🎉 Congratulations to the new winner(s) for the **{}**: {}!",
                    prize,
                    winner_mentions(winners)
                )),
            )
            .await?;

        Ok(())
    }

    async fn announce_period_champions(
        &self,
        channel_id: u64,
        period: Period,
        snapshot: &PeriodSnapshot,
    ) -> Result<(), AppError> {
        let (title, description, points_unit, footer) = match period {
            Period::Weekly => (
                "🏆 WEEKLY CHAMPIONS: Mooncrest Expedition 🏆",
                "This week has concluded! Weekly statistics have been reset.",
                "Weekly LP",
                "Weekly statistics are automatically reset every Monday at 05:00 WIB.",
            ),
            Period::Monthly => (
                "🌕 MONTHLY LEGENDS: Mooncrest Expedition 🌕",
                "This month has concluded! Here are our greatest heroes of the month:",
                "Monthly LP",
                "Monthly statistics have been reset.",
            ),
        };

        let embed = CreateEmbed::new()
            .title(title)
            .description(description)
            .color(CHAMPION_COLOR)
            .field(
                "🧗 Climber",
                champion_field(&snapshot.climber, points_unit),
                true,
            )
            .field(
                "🎤 Host",
                champion_field(&snapshot.host, "Points"),
                true,
            )
            .field(
                "🚀 Explorer",
                champion_field(&snapshot.explorer, "Expeditions"),
                true,
            )
            .footer(CreateEmbedFooter::new(footer));

        ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await?;

        Ok(())
    }

    async fn report_operator(&self, channel_id: u64, message: &str) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(message.to_string()))
            .await?;

        Ok(())
    }
}

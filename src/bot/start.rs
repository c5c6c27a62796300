use serenity::all::{
    ActivityData, Client, ComponentInteraction, Context, CreateInteractionResponseFollowup,
    EventHandler, GatewayIntents, Interaction, Ready,
};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::bot::commands;
use crate::config::Config;
use crate::error::AppError;
use crate::model::giveaway::JoinOutcome;
use crate::service::gateway::SerenityGateway;
use crate::service::giveaway::GiveawayService;
use crate::state::AppState;

/// Custom ID of the giveaway join button. Component interactions are routed
/// by this opaque prefix.
pub const GIVEAWAY_JOIN_ID: &str = "gw_join";

/// Discord bot event handler
struct Handler {
    state: AppState,
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("{} is connected to Discord!", ready.user.name);

        ctx.set_activity(Some(ActivityData::custom("Guarding the summit 🏔️")));

        if let Err(e) = commands::register_all(&ctx).await {
            tracing::error!("Failed to register commands: {}", e);
        }
    }

    /// Called for every slash command and component interaction
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => {
                commands::dispatch(&self.state, &ctx, command).await;
            }
            Interaction::Component(component)
                if component.data.custom_id.starts_with(GIVEAWAY_JOIN_ID) =>
            {
                handle_giveaway_join(&self.state, &ctx, component).await;
            }
            _ => {}
        }
    }
}

/// Handles a press of the giveaway join button.
///
/// The interaction's message IS the giveaway key. Replies are ephemeral so
/// rejected entries do not clutter the channel.
async fn handle_giveaway_join(state: &AppState, ctx: &Context, component: ComponentInteraction) {
    if let Err(e) = component.defer_ephemeral(&ctx.http).await {
        tracing::error!("Failed to defer giveaway join: {}", e);
        return;
    }

    let message_id = component.message.id.get().to_string();
    let entrant_id = component.user.id.get().to_string();
    let entrant_roles: Vec<u64> = component
        .member
        .as_ref()
        .map(|member| member.roles.iter().map(|role| role.get()).collect())
        .unwrap_or_default();

    let gateway = Arc::new(SerenityGateway::new(ctx.http.clone()));
    let service = GiveawayService::new(&state.db, gateway);

    let content = match service.join(&message_id, &entrant_id, &entrant_roles).await {
        Ok(JoinOutcome::Joined { .. }) => "✅ **You have joined the giveaway!**".to_string(),
        Ok(JoinOutcome::AlreadyEntered) => "ℹ️ You have already entered this giveaway.".to_string(),
        Err(e) => e.user_message(),
    };

    if let Err(e) = component
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .content(content)
                .ephemeral(true),
        )
        .await
    {
        tracing::error!("Failed to reply to giveaway join: {}", e);
    }
}

/// Builds the Discord client and hands back its HTTP handle.
///
/// The HTTP handle outlives the gateway connection and is what the
/// schedulers use for announcements.
///
/// # Arguments
/// - `config` - Application configuration with the bot token
/// - `state` - Shared handler state
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - Built client and its HTTP handle
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(config: &Config, state: AppState) -> Result<(Client, Arc<Http>), AppError> {
    // GUILD_MEMBERS is a privileged intent - must be enabled in the Discord
    // Developer Portal. It backs the eligibility re-checks at draw time.
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::GUILD_MEMBERS;

    let handler = Handler { state };

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    let http = client.http.clone();

    Ok((client, http))
}

/// Starts the Discord bot in a blocking manner
///
/// This function should be called from within a tokio::spawn task since it
/// will block until the bot shuts down.
///
/// # Arguments
/// - `client` - Client built by `init_bot`
///
/// # Returns
/// - `Ok(())` if the bot runs to a clean shutdown
/// - `Err(AppError)` if the gateway connection fails
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}

//! /verify and /unverify - the identity link commands.

use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    EditInteractionResponse,
};

use crate::bot::commands::str_option;
use crate::error::AppError;
use crate::service::verify::VerifyService;
use crate::state::AppState;

/// Builds the /verify command.
pub fn register_verify() -> CreateCommand {
    CreateCommand::new("verify")
        .description("Link your Roblox account")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "username", "Your Roblox username")
                .required(true),
        )
}

/// Builds the /unverify command.
pub fn register_unverify() -> CreateCommand {
    CreateCommand::new("unverify").description("Remove your Roblox account link")
}

/// Handles /verify.
pub async fn run_verify(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    command.defer_ephemeral(&ctx.http).await?;

    let options = command.data.options();
    let reply = match str_option(&options, "username") {
        Some(username) => {
            let service = VerifyService::new(&state.db, state.roblox.clone());
            match service
                .link(&command.user.id.get().to_string(), username)
                .await
            {
                Ok(record) => format!(
                    "✅ Linked to **{}**! Welcome to the expedition.",
                    record.roblox_username
                ),
                Err(e) => e.user_message(),
            }
        }
        None => AppError::InvalidArgument("Username is required.".to_string()).user_message(),
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(reply))
        .await?;

    Ok(())
}

/// Handles /unverify.
pub async fn run_unverify(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    command.defer_ephemeral(&ctx.http).await?;

    let service = VerifyService::new(&state.db, state.roblox.clone());
    let reply = match service.unlink(&command.user.id.get().to_string()).await {
        Ok(record) => format!(
            "✅ Removed the link to **{}**. Your progression record has been deleted.",
            record.roblox_username
        ),
        Err(e) => e.user_message(),
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(reply))
        .await?;

    Ok(())
}

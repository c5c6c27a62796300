//! /giveaway - start, end, and reroll.

use std::sync::Arc;

use chrono::Utc;
use serenity::all::{
    ButtonStyle, CommandInteraction, CommandOptionType, Context, CreateActionRow, CreateButton,
    CreateCommand, CreateCommandOption, CreateMessage, EditInteractionResponse, Permissions,
};

use crate::bot::commands::{int_option, role_option, str_option, subcommand, user_option};
use crate::bot::start::GIVEAWAY_JOIN_ID;
use crate::error::AppError;
use crate::model::giveaway::{EndOutcome, StartGiveawayParam};
use crate::service::gateway::{self, SerenityGateway};
use crate::service::giveaway::GiveawayService;
use crate::state::AppState;
use crate::util::parse::parse_duration;

/// Builds the /giveaway command.
pub fn register() -> CreateCommand {
    CreateCommand::new("giveaway")
        .description("Manage giveaways in the server")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "start",
                "Start a new giveaway in this channel",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "duration",
                    "Duration (e.g. '1d', '6h', '30m')",
                )
                .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "winners", "Number of winners")
                    .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::String, "prize", "What is the prize?")
                    .required(true),
            )
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::User,
                "sponsor",
                "The member sponsoring this giveaway",
            ))
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::Role,
                "required_role",
                "Role required to enter",
            )),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "end",
                "End a running giveaway immediately and pick winner(s)",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "message_id",
                    "The message ID of the running giveaway",
                )
                .required(true),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "reroll",
                "Reroll new winner(s) from an ended giveaway",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "message_id",
                    "The message ID of the ended giveaway",
                )
                .required(true),
            )
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "amount",
                "Number of new winners to pick (default 1)",
            )),
        )
}

/// Handles /giveaway.
pub async fn run(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    command.defer_ephemeral(&ctx.http).await?;

    let options = command.data.options();
    let reply = match subcommand(&options) {
        Ok(("start", args)) => start_reply(state, ctx, command, args).await,
        Ok(("end", args)) => end_reply(state, ctx, args).await,
        Ok(("reroll", args)) => reroll_reply(state, ctx, args).await,
        Ok((other, _)) => Err(AppError::InvalidArgument(format!(
            "Unknown subcommand '{}'.",
            other
        ))),
        Err(e) => Err(e),
    };

    let content = reply.unwrap_or_else(|e| e.user_message());
    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await?;

    Ok(())
}

async fn start_reply(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
    args: &[serenity::all::ResolvedOption<'_>],
) -> Result<String, AppError> {
    let guild_id = command.guild_id.ok_or_else(|| {
        AppError::InvalidArgument("Giveaways can only be started in a server.".to_string())
    })?;

    let duration = str_option(args, "duration")
        .ok_or_else(|| AppError::InvalidArgument("Duration is required.".to_string()))?;
    let winner_count = int_option(args, "winners")
        .ok_or_else(|| AppError::InvalidArgument("Winner count is required.".to_string()))?;
    let prize = str_option(args, "prize")
        .ok_or_else(|| AppError::InvalidArgument("Prize is required.".to_string()))?;
    let sponsor_id = user_option(args, "sponsor").map(|user| user.id.get().to_string());
    let required_role_id = role_option(args, "required_role").map(|role| role.id.get().to_string());

    let winner_count = u32::try_from(winner_count).ok().filter(|count| *count >= 1).ok_or_else(
        || AppError::InvalidArgument("Winner count must be at least 1.".to_string()),
    )?;

    // Validate the duration before anything is posted; the announcement must
    // never exist for a giveaway that was rejected.
    let parsed = parse_duration(duration)?;
    let end_time_ms = Utc::now().timestamp_millis() + parsed.num_milliseconds();

    let embed = gateway::giveaway_embed(
        prize,
        winner_count,
        end_time_ms,
        sponsor_id.as_deref(),
        required_role_id.as_deref(),
        0,
    );
    let join_button = CreateButton::new(GIVEAWAY_JOIN_ID)
        .label("Join")
        .style(ButtonStyle::Success)
        .emoji('🎉');

    let message = command
        .channel_id
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .embed(embed)
                .components(vec![CreateActionRow::Buttons(vec![join_button])]),
        )
        .await?;

    let service = GiveawayService::new(&state.db, Arc::new(SerenityGateway::new(ctx.http.clone())));
    service
        .start(StartGiveawayParam {
            message_id: message.id.get().to_string(),
            channel_id: command.channel_id.get().to_string(),
            guild_id: guild_id.get().to_string(),
            prize: prize.to_string(),
            winner_count,
            duration: duration.to_string(),
            sponsor_id,
            required_role_id,
        })
        .await?;

    Ok("✅ Giveaway started successfully!".to_string())
}

async fn end_reply(
    state: &AppState,
    ctx: &Context,
    args: &[serenity::all::ResolvedOption<'_>],
) -> Result<String, AppError> {
    let message_id = str_option(args, "message_id")
        .ok_or_else(|| AppError::InvalidArgument("Message ID is required.".to_string()))?;

    let service = GiveawayService::new(&state.db, Arc::new(SerenityGateway::new(ctx.http.clone())));
    let outcome = service.end(message_id).await?;

    Ok(match outcome {
        EndOutcome::Drawn { .. } => "✅ Giveaway has been ended.".to_string(),
        EndOutcome::NoValidEntrants => {
            "✅ Giveaway ended. No valid participants remained.".to_string()
        }
        EndOutcome::MessageMissing => {
            "⚠️ The giveaway message was deleted; it has been closed without a draw.".to_string()
        }
    })
}

async fn reroll_reply(
    state: &AppState,
    ctx: &Context,
    args: &[serenity::all::ResolvedOption<'_>],
) -> Result<String, AppError> {
    let message_id = str_option(args, "message_id")
        .ok_or_else(|| AppError::InvalidArgument("Message ID is required.".to_string()))?;
    let amount = int_option(args, "amount").unwrap_or(1);
    let amount = u32::try_from(amount).ok().filter(|count| *count >= 1).ok_or_else(|| {
        AppError::InvalidArgument("Reroll amount must be at least 1.".to_string())
    })?;

    let service = GiveawayService::new(&state.db, Arc::new(SerenityGateway::new(ctx.http.clone())));
    let winners = service.reroll(message_id, amount).await?;

    Ok(format!("✅ Successfully re-rolled {} winner(s).", winners.len()))
}

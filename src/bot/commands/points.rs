//! /xp and /guide - the four-action ledger commands.

use std::str::FromStr;
use std::sync::Arc;

use serenity::all::{
    ChannelId, CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateEmbed, CreateMessage, EditInteractionResponse, Permissions,
};

use crate::bot::commands::{int_option, str_option, subcommand, user_option};
use crate::data::user::UserRepository;
use crate::error::AppError;
use crate::model::points::{ActionContext, Difficulty, PointsAction};
use crate::service::gateway::{SerenityGateway, EMBED_COLOR};
use crate::service::points::{PointsOutcome, PointsService};
use crate::service::rank_sync::RankSyncService;
use crate::state::AppState;

fn username_option() -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "username", "Roblox username")
        .required(true)
}

fn member_option() -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::User, "member", "The linked Discord member")
        .required(true)
}

fn amount_option() -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Integer, "amount", "Points amount").required(true)
}

fn expedition_options(sub: CreateCommandOption) -> CreateCommandOption {
    sub.add_sub_option(username_option())
        .add_sub_option(amount_option())
        .add_sub_option(CreateCommandOption::new(
            CommandOptionType::String,
            "mountain",
            "Mountain name",
        ))
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "difficulty", "Expedition difficulty")
                .add_string_choice("Easy", "Easy")
                .add_string_choice("Medium", "Medium")
                .add_string_choice("Hard", "Hard")
                .add_string_choice("Extreme", "Extreme"),
        )
}

/// Builds the /xp command.
pub fn register_xp() -> CreateCommand {
    CreateCommand::new("xp")
        .description("Manage user Lunar Points (Admin only)")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(expedition_options(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "add",
            "Add Lunar Points and expedition count",
        )))
        .add_option(expedition_options(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "remove",
            "Remove Lunar Points and expedition count",
        )))
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "set", "Set Lunar Points")
                .add_sub_option(username_option())
                .add_sub_option(amount_option()),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "bonus",
                "Give bonus Lunar Points without adding expedition count",
            )
            .add_sub_option(username_option())
            .add_sub_option(amount_option())
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::String,
                "reason",
                "Optional reason for the bonus",
            )),
        )
}

/// Builds the /guide command.
pub fn register_guide() -> CreateCommand {
    let sub = |name: &str, description: &str| {
        CreateCommandOption::new(CommandOptionType::SubCommand, name, description)
            .add_sub_option(member_option())
            .add_sub_option(amount_option())
    };

    CreateCommand::new("guide")
        .description("Manage a linked member's Guide Points (Guide Manager only)")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(sub("add", "Add Guide Points to a linked member"))
        .add_option(sub("remove", "Remove Guide Points from a linked member"))
        .add_option(sub("set", "Set Guide Points for a linked member"))
        .add_option(sub("bonus", "Give bonus Guide Points to a linked member"))
}

/// Handles /xp.
pub async fn run_xp(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    command.defer(&ctx.http).await?;

    let reply = match xp_reply(state, ctx, command).await {
        Ok(message) => message,
        Err(e) => e.user_message(),
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(reply))
        .await?;

    Ok(())
}

async fn xp_reply(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<String, AppError> {
    let options = command.data.options();
    let (sub_name, args) = subcommand(&options)?;
    let action = PointsAction::from_str(sub_name)?;

    let username = str_option(args, "username")
        .ok_or_else(|| AppError::InvalidArgument("Username is required.".to_string()))?;
    let amount = int_option(args, "amount")
        .ok_or_else(|| AppError::InvalidArgument("Amount is required.".to_string()))?;
    let context = ActionContext {
        mountain: str_option(args, "mountain").map(str::to_string),
        difficulty: str_option(args, "difficulty")
            .map(Difficulty::from_str)
            .transpose()?,
    };

    let profile = state
        .roblox
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound("Roblox user not found.".to_string()))?;

    if state
        .roblox
        .get_rank_in_group(profile.id, state.roblox_group_id)
        .await?
        .is_none()
    {
        return Err(AppError::Ineligible(
            "User is not in the community group.".to_string(),
        ));
    }

    let service = PointsService::new(&state.db, &state.levels);
    let outcome = service
        .apply_points_action(
            &profile.id.to_string(),
            &profile.name,
            action,
            amount,
            &context,
        )
        .await?;

    // The write above is durable; rank sync is a detached best-effort
    // side effect that must not touch the reply path.
    if outcome.leveled() {
        let gateway = Arc::new(SerenityGateway::new(ctx.http.clone()));
        let sync = Arc::new(RankSyncService::new(
            state.roblox.clone(),
            gateway,
            state.levels.climbing.clone(),
            state.roblox_group_id,
            state.points_log_channel_id,
        ));
        sync.spawn(profile.id, outcome.record.xp);
    }

    log_action(
        state,
        ctx,
        command,
        "Lunar Points",
        action,
        amount,
        outcome.record.xp,
        &outcome,
        &context,
    )
    .await;

    let level_msg = if outcome.leveled() {
        format!(
            " 🎉 **{} has leveled up to {}!**",
            profile.name, outcome.new_tier.name
        )
    } else {
        String::new()
    };

    let reply = if action == PointsAction::Bonus {
        let mut message = format!(
            "✅ Gave **{}** bonus Lunar Points to **{}**.{}",
            amount, profile.name, level_msg
        );
        if let Some(reason) = str_option(args, "reason") {
            message.push_str(&format!("\n*Reason: {}*", reason));
        }
        message
    } else {
        format!(
            "✅ Successfully performed '{}' action with {} Lunar Points for **{}**.{}",
            sub_name, amount, profile.name, level_msg
        )
    };

    Ok(reply)
}

/// Handles /guide.
pub async fn run_guide(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), AppError> {
    command.defer(&ctx.http).await?;

    let reply = match guide_reply(state, ctx, command).await {
        Ok(message) => message,
        Err(e) => e.user_message(),
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(reply))
        .await?;

    Ok(())
}

async fn guide_reply(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<String, AppError> {
    let options = command.data.options();
    let (sub_name, args) = subcommand(&options)?;
    let action = PointsAction::from_str(sub_name)?;

    let member = user_option(args, "member")
        .ok_or_else(|| AppError::InvalidArgument("Member is required.".to_string()))?;
    let amount = int_option(args, "amount")
        .ok_or_else(|| AppError::InvalidArgument("Amount is required.".to_string()))?;

    let repo = UserRepository::new(&state.db);
    let record = repo
        .find_by_discord_id(&member.id.get().to_string())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "User <@{}> is not linked to a Roblox account.",
                member.id.get()
            ))
        })?;

    let service = PointsService::new(&state.db, &state.levels);
    let outcome = service
        .apply_guide_action(&record.roblox_id, &record.roblox_username, action, amount)
        .await?;

    log_action(
        state,
        ctx,
        command,
        "Guide Points",
        action,
        amount,
        outcome.record.guide_points,
        &outcome,
        &ActionContext::none(),
    )
    .await;

    let level_msg = if outcome.leveled() {
        format!(
            " 🎉 **{} is now a {}!**",
            outcome.record.roblox_username, outcome.new_tier.name
        )
    } else {
        String::new()
    };

    Ok(format!(
        "✅ Successfully performed '{}' action with {} Guide Points for **{}**.{}",
        sub_name, amount, outcome.record.roblox_username, level_msg
    ))
}

/// Sends the audit record to the points log channel. Best-effort: a failed
/// send is logged and never fails the command.
async fn log_action(
    state: &AppState,
    ctx: &Context,
    command: &CommandInteraction,
    unit: &str,
    action: PointsAction,
    amount: i64,
    new_total: i64,
    outcome: &PointsOutcome,
    context: &ActionContext,
) {
    tracing::info!(
        "{} {} {} for {} ({}) by {}",
        action.label(),
        amount,
        unit,
        outcome.record.roblox_username,
        outcome.record.roblox_id,
        command.user.tag()
    );

    let mut embed = CreateEmbed::new()
        .title(format!("📊 {} Log ({})", unit, action.label()))
        .color(EMBED_COLOR)
        .field("Action", action.label(), true)
        .field("Amount", amount.to_string(), true)
        .field(
            "Target",
            format!(
                "{} ({})",
                outcome.record.roblox_username, outcome.record.roblox_id
            ),
            true,
        )
        .field("By", command.user.tag(), true)
        .field("New Total", new_total.to_string(), true)
        .field("New Expeditions", outcome.record.expeditions.to_string(), true);

    if let Some(mountain) = &context.mountain {
        embed = embed.field("Mountain", mountain.clone(), true);
    }
    if let Some(difficulty) = context.difficulty {
        embed = embed.field("Difficulty", difficulty.as_str(), true);
    }

    if let Err(e) = ChannelId::new(state.points_log_channel_id)
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        tracing::error!("Failed to send points log: {}", e);
    }
}

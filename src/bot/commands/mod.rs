//! Slash command registration and dispatch.
//!
//! Thin glue between Discord interactions and the services: each handler
//! defers, extracts typed options, calls the service, and replies with
//! either the confirmation or the error's user message. Unexpected faults
//! are caught at the dispatch boundary and logged in full.

pub mod giveaway;
pub mod points;
pub mod verify;

use serenity::all::{
    Command, CommandInteraction, Context, ResolvedOption, ResolvedValue, Role, User,
};

use crate::error::AppError;
use crate::state::AppState;

/// Registers all global slash commands.
///
/// # Arguments
/// - `ctx` - Gateway context from the ready event
///
/// # Returns
/// - `Ok(())` - Commands registered
/// - `Err(AppError)` - Discord rejected the registration
pub async fn register_all(ctx: &Context) -> Result<(), AppError> {
    Command::set_global_commands(
        &ctx.http,
        vec![
            points::register_xp(),
            points::register_guide(),
            giveaway::register(),
            verify::register_verify(),
            verify::register_unverify(),
        ],
    )
    .await?;

    tracing::info!("Registered global slash commands");

    Ok(())
}

/// Routes a command interaction to its handler.
///
/// The outermost error boundary: a handler failure is logged with full
/// detail and never propagates into the gateway task.
pub async fn dispatch(state: &AppState, ctx: &Context, command: CommandInteraction) {
    let name = command.data.name.clone();

    let result = match name.as_str() {
        "xp" => points::run_xp(state, ctx, &command).await,
        "guide" => points::run_guide(state, ctx, &command).await,
        "giveaway" => giveaway::run(state, ctx, &command).await,
        "verify" => verify::run_verify(state, ctx, &command).await,
        "unverify" => verify::run_unverify(state, ctx, &command).await,
        other => {
            tracing::warn!("received unknown command '{}'", other);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("command '{}' failed: {}", name, e);
    }
}

/// Finds a string option by name.
pub(super) fn str_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::String(value) if opt.name == name => Some(*value),
        _ => None,
    })
}

/// Finds an integer option by name.
pub(super) fn int_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::Integer(value) if opt.name == name => Some(*value),
        _ => None,
    })
}

/// Finds a user option by name.
pub(super) fn user_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a User> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::User(user, _) if opt.name == name => Some(*user),
        _ => None,
    })
}

/// Finds a role option by name.
pub(super) fn role_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a Role> {
    options.iter().find_map(|opt| match &opt.value {
        ResolvedValue::Role(role) if opt.name == name => Some(*role),
        _ => None,
    })
}

/// Unwraps the invoked subcommand and its arguments.
pub(super) fn subcommand<'a>(
    options: &'a [ResolvedOption<'a>],
) -> Result<(&'a str, &'a [ResolvedOption<'a>]), AppError> {
    match options.first() {
        Some(opt) => match &opt.value {
            ResolvedValue::SubCommand(args) => Ok((opt.name, args.as_slice())),
            _ => Err(AppError::InvalidArgument("Missing subcommand.".to_string())),
        },
        None => Err(AppError::InvalidArgument("Missing subcommand.".to_string())),
    }
}

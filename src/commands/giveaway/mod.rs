use serenity::{
    all::{CommandInteraction, CommandOptionType, Message, ReactionType, UserId},
    builder::{CreateCommand, CreateCommandOption},
    prelude::Context as SerenityContext,
};
use tracing::error;

use crate::models::{
    command::{Command, CommandContext},
    handler::Handler,
    response::{ResponseError, ResponseResult},
};

pub mod end;
pub mod reroll;
pub mod start;

const EMBED_COLOR: u32 = 0x9509dc;
const ENTRY_EMOJI: &str = "🎉";

// Discord serves reaction users in pages of at most 100.
const REACTION_PAGE_SIZE: u8 = 100;

fn entry_reaction() -> ReactionType {
    ReactionType::Unicode(ENTRY_EMOJI.to_string())
}

/// Collects the ids of every user who reacted with the entry emoji on the
/// announcement message, excluding bot accounts.
async fn fetch_participants(
    ctx: &SerenityContext,
    message: &Message,
) -> Result<Vec<UserId>, ResponseError> {
    let mut participants = Vec::new();
    let mut after: Option<UserId> = None;

    loop {
        let page = match message
            .reaction_users(
                &ctx.http,
                entry_reaction(),
                Some(REACTION_PAGE_SIZE),
                after,
            )
            .await
        {
            Ok(users) => users,
            Err(err) => {
                error!(
                    "Could not fetch the entry reactions on message {}. Failed with error: {err}",
                    message.id
                );
                return Err(ResponseError::Serenity(err));
            }
        };

        let Some(last) = page.last() else {
            break;
        };
        after = Some(last.id);

        let full_page = page.len() == usize::from(REACTION_PAGE_SIZE);
        participants.extend(
            page.into_iter()
                .filter(|user| !user.bot)
                .map(|user| user.id),
        );
        if !full_page {
            break;
        }
    }

    Ok(participants)
}

fn winner_text(winners: &[UserId]) -> String {
    if winners.is_empty() {
        "No valid participants".to_string()
    } else {
        winners
            .iter()
            .map(|id| format!("<@{id}>"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct GiveawayCommand;

#[async_trait::async_trait]
impl Command for GiveawayCommand {
    fn name(&self) -> &'static str {
        "giveaway"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("giveaway")
            .description("Run timed giveaways")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "start",
                    "Start a new giveaway",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Channel,
                        "channel",
                        "The channel to run the giveaway in",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "duration",
                        "The duration of the giveaway (e.g. 10m, 2h, 1d)",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "prize",
                        "The prize for the giveaway",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "winners",
                        "The number of winners for the giveaway",
                    )
                    .required(true),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "end",
                    "End an active giveaway early",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "id",
                        "The message ID of the giveaway to end",
                    )
                    .required(true),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "reroll",
                    "Reroll the winners of an ended giveaway",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "id",
                        "The message ID of the giveaway to reroll",
                    )
                    .required(true),
                ),
            )
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        if !handler.has_giveaway_role(&ctx.member_roles) {
            return Err(ResponseError::Execution(
                "You do not have the required role to use this command",
                None,
            ));
        }

        for option in &cmd.data.options {
            match option.name.as_str() {
                "start" => return start::start(handler, ctx, cmd).await,
                "end" => return end::end(handler, ctx, cmd).await,
                "reroll" => return reroll::reroll(handler, ctx, cmd).await,
                _ => continue,
            }
        }

        Err(ResponseError::Execution(
            "Invalid command",
            Some("You must specify a subcommand to use this command!".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serenity::all::UserId;

    use super::winner_text;

    #[test]
    fn renders_winner_mentions() {
        let winners = vec![UserId::new(11), UserId::new(22)];
        assert_eq!(winner_text(&winners), "<@11>, <@22>");
    }

    #[test]
    fn renders_the_empty_draw() {
        assert_eq!(winner_text(&[]), "No valid participants");
    }
}

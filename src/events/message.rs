use serenity::all::{ChannelId, Message, MessageId};
use serenity::prelude::Context;
use tracing::error;

use crate::{
    commands::giveaway::{
        end::end_giveaway, reroll::reroll_giveaway, start::start_giveaway,
    },
    common::duration::Duration,
    models::{handler::Handler, response::ResponseError},
};

struct StartArgs {
    channel_id: ChannelId,
    duration: Duration,
    winner_count: u32,
    prize: String,
}

impl Handler {
    /// The text-prefixed command surface. Parses `gstart` / `gend` / `greroll`
    /// lines and delegates to the same lifecycle functions as the slash
    /// commands.
    pub async fn on_message(&self, ctx: Context, message: Message) {
        if message.author.bot {
            return;
        }
        let Some((command, args)) = parse_prefix_line(&self.prefix, &message.content) else {
            return;
        };
        if !matches!(command.as_str(), "gstart" | "gend" | "greroll") {
            return;
        }

        if message.guild_id.is_none() {
            reply_to(&ctx, &message, "Tombola cannot be used outside of guilds.").await;
            return;
        }

        let member_roles = message
            .member
            .as_ref()
            .map(|member| member.roles.clone())
            .unwrap_or_default();
        if !self.has_giveaway_role(&member_roles) {
            reply_to(
                &ctx,
                &message,
                "You do not have the required role to use this command.",
            )
            .await;
            return;
        }

        match command.as_str() {
            "gstart" => self.prefix_start(&ctx, &message, &args).await,
            "gend" => self.prefix_end(&ctx, &message, &args).await,
            "greroll" => self.prefix_reroll(&ctx, &message, &args).await,
            _ => {}
        }
    }

    async fn prefix_start(&self, ctx: &Context, message: &Message, args: &[&str]) {
        let parsed = match parse_start_args(args) {
            Ok(parsed) => parsed,
            Err(rejection) => {
                reply_to(ctx, message, rejection).await;
                return;
            }
        };

        match start_giveaway(
            self,
            ctx,
            parsed.channel_id,
            &parsed.duration,
            &parsed.prize,
            parsed.winner_count,
        )
        .await
        {
            Ok(_) => {
                reply_to(
                    ctx,
                    message,
                    format!("Giveaway started in <#{}>!", parsed.channel_id),
                )
                .await;
            }
            Err(err) => reply_to(ctx, message, prefix_error_text(&err)).await,
        }
    }

    async fn prefix_end(&self, ctx: &Context, message: &Message, args: &[&str]) {
        let Some(message_id) = args.first().and_then(|token| parse_message_token(token)) else {
            reply_to(ctx, message, "Please provide a giveaway message ID.").await;
            return;
        };

        match end_giveaway(self, ctx, message_id).await {
            Ok(()) => reply_to(ctx, message, "The giveaway has been ended!").await,
            Err(err) => reply_to(ctx, message, prefix_error_text(&err)).await,
        }
    }

    async fn prefix_reroll(&self, ctx: &Context, message: &Message, args: &[&str]) {
        let Some(message_id) = args.first().and_then(|token| parse_message_token(token)) else {
            reply_to(ctx, message, "Please provide an ended giveaway message ID.").await;
            return;
        };

        match reroll_giveaway(self, ctx, message_id).await {
            Ok(()) => reply_to(ctx, message, "The giveaway has been rerolled!").await,
            Err(err) => reply_to(ctx, message, prefix_error_text(&err)).await,
        }
    }
}

async fn reply_to(ctx: &Context, message: &Message, content: impl Into<String>) {
    if let Err(err) = message.reply(&ctx.http, content).await {
        error!("Failed to reply to a prefix command: {err}");
    }
}

fn prefix_error_text(err: &ResponseError) -> String {
    match err {
        ResponseError::Execution(title, _) => format!("{title}."),
        ResponseError::Serenity(_) => "Something went wrong while talking to Discord.".to_string(),
    }
}

fn parse_prefix_line<'a>(prefix: &str, content: &'a str) -> Option<(String, Vec<&'a str>)> {
    let stripped = content.strip_prefix(prefix)?;
    let mut parts = stripped.split_whitespace();
    let command = parts.next()?.to_lowercase();
    Some((command, parts.collect()))
}

// `gstart <#channel> <duration> <winners> <prize...>`
fn parse_start_args(args: &[&str]) -> Result<StartArgs, &'static str> {
    let Some(channel_id) = args.first().and_then(|token| parse_channel_token(token)) else {
        return Err("Please provide the channel for the giveaway.");
    };

    let duration = match args.get(1) {
        Some(token) => Duration::new(token),
        None => return Err("Please provide a duration for the giveaway."),
    };
    if duration.to_std().is_zero() {
        return Err("Please provide a valid duration, e.g. `10m`, `2h` or `1d`.");
    }

    let winner_count = match args.get(2).map(|token| token.parse::<u32>()) {
        Some(Ok(count)) if count >= 1 => count,
        _ => return Err("The number of winners must be a whole number of at least 1."),
    };

    let prize = args[3..].join(" ");
    if prize.is_empty() {
        return Err("Please provide a prize for the giveaway.");
    }

    Ok(StartArgs {
        channel_id,
        duration,
        winner_count,
        prize,
    })
}

fn parse_channel_token(token: &str) -> Option<ChannelId> {
    let id = token
        .strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(token);
    id.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(ChannelId::new)
}

fn parse_message_token(token: &str) -> Option<MessageId> {
    token
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(MessageId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_a_prefixed_line_into_command_and_args() {
        let (command, args) = parse_prefix_line("!", "!gstart <#10> 10m 2 Gift Card").unwrap();
        assert_eq!(command, "gstart");
        assert_eq!(args, vec!["<#10>", "10m", "2", "Gift", "Card"]);
    }

    #[test]
    fn lowercases_the_command_name() {
        let (command, _) = parse_prefix_line("!", "!GEnd 123").unwrap();
        assert_eq!(command, "gend");
    }

    #[test]
    fn ignores_unprefixed_lines() {
        assert!(parse_prefix_line("!", "gstart <#10> 10m 2 prize").is_none());
        assert!(parse_prefix_line("!", "").is_none());
        assert!(parse_prefix_line("!", "!").is_none());
    }

    #[test]
    fn parses_channel_mentions_and_raw_ids() {
        assert_eq!(parse_channel_token("<#123>"), Some(ChannelId::new(123)));
        assert_eq!(parse_channel_token("123"), Some(ChannelId::new(123)));
        assert_eq!(parse_channel_token("<#>"), None);
        assert_eq!(parse_channel_token("general"), None);
        assert_eq!(parse_channel_token("0"), None);
    }

    #[test]
    fn parses_a_full_start_line() {
        let parsed = parse_start_args(&["<#10>", "10m", "2", "Gift", "Card"]).unwrap();
        assert_eq!(parsed.channel_id, ChannelId::new(10));
        assert_eq!(parsed.duration.to_std(), std::time::Duration::from_secs(600));
        assert_eq!(parsed.winner_count, 2);
        assert_eq!(parsed.prize, "Gift Card");
    }

    #[test]
    fn rejects_a_missing_channel() {
        assert!(parse_start_args(&[]).is_err());
        assert!(parse_start_args(&["nowhere", "10m", "2", "prize"]).is_err());
    }

    #[test]
    fn rejects_a_bad_duration() {
        assert!(parse_start_args(&["<#10>", "soon", "2", "prize"]).is_err());
        assert!(parse_start_args(&["<#10>"]).is_err());
    }

    #[test]
    fn rejects_a_bad_winner_count() {
        assert!(parse_start_args(&["<#10>", "10m", "0", "prize"]).is_err());
        assert!(parse_start_args(&["<#10>", "10m", "-2", "prize"]).is_err());
        assert!(parse_start_args(&["<#10>", "10m", "many", "prize"]).is_err());
    }

    #[test]
    fn rejects_a_missing_prize() {
        assert!(parse_start_args(&["<#10>", "10m", "2"]).is_err());
    }

    #[test]
    fn message_ids_must_be_numeric() {
        assert_eq!(parse_message_token("123"), Some(MessageId::new(123)));
        assert_eq!(parse_message_token("abc"), None);
        assert_eq!(parse_message_token("0"), None);
    }
}

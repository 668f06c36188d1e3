use serenity::{
    all::{ChannelId, CommandInteraction, MessageId},
    builder::{CreateEmbed, CreateMessage},
    model::Timestamp,
    prelude::Context as SerenityContext,
};
use time::OffsetDateTime;
use tracing::{error, info};

use crate::{
    common::{duration::Duration, options::Options},
    models::{
        command::{CommandContext, CommandContextReply},
        giveaway::ActiveGiveaway,
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::{end::end_giveaway, entry_reaction, EMBED_COLOR, ENTRY_EMOJI};

/// Posts the announcement, seeds the entry reaction, schedules the one-shot
/// completion timer and registers the giveaway. Nothing is registered if the
/// announcement cannot be posted.
pub async fn start_giveaway(
    handler: &Handler,
    ctx: &SerenityContext,
    channel_id: ChannelId,
    duration: &Duration,
    prize: &str,
    winner_count: u32,
) -> Result<MessageId, ResponseError> {
    let length = duration.to_std();
    let ends_at = OffsetDateTime::now_utc() + length;

    let embed = CreateEmbed::new()
        .title("🎉 Giveaway")
        .description(format!(
            "**Prize:** {prize}\n**Duration:** {}\n**Winners:** {winner_count}\n**Ends:** <t:{}:R>\n\nReact with {ENTRY_EMOJI} to enter!",
            pretty_duration::pretty_duration(&length, None),
            ends_at.unix_timestamp()
        ))
        .color(EMBED_COLOR)
        .timestamp(Timestamp::now());

    let message = match channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        Ok(message) => message,
        Err(err) => {
            error!("Could not post the giveaway announcement in {channel_id}. Failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }
    };

    if let Err(err) = message.react(&ctx.http, entry_reaction()).await {
        error!(
            "Could not seed the entry reaction on giveaway {}. Failed with error: {err}",
            message.id
        );
        return Err(ResponseError::Serenity(err));
    }

    let message_id = message.id;
    let timer_handler = handler.clone();
    let timer_ctx = ctx.clone();
    let timer = tokio::spawn(async move {
        tokio::time::sleep(length).await;
        if let Err(err) = end_giveaway(&timer_handler, &timer_ctx, message_id).await {
            error!("Could not complete giveaway {message_id} when its timer fired: {err:?}");
        }
    });

    handler.store.register(
        message_id,
        ActiveGiveaway {
            channel_id,
            prize: prize.to_string(),
            winner_count,
            timer: timer.abort_handle(),
        },
    );
    info!("Started giveaway {message_id} in channel {channel_id}");

    Ok(message_id)
}

pub async fn start(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(channel) = options.get_channel("channel").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get giveaway channel",
            Some("Please provide the channel to run the giveaway in".to_string()),
        ));
    };

    let Some(duration_string) = options.get_string("duration").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get giveaway duration",
            Some("Please provide how long the giveaway should run for".to_string()),
        ));
    };
    let duration = Duration::new(&duration_string);
    if duration.to_std().is_zero() {
        return Err(ResponseError::Execution(
            "Invalid duration",
            Some("Durations look like `10m`, `2h` or `1d`".to_string()),
        ));
    }

    let Some(prize) = options.get_string("prize").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get giveaway prize",
            Some("Please provide the prize for the giveaway".to_string()),
        ));
    };

    let winner_count = match options.get_integer("winners").map(u32::try_from) {
        Some(Ok(count)) if count >= 1 => count,
        _ => {
            return Err(ResponseError::Execution(
                "Invalid winner count",
                Some("The number of winners must be at least 1".to_string()),
            ));
        }
    };

    start_giveaway(handler, &ctx.ctx, channel.id, &duration, &prize, winner_count).await?;

    ctx.reply(
        cmd,
        Response::new()
            .content(format!("Giveaway started in <#{}>!", channel.id))
            .ephemeral(true),
    )
    .await
}

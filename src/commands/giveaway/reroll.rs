use serenity::{
    all::{CommandInteraction, MessageId},
    builder::{CreateEmbed, CreateMessage, EditMessage},
    model::Timestamp,
    prelude::Context as SerenityContext,
};
use tracing::{error, info};

use crate::{
    common::{options::Options, picker::draw_winners},
    models::{
        command::{CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::{fetch_participants, winner_text, EMBED_COLOR};

/// Re-draws winners for an ended giveaway from the announcement message's
/// current reactions. The new draw is independent, so previous winners can win
/// again. The stored result message is edited in place; if it was deleted, a
/// replacement is posted and the ended record is repointed at it.
pub async fn reroll_giveaway(
    handler: &Handler,
    ctx: &SerenityContext,
    message_id: MessageId,
) -> ResponseResult {
    let Some(giveaway) = handler.store.lookup_ended(message_id) else {
        return Err(ResponseError::Execution(
            "Could not find an ended giveaway with that ID",
            None,
        ));
    };

    let message = match ctx.http.get_message(giveaway.channel_id, message_id).await {
        Ok(message) => message,
        Err(err) => {
            error!(
                "Could not fetch the announcement for giveaway {message_id}. Failed with error: {err}"
            );
            return Err(ResponseError::Execution(
                "Could not get the giveaway message",
                Some("The announcement message appears to be gone, so the giveaway cannot be rerolled".to_string()),
            ));
        }
    };

    let participants = fetch_participants(ctx, &message).await?;
    let winners = draw_winners(participants, giveaway.winner_count as usize);

    let embed = CreateEmbed::new()
        .title("🎉 Giveaway rerolled")
        .description(format!(
            "**Prize:** {}\n**New winners:** {}",
            giveaway.prize,
            winner_text(&winners)
        ))
        .color(EMBED_COLOR)
        .timestamp(Timestamp::now());

    match ctx
        .http
        .get_message(giveaway.channel_id, giveaway.result_message_id)
        .await
    {
        Ok(mut result_message) => {
            if let Err(err) = result_message
                .edit(&ctx.http, EditMessage::new().embed(embed))
                .await
            {
                error!(
                    "Could not edit the result message for giveaway {message_id}. Failed with error: {err}"
                );
                return Err(ResponseError::Serenity(err));
            }
        }
        Err(_) => {
            // The result message was deleted; post a replacement and remember
            // it for the next reroll.
            let replacement = match giveaway
                .channel_id
                .send_message(&ctx.http, CreateMessage::new().embed(embed))
                .await
            {
                Ok(message) => message,
                Err(err) => {
                    error!(
                        "Could not post a replacement result message for giveaway {message_id}. Failed with error: {err}"
                    );
                    return Err(ResponseError::Serenity(err));
                }
            };
            handler
                .store
                .update_result_message(message_id, replacement.id);
        }
    }

    info!("Rerolled giveaway {message_id} with {} winner(s)", winners.len());

    Ok(())
}

pub async fn reroll(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(id_string) = options.get_string("id").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get giveaway ID",
            Some("Please provide the message ID of the giveaway".to_string()),
        ));
    };

    let Some(message_id) = id_string
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(MessageId::new)
    else {
        return Err(ResponseError::Execution(
            "Could not get giveaway ID",
            Some("The giveaway ID must be the announcement message ID".to_string()),
        ));
    };

    reroll_giveaway(handler, &ctx.ctx, message_id).await?;

    ctx.reply(
        cmd,
        Response::new()
            .content("The giveaway has been rerolled!".to_string())
            .ephemeral(true),
    )
    .await
}

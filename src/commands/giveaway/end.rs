use serenity::{
    all::{CommandInteraction, MessageId},
    builder::{CreateEmbed, CreateMessage},
    model::Timestamp,
    prelude::Context as SerenityContext,
};
use time::OffsetDateTime;
use tracing::{error, info};

use crate::{
    common::{options::Options, picker::draw_winners},
    models::{
        command::{CommandContext, CommandContextReply},
        giveaway::EndedGiveaway,
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::{fetch_participants, winner_text, EMBED_COLOR};

/// Completes a giveaway: draws winners from the entry reactions and posts the
/// result message. Invoked by the timer, the slash command and the prefix
/// command alike. The active record is removed up front, so whichever caller
/// arrives second finds nothing and no-ops.
pub async fn end_giveaway(
    handler: &Handler,
    ctx: &SerenityContext,
    message_id: MessageId,
) -> ResponseResult {
    let Some(giveaway) = handler.store.complete(message_id) else {
        return Err(ResponseError::Execution(
            "Could not find an active giveaway with that ID",
            None,
        ));
    };
    giveaway.timer.abort();

    let message = match ctx.http.get_message(giveaway.channel_id, message_id).await {
        Ok(message) => message,
        Err(err) => {
            error!(
                "Could not fetch the announcement for giveaway {message_id}. Failed with error: {err}"
            );
            return Err(ResponseError::Execution(
                "Could not get the giveaway message",
                Some("The announcement message appears to be gone, so the giveaway cannot be completed".to_string()),
            ));
        }
    };

    let participants = fetch_participants(ctx, &message).await?;
    let winners = draw_winners(participants, giveaway.winner_count as usize);

    let embed = CreateEmbed::new()
        .title("🎉 Giveaway ended")
        .description(format!(
            "**Prize:** {}\n**Winners:** {}",
            giveaway.prize,
            winner_text(&winners)
        ))
        .color(EMBED_COLOR)
        .timestamp(Timestamp::now());

    let result_message = match giveaway
        .channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        Ok(message) => message,
        Err(err) => {
            error!(
                "Could not post the results for giveaway {message_id}. Failed with error: {err}"
            );
            return Err(ResponseError::Serenity(err));
        }
    };

    handler.store.record_ended(
        message_id,
        EndedGiveaway {
            channel_id: giveaway.channel_id,
            prize: giveaway.prize,
            winner_count: giveaway.winner_count,
            ended_at: OffsetDateTime::now_utc(),
            result_message_id: result_message.id,
        },
    );
    info!("Ended giveaway {message_id} with {} winner(s)", winners.len());

    Ok(())
}

pub async fn end(
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

    end_giveaway(handler, &ctx.ctx, message_id).await?;

    ctx.reply(
        cmd,
        Response::new()
            .content("The giveaway has been ended!".to_string())
            .ephemeral(true),
    )
    .await
}

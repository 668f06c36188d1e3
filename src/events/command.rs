use std::sync::atomic::AtomicBool;

use serenity::{
    all::CommandInteraction, builder::CreateEmbed, prelude::Context as IncomingContext,
};
use tracing::{debug, error};

use crate::{
    commands::get_command_list,
    models::{
        command::{CommandContext, CommandContextReply, FailedCommandContext},
        handler::Handler,
        response::{Response, ResponseError},
    },
};

const ERROR_COLOR: u32 = 0xf38ba8;

impl Handler {
    pub async fn on_command(&self, ctx: IncomingContext, command: CommandInteraction) {
        let start = std::time::Instant::now();

        if command.guild_id.is_none() {
            let fail_context = FailedCommandContext { ctx };
            if let Err(err) = fail_context
                .reply(
                    &command,
                    Response::new()
                        .content("Tombola cannot be used outside of guilds".to_string()),
                )
                .await
            {
                error!("Failed to reply to command: {:?}", err);
            }
            return;
        }

        let member_roles = command
            .member
            .as_ref()
            .map(|member| member.roles.clone())
            .unwrap_or_default();

        let command_context = CommandContext {
            ctx,
            has_responsed: AtomicBool::new(false),
            member_roles,
        };

        for existing_command in get_command_list() {
            if existing_command.name() == command.data.name {
                if let Err(err) = existing_command
                    .router(self, &command_context, &command)
                    .await
                {
                    self.report_command_error(&command_context, &command, err)
                        .await;
                }
            }
        }

        debug!("Took {:?} to handle a command", start.elapsed());
    }

    // Every failure surfaces to the caller here, so both not-found outcomes
    // and validation rejections read the same from either surface.
    async fn report_command_error(
        &self,
        ctx: &CommandContext,
        command: &CommandInteraction,
        err: ResponseError,
    ) {
        let response = match err {
            ResponseError::Execution(title, description) => Response::new()
                .embed(
                    CreateEmbed::new()
                        .title(title)
                        .description(description.unwrap_or_default())
                        .color(ERROR_COLOR),
                )
                .ephemeral(true),
            ResponseError::Serenity(err) => {
                error!("Command failed with a Discord API error: {err}");
                Response::new()
                    .content("Something went wrong while talking to Discord".to_string())
                    .ephemeral(true)
            }
        };

        if let Err(err) = ctx.reply(command, response).await {
            error!("Failed to report a command failure: {:?}", err);
        }
    }
}

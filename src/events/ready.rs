use serenity::{all::Command, gateway::ActivityData, model::prelude::Ready, prelude::Context};
use tracing::{error, info};

use crate::{commands::get_command_list, models::handler::Handler};

impl Handler {
    pub async fn on_ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected", ready.user.name);

        ctx.set_activity(Some(ActivityData::watching("the giveaways")));

        let mut registered = vec![];
        for command in get_command_list() {
            match Command::create_global_command(&ctx.http, command.register()).await {
                Ok(_) => registered.push(command.name()),
                Err(err) => error!(
                    "Attempted to register command {} but failed with error: {}",
                    command.name(),
                    err
                ),
            }
        }
        info!(
            "Registered commands: {}. {} is ready!",
            registered.join(", "),
            ready.user.name
        );
    }
}

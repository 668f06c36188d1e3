#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::unreadable_literal)]

use std::{env, sync::Arc, time::Instant};

use serenity::{prelude::GatewayIntents, Client};
use tracing::{error, info};

mod commands;
mod common;
mod events;
mod liveness;
mod models;

use models::{giveaway::GiveawayStore, handler::Handler};

#[tokio::main]
async fn main() {
    let log_level = match env::var("DEBUG").unwrap_or(false.to_string()).as_str() {
        "true" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Getting environment variables");
    let discord_token = env::var("DISCORD_TOKEN").unwrap();
    let prefix = env::var("PREFIX").unwrap_or("!".to_string());
    let giveaway_role = env::var("GIVEAWAY_ROLE").unwrap_or("1404155296158584904".to_string());
    let port = env::var("PORT").unwrap_or("3000".to_string());

    let handler = Handler {
        store: Arc::new(GiveawayStore::new()),
        giveaway_role: giveaway_role.parse().unwrap(),
        prefix,
        start_time: Instant::now(),
    };

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&discord_token, intents)
        .event_handler(handler.clone())
        .await
        .unwrap();

    tokio::spawn(liveness::serve(handler, port.parse().unwrap()));

    if let Err(err) = client.start_autosharded().await {
        error!(
            "Attempted to start the Tombola Discord client, but failed with error: {}",
            err
        );
        std::process::exit(1);
    }
}

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{extract::State, routing::get, Router};
use tracing::info;

use crate::models::handler::Handler;

/// Uptime probe for the host. Not part of the giveaway logic; a single
/// unauthenticated read used by the process supervisor.
pub async fn serve(handler: Handler, port: u16) {
    let app = Router::new().route("/", get(status)).with_state(handler);

    let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), port);
    let listener = tokio::net::TcpListener::bind(bind_addr).await.unwrap();
    info!("Liveness endpoint listening on {bind_addr}");
    axum::serve(listener, app).await.unwrap();
}

async fn status(State(handler): State<Handler>) -> String {
    format!(
        "Tombola is running! Uptime: {}, giveaways: {} active / {} ended.",
        pretty_duration::pretty_duration(&handler.start_time.elapsed(), None),
        handler.store.active_count(),
        handler.store.ended_count(),
    )
}

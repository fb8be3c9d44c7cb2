use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use shared::domain::{Game, GameId};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod config;

use config::load_settings;

#[derive(Clone)]
struct AppState {
    drafts: Arc<Vec<Game>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let state = AppState {
        drafts: Arc::new(seed_drafts()),
    };
    let app = build_router(state);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/healthz", get(healthz))
        .route("/api/drafts", get(list_drafts))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn list_drafts(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.drafts.as_ref().clone())
}

fn seed_drafts() -> Vec<Game> {
    vec![
        Game {
            id: GameId(1),
            title: "Neon Syndicate Showdown".into(),
            description: "Cyber ninjas draft augmented abilities to control Neo Tokyo.".into(),
            players: vec!["Shin".into(), "Rowan".into(), "Ivy".into()],
        },
        Game {
            id: GameId(2),
            title: "Solstice Arena".into(),
            description: "Mages bend time shards to outsmart their rivals.".into(),
            players: vec!["Adira".into(), "Luca".into()],
        },
    ]
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

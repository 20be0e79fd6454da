use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;

use db::{Repository, TableStore};
use models::{Player, Team};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
    pub teams: Repository<Team>,
    pub players: Repository<Player>,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            teams: Repository::new(Arc::clone(&store)),
            players: Repository::new(Arc::clone(&store)),
            store,
        }
    }
}

/// Credentialed CORS for the listed origins. Methods and headers mirror the
/// preflight, since wildcards are not allowed together with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    // The web client requests the collections with a trailing slash.
    let teams = post(routes::teams::create_team).get(routes::teams::list_teams);
    let players = post(routes::players::create_player).get(routes::players::list_players);

    Router::new()
        .route("/teams", teams.clone())
        .route("/teams/", teams)
        .route(
            "/teams/:id",
            get(routes::teams::get_team)
                .put(routes::teams::update_team)
                .delete(routes::teams::delete_team),
        )
        .route("/players", players.clone())
        .route("/players/", players)
        .route(
            "/players/:id",
            get(routes::players::get_player)
                .put(routes::players::update_player)
                .delete(routes::players::delete_player),
        )
        .route("/health", get(routes::health::health))
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(cors_origins))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

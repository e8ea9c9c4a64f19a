use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    db,
    omdb::{OmdbApi, OmdbClient},
    routes,
    store::MovieStore,
};

#[derive(Clone)]
pub struct AppState {
    /// `None` when DATABASE_URL is unset; data routes then answer with a
    /// configuration error instead of the process refusing to start.
    pub store: Option<MovieStore>,
    pub omdb: Arc<dyn OmdbApi>,
}

pub async fn run_server() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("reelist/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let store = match &config.database_url {
        Some(url) => Some(MovieStore::new(db::connect_and_migrate(url).await?)),
        None => {
            tracing::error!(
                "DATABASE_URL is not set; data routes will answer with a configuration error"
            );
            None
        }
    };

    if config.omdb_api_key.is_empty() {
        tracing::warn!("OMDB_API_KEY is not set; imports will fail until it is configured");
    }

    let omdb: Arc<dyn OmdbApi> = Arc::new(OmdbClient::new(
        http,
        config.omdb_api_key.clone(),
        config.omdb_base_url.clone(),
    ));

    let state = Arc::new(AppState { store, omdb });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/movies",
            get(routes::list_movies)
                .post(routes::create_movie)
                .put(routes::update_movie)
                .delete(routes::delete_movie)
                .options(routes::preflight),
        )
        .route(
            "/movies/import",
            post(routes::import_movie).options(routes::preflight),
        )
        .fallback(routes::not_found)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

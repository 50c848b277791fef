mod config;
mod db;
mod entities;
mod error;
mod flash;
mod models;
mod omdb;
mod routes;
mod store;
mod templates;

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::{config::Config, omdb::OmdbClient, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub omdb: Arc<OmdbClient>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/users", get(routes::list_users_plain).post(routes::create_user))
        .route("/add_user", post(routes::create_user))
        .route(
            "/users/{user_id}/movies",
            get(routes::list_movies).post(routes::add_movie_from_list),
        )
        .route(
            "/users/{user_id}/add_movie",
            get(routes::add_movie_form).post(routes::add_movie_submit),
        )
        .route(
            "/users/{user_id}/movies/{movie_id}/update",
            get(routes::edit_movie_form).post(routes::update_movie_submit),
        )
        .route("/users/{user_id}/movies/{movie_id}/delete", post(routes::delete_movie))
        .route("/user/{user_id}/delete", post(routes::delete_user))
        .fallback(routes::not_found)
        .with_state((*state).clone())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(Config::from_env()?);

    let default_filter =
        if config.debug { "info,moviweb=debug,sqlx=warn" } else { "info,sqlx=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        )
        .init();

    let http = reqwest::Client::builder().user_agent("moviweb/0.1").build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = Store::new(db);

    let omdb = OmdbClient::new(http, config.omdb_api_key.clone(), config.omdb_api_url.clone());
    let cookie_key = Key::derive_from(config.secret_key.as_bytes());

    let state = Arc::new(AppState { config: config.clone(), store, omdb: Arc::new(omdb), cookie_key });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

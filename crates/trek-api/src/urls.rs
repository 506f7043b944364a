use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::views::{account, admin, health, media, session};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().route("/healthz", get(health::healthz))
                 .route("/api/admin/register", post(admin::register))
                 .route("/api/login", post(session::login))
                 .route("/api/media", get(media::list).post(media::create))
                 .route("/api/media/{media_id}", put(media::update).delete(media::delete))
                 .route("/api/account/password", put(account::change_password))
                 .route("/api/account", axum::routing::delete(account::delete_account))
                 .layer(TraceLayer::new_for_http())
                 .layer(CorsLayer::permissive())
                 .with_state(state)
}

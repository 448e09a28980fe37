use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::portal::WaveContract;

pub mod health;
pub mod session;
pub mod state;
pub mod waves;

pub use state::AppState;

pub fn create_router<C: WaveContract + Clone>(state: AppState<C>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health::<C>))
        .route("/api/status", get(waves::status::<C>))
        .route("/api/waves", get(waves::list::<C>).post(waves::submit::<C>))
        .route("/api/waves/refresh", post(waves::refresh::<C>))
        .route(
            "/api/session",
            get(session::current::<C>).post(session::connect::<C>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

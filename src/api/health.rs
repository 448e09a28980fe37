use axum::{extract::State, Json};
use serde::Serialize;

use crate::portal::WaveContract;

use super::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub wave_count: u64,
    pub waves_held: usize,
}

pub async fn health<C: WaveContract + Clone>(
    State(state): State<AppState<C>>,
) -> Json<HealthResponse> {
    let ledger = state.view.ledger().read().await;

    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.uptime_seconds(),
        wave_count: ledger.count(),
        waves_held: ledger.waves().len(),
    })
}

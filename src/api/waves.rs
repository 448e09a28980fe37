use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use alloy::primitives::{Address, TxHash};

use crate::error::GatewayError;
use crate::ledger::{SubmissionState, WaveRecord};
use crate::portal::WaveContract;

use super::state::AppState;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: error.into(),
        }),
    )
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub count: u64,
    /// True while a submission is in flight; shells render this instead of
    /// the count.
    pub pending: bool,
    pub submission: SubmissionState,
    pub address: Option<Address>,
}

pub async fn status<C: WaveContract + Clone>(
    State(state): State<AppState<C>>,
) -> Json<StatusResponse> {
    let address = state.session.read().await.current_address();
    let ledger = state.view.ledger().read().await;

    Json(StatusResponse {
        count: ledger.count(),
        pending: ledger.is_submission_pending(),
        submission: ledger.submission().clone(),
        address,
    })
}

#[derive(Serialize)]
pub struct WavesResponse {
    pub waves: Vec<WaveRecord>,
}

pub async fn list<C: WaveContract + Clone>(
    State(state): State<AppState<C>>,
) -> Json<WavesResponse> {
    let ledger = state.view.ledger().read().await;
    Json(WavesResponse {
        waves: ledger.waves().to_vec(),
    })
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub tx_hash: TxHash,
    pub count: u64,
}

pub async fn submit<C: WaveContract + Clone>(
    State(state): State<AppState<C>>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    // Caller-side gating: the ledger assumes a non-empty message and a
    // connected address.
    if req.message.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "message must not be empty"));
    }
    if !state.session.read().await.is_connected() {
        return Err(reject(
            StatusCode::CONFLICT,
            "connect a wallet before waving",
        ));
    }

    match state.view.submit(&req.message).await {
        Ok(tx_hash) => {
            let count = state.view.ledger().read().await.count();
            Ok(Json(SubmitResponse { tx_hash, count }))
        }
        Err(e @ GatewayError::SubmissionInFlight) => {
            Err(reject(StatusCode::CONFLICT, e.to_string()))
        }
        Err(e) => Err(reject(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub total: usize,
}

pub async fn refresh<C: WaveContract + Clone>(
    State(state): State<AppState<C>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    match state.view.fetch_all().await {
        Ok(total) => Ok(Json(RefreshResponse { total })),
        Err(e) => Err(reject(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}

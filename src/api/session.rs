use axum::{extract::State, Json};
use serde::Serialize;

use alloy::primitives::Address;

use crate::portal::WaveContract;
use crate::session::ConnectOutcome;

use super::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    pub connected: bool,
    pub address: Option<Address>,
}

pub async fn current<C: WaveContract + Clone>(
    State(state): State<AppState<C>>,
) -> Json<SessionResponse> {
    let address = state.session.read().await.current_address();
    Json(SessionResponse {
        connected: address.is_some(),
        address,
    })
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub connected: bool,
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Wallet faults are swallowed at the session boundary, so this always
/// answers 200; an unavailable or refusing provider shows up as a notice.
pub async fn connect<C: WaveContract + Clone>(
    State(state): State<AppState<C>>,
) -> Json<ConnectResponse> {
    let outcome = state.session.write().await.request_connection().await;

    let response = match outcome {
        ConnectOutcome::Connected(address) => ConnectResponse {
            connected: true,
            address: Some(address),
            notice: None,
        },
        ConnectOutcome::NoProvider => ConnectResponse {
            connected: false,
            address: None,
            notice: Some("no wallet provider is available".into()),
        },
        ConnectOutcome::Refused => ConnectResponse {
            connected: false,
            address: state.session.read().await.current_address(),
            notice: Some("wallet authorization was refused".into()),
        },
    };

    Json(response)
}

use alloy::primitives::{TxHash, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("config error: {0}")]
    Config(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("contract error: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("confirmation error: {0}")]
    Confirmation(#[from] alloy::providers::PendingTransactionError),

    #[error("transaction reverted: {0}")]
    Reverted(TxHash),

    #[error("wave count overflows u64: {0}")]
    CountOverflow(U256),

    #[error("a wave submission is already pending")]
    SubmissionInFlight,

    /// Produced by `WalletProvider` implementations whose authorization
    /// request fails; the session boundary swallows and logs it rather than
    /// letting it propagate.
    #[error("wallet error: {0}")]
    Wallet(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

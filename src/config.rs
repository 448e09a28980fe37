use alloy::primitives::Address;
use std::str::FromStr;

use crate::error::{GatewayError, Result};

pub struct Config {
    pub rpc_http_url: String,
    pub rpc_ws_url: String,
    pub contract_address: Address,
    pub wallet_private_key: Option<String>,
    pub wave_gas_limit: u64,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let rpc_http_url = std::env::var("RPC_HTTP_URL")
            .map_err(|_| GatewayError::Config("RPC_HTTP_URL is required".into()))?;

        let rpc_ws_url = std::env::var("RPC_WS_URL")
            .map_err(|_| GatewayError::Config("RPC_WS_URL is required".into()))?;

        let contract_address = std::env::var("CONTRACT_ADDRESS")
            .unwrap_or_else(|_| "0xCeDb72cC15E6F1696be2dE8248fbd2C6cd8C3895".into());
        let contract_address = Address::from_str(&contract_address)
            .map_err(|e| GatewayError::Config(format!("Invalid CONTRACT_ADDRESS: {e}")))?;

        // Absence means no signing capability: reads and the live feed still work
        let wallet_private_key = std::env::var("WALLET_PRIVATE_KEY").ok();

        let wave_gas_limit = std::env::var("WAVE_GAS_LIMIT")
            .unwrap_or_else(|_| "300000".into())
            .parse::<u64>()
            .map_err(|e| GatewayError::Config(format!("Invalid WAVE_GAS_LIMIT: {e}")))?;

        let server_port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .map_err(|e| GatewayError::Config(format!("Invalid SERVER_PORT: {e}")))?;

        Ok(Self {
            rpc_http_url,
            rpc_ws_url,
            contract_address,
            wallet_private_key,
            wave_gas_limit,
            server_port,
        })
    }
}

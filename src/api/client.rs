use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config::ApiConfig;
use super::transport::{Request, Transport, TransportError};
use crate::core::{AssetDefaults, PortfolioState, SimulationRequest, SimulationResult};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected {what} response: {message}")]
    Shape { what: &'static str, message: String },

    #[error("malformed simulation result: success_rate={success_rate}, median_final_balance={median_final_balance}")]
    MalformedResult {
        success_rate: f64,
        median_final_balance: f64,
    },
}

fn decode<T: DeserializeOwned>(what: &'static str, body: Value) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::Shape {
        what,
        message: e.to_string(),
    })
}

/// Fetches the starting allocation.
#[derive(Clone)]
pub struct AssetDefaultsLoader {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl AssetDefaultsLoader {
    pub fn new(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub async fn fetch(&self) -> Result<AssetDefaults, ClientError> {
        let url = self.config.defaults_url();
        tracing::debug!(%url, "fetching asset defaults");
        let body = self.transport.send(Request::get(url)).await?;
        decode("defaults", body)
    }

    pub async fn load(&self) -> Result<PortfolioState, ClientError> {
        let portfolio = PortfolioState::from_defaults(self.fetch().await?);
        tracing::info!(assets = portfolio.len(), "asset defaults loaded");
        Ok(portfolio)
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Talks to the simulation endpoint.
#[derive(Clone)]
pub struct SimulationClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl SimulationClient {
    pub fn new(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Converts the portfolio to fractions and runs it. Callers validate
    /// first; nothing here checks the weight sum.
    pub async fn submit(&self, portfolio: &PortfolioState) -> Result<SimulationResult, ClientError> {
        self.send(portfolio.to_request()).await
    }

    pub async fn send(&self, request: SimulationRequest) -> Result<SimulationResult, ClientError> {
        let url = self.config.simulate_url();
        let payload = serde_json::to_value(&request).map_err(|e| ClientError::Shape {
            what: "simulation request",
            message: e.to_string(),
        })?;
        tracing::debug!(%url, assets = request.assets.len(), "submitting simulation");

        let body = self.transport.send(Request::post(url, payload)).await?;
        let result: SimulationResult = decode("simulation", body)?;
        if !result.is_well_formed() {
            return Err(ClientError::MalformedResult {
                success_rate: result.success_rate,
                median_final_balance: result.median_final_balance,
            });
        }
        Ok(result)
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let body = self
            .transport
            .send(Request::get(self.config.health_url()))
            .await?;
        let health: HealthResponse = decode("health", body)?;
        Ok(health.status)
    }
}

mod client;
mod config;
mod transport;

pub use client::{AssetDefaultsLoader, ClientError, SimulationClient};
pub use config::{API_URL_ENV, ApiConfig, DEFAULT_API_URL, DEFAULT_DEFAULTS_PATH};
pub use transport::{HttpTransport, Method, Request, Transport, TransportError};

#[cfg(test)]
pub(crate) use transport::fake;

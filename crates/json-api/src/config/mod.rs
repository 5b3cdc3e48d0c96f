//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig, pricing::PricingConfig, server::ServerRuntimeConfig,
    telemetry::TelemetryConfig,
};

pub(crate) mod db;
pub(crate) mod pricing;
pub(crate) mod server;
pub(crate) mod telemetry;

/// Bookshelf JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "bookshelf-json", about = "Bookshelf JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging and trace export settings.
    #[command(flatten)]
    pub telemetry: TelemetryConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Currency, shipping and tax settings.
    #[command(flatten)]
    pub pricing: PricingConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

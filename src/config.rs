use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub external: ExternalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Wipe the schema and insert the demo fixture at startup. Destructive,
    /// so it is opt-in and never the default.
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection targets for the two external collaborators. Both endpoints
/// answer 503 while their target is unconfigured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    pub vendor_database_url: Option<String>,
    pub interop_adapter_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:data/blog.db".to_string()),
                seed_demo_data: env::var("SEED_DEMO_DATA")
                    .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            external: ExternalConfig {
                vendor_database_url: env::var("VENDOR_DATABASE_URL").ok(),
                interop_adapter_url: env::var("INTEROP_ADAPTER_URL").ok(),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

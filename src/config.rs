// Runtime configuration, read from the environment (and `.env` if present).

use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/directory.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Which ListingStore implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            other => bail!("unknown store '{}', expected 'sqlite' or 'memory'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin_jwt_secret: String,
    pub store: StoreKind,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let admin_jwt_secret = lookup("DIRECTORY_ADMIN_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .context("Missing DIRECTORY_ADMIN_JWT_SECRET environment variable")?;

        let port = match lookup("DIRECTORY_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("DIRECTORY_PORT must be a port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let store = match lookup("DIRECTORY_STORE") {
            Some(raw) => raw.parse::<StoreKind>().context("Invalid DIRECTORY_STORE")?,
            None => StoreKind::Sqlite,
        };

        Ok(Self {
            database_url: lookup("DIRECTORY_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: lookup("DIRECTORY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            admin_jwt_secret,
            store,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

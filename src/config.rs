use serde::Deserialize;
use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tokio::fs;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "data/energia.db";
const DEFAULT_CONFIG_PATH: &str = "config/settings.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read tariff config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tariff config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            db_path: path_from_env("ENERGY_DB_PATH", DEFAULT_DB_PATH),
            config_path: path_from_env("ENERGY_CONFIG_PATH", DEFAULT_CONFIG_PATH),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn path_from_env(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TariffConfig {
    pub tarifa_electrica: ElectricTariff,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElectricTariff {
    pub costo_kwh: f64,
}

impl TariffConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).await.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn rate(&self) -> f64 {
        self.tarifa_electrica.costo_kwh
    }
}

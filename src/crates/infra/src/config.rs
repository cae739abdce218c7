use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    server: RawServerConfig,
    cart: RawCartConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    host: String,
    port: u16,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawCartConfig {
    /// Directory the durable cart database lives in
    data_dir: String,
}

impl Default for RawCartConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data/cart".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CartConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    server: ServerConfig,
    cart: CartConfig,
}

impl AppConfig {
    /// Layers an optional `config` file under `APP`-prefixed environment
    /// variables (`__` as the section separator). Every field has a
    /// default, so both sources may be absent.
    pub fn load() -> Result<AppConfig, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let raw: RawConfig = config.try_deserialize()?;
        Ok(AppConfig::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        Self {
            server: ServerConfig {
                host: raw.server.host,
                port: raw.server.port,
            },
            cart: CartConfig {
                data_dir: raw.cart.data_dir,
            },
        }
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone()
    }

    pub fn cart(&self) -> CartConfig {
        self.cart.clone()
    }
}

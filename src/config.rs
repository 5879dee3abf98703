use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

use crate::search::pagination::DEFAULT_PER_PAGE;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub http_bind_address: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub log_level: Option<String>,
}

impl Config {
    pub fn bind_address(&self) -> String {
        self.http_bind_address
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            http_bind_address: None,
            page_size: default_page_size(),
            log_level: None,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PER_PAGE
}

pub fn create_test_config() -> Config {
    Config {
        database_url: Some("postgres://xxx".to_string()),
        http_bind_address: Some("127.0.0.1:0".to_string()),
        page_size: 2,
        log_level: Some("debug".to_string()),
    }
}

pub fn parse_config(raw: &str) -> Result<Config> {
    let config: Config = toml::from_str(raw).context("config is not valid TOML")?;
    if config.page_size == 0 {
        anyhow::bail!("page_size must be at least 1");
    }
    Ok(config)
}

pub fn read_config() -> Result<Config> {
    dotenv().ok();
    let config_path =
        env::var(CONFIG_PATH_ENV).with_context(|| format!("{CONFIG_PATH_ENV} .env not set"))?;
    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config from {config_path}"))?;
    parse_config(&raw)
}

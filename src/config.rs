use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr
                .trim()
                .parse()
                .with_context(|| format!("Invalid BIND_ADDR: {}", addr))?;
        }

        if let Some(size) = lookup("MAX_FILE_SIZE") {
            let parsed: usize = size
                .trim()
                .parse()
                .with_context(|| format!("Invalid MAX_FILE_SIZE: {}", size))?;
            if parsed == 0 {
                anyhow::bail!("MAX_FILE_SIZE must be greater than zero");
            }
            config.max_file_size = parsed;
        }

        Ok(config)
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

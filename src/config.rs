//! Configuration resolution
//!
//! Each value resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`spinrate/config.toml` in the platform config dir)
//! 4. Compiled default

use crate::error::{Error, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "./spinrate.db";
const DEFAULT_BIND: &str = "127.0.0.1:5728";

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "spinrate", about = "Hypermedia album review API")]
pub struct Args {
    /// Path to the SQLite database file
    #[arg(long, env = "SPINRATE_DB")]
    pub database: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "SPINRATE_BIND")]
    pub bind: Option<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: PathBuf,
    pub bind: SocketAddr,
}

impl Config {
    /// Resolve configuration from CLI/env arguments, the optional config
    /// file, and compiled defaults
    pub fn resolve(args: Args) -> Result<Self> {
        let file = load_config_file();

        let database = args
            .database
            .or_else(|| file_value(&file, "database").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let bind = args
            .bind
            .or_else(|| file_value(&file, "bind"))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind
            .parse()
            .map_err(|_| Error::Config(format!("invalid bind address: {}", bind)))?;

        Ok(Config { database, bind })
    }
}

/// Load `spinrate/config.toml` from the platform config directory, if any
fn load_config_file() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("spinrate").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

fn file_value(file: &Option<toml::Value>, key: &str) -> Option<String> {
    file.as_ref()?
        .get(key)
        .and_then(|value| value.as_str())
        .map(String::from)
}

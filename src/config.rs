//! Server configuration

use std::env;
use std::net::{IpAddr, SocketAddr};

use eyre::{eyre, Result, WrapErr};

use crate::codec::validate_prefix;

/// Account prefix of the network this server was written for
pub const DEFAULT_ACCOUNT_PREFIX: &str = "secret";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Same port as the node's EVM JSON-RPC endpoint
pub const DEFAULT_RPC_PORT: u16 = 8545;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bech32 human-readable prefix for account addresses
    pub account_prefix: String,
    /// Interface the JSON-RPC server binds to
    pub bind_address: IpAddr,
    /// JSON-RPC server port
    pub rpc_port: u16,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let account_prefix = lookup("BECH32_ACCOUNT_PREFIX")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ACCOUNT_PREFIX.to_string());
        validate_prefix(&account_prefix).wrap_err("Invalid BECH32_ACCOUNT_PREFIX")?;

        let bind_address: IpAddr = lookup("RPC_BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .trim()
            .parse()
            .map_err(|e| eyre!("Invalid RPC_BIND_ADDRESS: {}", e))?;

        let rpc_port: u16 = match lookup("RPC_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| eyre!("Invalid RPC_PORT: {:?}", v))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(eyre!(
                    "Invalid LOG_FORMAT {:?}: expected json or pretty",
                    other
                ))
            }
        };

        Ok(Self {
            account_prefix,
            bind_address,
            rpc_port,
            log_format,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.rpc_port)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup into a
//! typed [`Config`]; invalid or missing values fail the process before it
//! binds a socket.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the trait database | `/data` |
//! | `RPC_URL` | JSON-RPC endpoint of the chain | Required |
//! | `VAULT_ADDRESS` | Staking vault contract address | Required |
//! | `PRIMARY_ADDRESS` | Primary collection contract address | Required |
//! | `UTILITY_ADDRESS` | Utility collection contract address | Required |
//! | `ORACLE_SIGNING_KEY` | Hex-encoded oracle private key (64 chars, no 0x) | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use alloy::primitives::Address;

use crate::models::Collection;

/// Environment variable name for the trait database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default `RUST_LOG` filter when the variable is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// On-chain addresses of the two supported collections.
#[derive(Debug, Clone, Copy)]
pub struct CollectionAddresses {
    pub primary: Address,
    pub utility: Address,
}

impl CollectionAddresses {
    /// The collection contract address the attestation is bound to.
    pub fn address_for(&self, collection: Collection) -> Address {
        match collection {
            Collection::Primary => self.primary,
            Collection::Utility => self.utility,
        }
    }
}

/// Process configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub rpc_url: String,
    pub vault_address: Address,
    pub addresses: CollectionAddresses,
    pub signing_key: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load and validate configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                message: format!("'{raw}' is not a valid port"),
            })?,
            Err(_) => 8080,
        };

        let data_dir =
            PathBuf::from(env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string()));

        let rpc_url = required("RPC_URL")?;
        let vault_address = parse_address("VAULT_ADDRESS", &required("VAULT_ADDRESS")?)?;
        let addresses = CollectionAddresses {
            primary: parse_address("PRIMARY_ADDRESS", &required("PRIMARY_ADDRESS")?)?,
            utility: parse_address("UTILITY_ADDRESS", &required("UTILITY_ADDRESS")?)?,
        };

        let signing_key = required("ORACLE_SIGNING_KEY")?;

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            rpc_url,
            vault_address,
            addresses,
            signing_key,
            log_format,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_address(name: &'static str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value).map_err(|e| ConfigError::Invalid {
        name,
        message: e.to_string(),
    })
}

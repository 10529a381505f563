// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for the staking vault contract.

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
    sol,
};

use super::ChainReader;

// The vault surface this oracle reads. `_baseRates` keeps the contract's
// public-variable getter name so the generated call matches its selector.
sol! {
    #[sol(rpc)]
    interface IStakingVault {
        function owner() external view returns (address);
        function _baseRates(address addr) external view returns (uint256);
    }
}

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Live client for the staking vault contract.
///
/// The provider and contract binding are built once at startup and shared
/// across requests; each method call is still a fresh RPC round-trip.
pub struct VaultClient {
    vault: IStakingVault::IStakingVaultInstance<HttpProvider>,
}

impl VaultClient {
    /// Create a client for the vault at `vault_address` behind `rpc_url`.
    pub fn new(rpc_url: &str, vault_address: Address) -> Result<Self, ChainError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self {
            vault: IStakingVault::new(vault_address, provider),
        })
    }
}

#[async_trait::async_trait]
impl ChainReader for VaultClient {
    async fn owner_address(&self) -> Result<Address, ChainError> {
        self.vault
            .owner()
            .call()
            .await
            .map_err(|e| ChainError::Unavailable(e.to_string()))
    }

    async fn base_rate(&self, collection: Address) -> Result<U256, ChainError> {
        self.vault
            ._baseRates(collection)
            .call()
            .await
            .map_err(|e| ChainError::Unavailable(e.to_string()))
    }
}

/// Create the oracle's signer from a private key (hex string, no 0x prefix).
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, ChainError> {
    let key_bytes = alloy::hex::decode(private_key_hex)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))
}

/// Errors that can occur talking to the chain.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Chain unavailable: {0}")]
    Unavailable(String),
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for the staking vault.
//!
//! This module provides functionality for:
//! - Reading the vault's current owner (write authorization source of truth)
//! - Reading per-collection default base rates
//! - Constructing the oracle's local signing key

pub mod client;

pub use client::{signer_from_hex, ChainError, VaultClient};

use alloy::primitives::{Address, U256};

/// Read-only view of the staking vault's current on-chain state.
///
/// Every call is a live query; owner rotation on the contract must be
/// visible to the very next request, so implementations never cache.
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync {
    /// The account currently authorized to administer the vault.
    async fn owner_address(&self) -> Result<Address, ChainError>;

    /// The 18-decimal fixed-point default rate for a collection address.
    async fn base_rate(&self, collection: Address) -> Result<U256, ChainError>;
}

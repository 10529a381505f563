// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Write authorization against the vault's current on-chain owner.
//!
//! There is no oracle-side credential: trust is delegated entirely to
//! whoever the vault currently reports as `owner()`. Transferring contract
//! ownership immediately changes who can authenticate, with no oracle
//! restart or key rotation.

use std::sync::Arc;

use alloy::primitives::Signature;

use crate::blockchain::{ChainError, ChainReader};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Verifies that a write request was signed by the vault's current owner.
///
/// Stateless per request; every call re-reads the owner from the chain so
/// callers always authenticate against live state, never a snapshot.
#[derive(Clone)]
pub struct OwnerVerifier {
    chain: Arc<dyn ChainReader>,
}

impl OwnerVerifier {
    pub fn new(chain: Arc<dyn ChainReader>) -> Self {
        Self { chain }
    }

    /// Recover the personal-message signer of `unsigned_msg` and compare
    /// it to the vault's current owner.
    ///
    /// Returns `Ok(false)` on an owner mismatch; the caller reports that
    /// as a structured denial rather than an HTTP error.
    pub async fn authorize(&self, unsigned_msg: &str, signature: &str) -> Result<bool, AuthError> {
        let raw = alloy::hex::decode(signature)
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;
        let signature = Signature::try_from(raw.as_slice())
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;

        let signer = signature
            .recover_address_from_msg(unsigned_msg.as_bytes())
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;

        let owner = self.chain.owner_address().await?;

        // Address equality is byte equality, so hex case never matters.
        Ok(signer == owner)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::ChainReader;
use crate::config::CollectionAddresses;
use crate::oracle::{DepositOracle, OwnerVerifier};
use crate::store::TraitStore;

/// Shared application state: constructed once at startup, immutable
/// afterwards, injected into every handler. The chain client and signing
/// key in particular are never rebuilt per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TraitStore>,
    pub verifier: OwnerVerifier,
    pub oracle: DepositOracle,
}

impl AppState {
    pub fn new(
        store: Arc<TraitStore>,
        chain: Arc<dyn ChainReader>,
        signer: PrivateKeySigner,
        addresses: CollectionAddresses,
    ) -> Self {
        Self {
            verifier: OwnerVerifier::new(chain.clone()),
            oracle: DepositOracle::new(chain, store.clone(), signer, addresses),
            store,
        }
    }
}

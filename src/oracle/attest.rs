// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deposit attestation: resolve trait values, pack, hash, sign.
//!
//! The vault contract independently recomputes
//! `keccak256(abi.encodePacked(collectionAddress, tokenIds, tokenTraits))`
//! from the returned arrays and recovers the signer from the signature, so
//! the byte layout here must match the contract exactly: a 20-byte
//! address followed by each array element as a 32-byte big-endian word,
//! no padding between fields.

use std::sync::Arc;

use alloy::{
    primitives::{keccak256, Address, U256},
    signers::{local::PrivateKeySigner, SignerSync},
    sol_types::SolValue,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::units::{self, UnitError};
use crate::blockchain::{ChainError, ChainReader};
use crate::config::CollectionAddresses;
use crate::models::{Collection, ResolvedTrait};
use crate::store::{StoreError, TraitStore};

#[derive(Debug, thiserror::Error)]
pub enum AttestError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored trait for token {no} is unusable: {source}")]
    CorruptTrait { no: u64, source: UnitError },

    #[error("signing failed: {0}")]
    Signing(String),
}

/// A signed trait attestation for an ordered set of tokens.
///
/// `token_numbers` and `trait_values` correspond positionally; the
/// signature covers the packed message over both arrays. All hex is
/// minimal-width and `0x`-prefixed. An empty request yields empty arrays
/// and no signature.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Attestation {
    pub token_numbers: Vec<String>,
    pub trait_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// The signing oracle: binds token numbers to trait values under the
/// oracle key, for on-chain verification at deposit time.
#[derive(Clone)]
pub struct DepositOracle {
    chain: Arc<dyn ChainReader>,
    store: Arc<TraitStore>,
    signer: PrivateKeySigner,
    addresses: CollectionAddresses,
}

impl DepositOracle {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        store: Arc<TraitStore>,
        signer: PrivateKeySigner,
        addresses: CollectionAddresses,
    ) -> Self {
        Self {
            chain,
            store,
            signer,
            addresses,
        }
    }

    /// The address deposits will be verified against.
    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    /// Resolve trait values for tokens in caller order: stored override
    /// verbatim, else the chain default formatted to the same shape.
    pub async fn resolve(
        &self,
        collection: Collection,
        nos: &[u64],
    ) -> Result<Vec<ResolvedTrait>, AttestError> {
        if nos.is_empty() {
            return Ok(Vec::new());
        }

        let address = self.addresses.address_for(collection);
        let default_rate = units::format_units(self.chain.base_rate(address).await?);
        let overrides = self.store.get_many(collection, nos)?;

        Ok(nos
            .iter()
            .map(|&no| ResolvedTrait {
                no,
                value: overrides
                    .get(&no)
                    .map(|record| record.value.clone())
                    .unwrap_or_else(|| default_rate.clone()),
            })
            .collect())
    }

    /// Produce the signed attestation for tokens in caller order.
    ///
    /// All-or-nothing: any chain, store, or signing failure fails the
    /// whole request. An empty token list short-circuits with no chain or
    /// store access and no signature.
    pub async fn attest(
        &self,
        collection: Collection,
        nos: &[u64],
    ) -> Result<Attestation, AttestError> {
        if nos.is_empty() {
            return Ok(Attestation::default());
        }

        let address = self.addresses.address_for(collection);
        let default_rate = self.chain.base_rate(address).await?;
        let overrides = self.store.get_many(collection, nos)?;

        let mut token_numbers = Vec::with_capacity(nos.len());
        let mut trait_values = Vec::with_capacity(nos.len());
        for &no in nos {
            let value = match overrides.get(&no) {
                Some(record) => units::parse_units(&record.value)
                    .map_err(|source| AttestError::CorruptTrait { no, source })?,
                None => default_rate,
            };
            token_numbers.push(U256::from(no));
            trait_values.push(value);
        }

        let digest = keccak256(pack_attestation(address, &token_numbers, &trait_values));
        let signature = self
            .signer
            .sign_message_sync(digest.as_slice())
            .map_err(|e| AttestError::Signing(e.to_string()))?;

        Ok(Attestation {
            token_numbers: token_numbers.iter().copied().map(units::hexlify).collect(),
            trait_values: trait_values.iter().copied().map(units::hexlify).collect(),
            signature: Some(format!("0x{}", alloy::hex::encode(signature.as_bytes()))),
        })
    }
}

/// Pack `(collectionAddress, tokenNumbers[], traitValues[])` exactly as
/// the contract's `abi.encodePacked` does.
fn pack_attestation(collection: Address, token_numbers: &[U256], trait_values: &[U256]) -> Vec<u8> {
    (collection, token_numbers.to_vec(), trait_values.to_vec()).abi_encode_packed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::testing::StaticChain;
    use alloy::primitives::Signature;
    use tempfile::TempDir;

    const RATE_ONE: u128 = 1_000_000_000_000_000_000; // "1.0"
    const RATE_ONE_POINT_FIVE: u128 = 1_500_000_000_000_000_000; // "1.5"

    fn collection_address() -> Address {
        Address::repeat_byte(0xAB)
    }

    fn oracle_with(
        owner_rate: u128,
    ) -> (DepositOracle, Arc<StaticChain>, Arc<TraitStore>, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = Arc::new(TraitStore::open(&dir.path().join("traits.redb")).expect("store"));
        let chain = Arc::new(StaticChain::new(
            Address::repeat_byte(0x01),
            U256::from(owner_rate),
        ));
        let addresses = CollectionAddresses {
            primary: collection_address(),
            utility: Address::repeat_byte(0xCD),
        };
        let oracle = DepositOracle::new(
            chain.clone(),
            store.clone(),
            PrivateKeySigner::random(),
            addresses,
        );
        (oracle, chain, store, dir)
    }

    #[test]
    fn packed_layout_matches_contract_expectations() {
        let address = collection_address();
        let nos = vec![U256::from(3u64), U256::from(7u64)];
        let values = vec![U256::from(RATE_ONE_POINT_FIVE), U256::from(RATE_ONE)];

        let packed = pack_attestation(address, &nos, &values);

        // address (20) + 2 token words + 2 value words, no padding between
        assert_eq!(packed.len(), 20 + 32 * 4);
        assert_eq!(&packed[..20], address.as_slice());
        assert_eq!(&packed[20..52], U256::from(3u64).to_be_bytes::<32>().as_slice());
        assert_eq!(&packed[52..84], U256::from(7u64).to_be_bytes::<32>().as_slice());
        assert_eq!(
            &packed[84..116],
            U256::from(RATE_ONE_POINT_FIVE).to_be_bytes::<32>().as_slice()
        );
        assert_eq!(
            &packed[116..148],
            U256::from(RATE_ONE).to_be_bytes::<32>().as_slice()
        );
    }

    #[tokio::test]
    async fn attest_prefers_override_and_falls_back_to_default() {
        let (oracle, _chain, store, _dir) = oracle_with(RATE_ONE);
        store.upsert(Collection::Primary, 3, "1.5").unwrap();

        let attestation = oracle.attest(Collection::Primary, &[3, 7]).await.unwrap();

        assert_eq!(attestation.token_numbers, vec!["0x03", "0x07"]);
        assert_eq!(
            attestation.trait_values,
            vec!["0x14d1120d7b160000", "0x0de0b6b3a7640000"]
        );
        assert!(attestation.signature.is_some());
    }

    #[tokio::test]
    async fn signature_recovers_to_the_oracle_address() {
        let (oracle, _chain, store, _dir) = oracle_with(RATE_ONE);
        store.upsert(Collection::Primary, 3, "1.5").unwrap();

        let attestation = oracle.attest(Collection::Primary, &[3, 7]).await.unwrap();

        // Recompute the digest the way the contract does, from the packed
        // message, and recover the signer from the returned signature.
        let nos = vec![U256::from(3u64), U256::from(7u64)];
        let values = vec![U256::from(RATE_ONE_POINT_FIVE), U256::from(RATE_ONE)];
        let digest = keccak256(pack_attestation(collection_address(), &nos, &values));

        let raw = alloy::hex::decode(attestation.signature.as_deref().unwrap()).unwrap();
        let signature = Signature::try_from(raw.as_slice()).unwrap();
        let recovered = signature
            .recover_address_from_msg(digest.as_slice())
            .unwrap();

        assert_eq!(recovered, oracle.signer_address());
    }

    #[tokio::test]
    async fn attestation_arrays_are_deterministic() {
        let (oracle, _chain, store, _dir) = oracle_with(RATE_ONE);
        store.upsert(Collection::Primary, 3, "1.5").unwrap();

        let first = oracle.attest(Collection::Primary, &[3, 7]).await.unwrap();
        let second = oracle.attest(Collection::Primary, &[3, 7]).await.unwrap();

        assert_eq!(first.token_numbers, second.token_numbers);
        assert_eq!(first.trait_values, second.trait_values);
        // RFC 6979 signing over the same digest and key
        assert_eq!(first.signature, second.signature);
    }

    #[tokio::test]
    async fn caller_order_is_preserved_not_sorted() {
        let (oracle, _chain, _store, _dir) = oracle_with(RATE_ONE);

        let attestation = oracle
            .attest(Collection::Primary, &[9, 2, 5])
            .await
            .unwrap();

        assert_eq!(attestation.token_numbers, vec!["0x09", "0x02", "0x05"]);
    }

    #[tokio::test]
    async fn empty_request_skips_chain_store_and_signing() {
        let (oracle, chain, _store, _dir) = oracle_with(RATE_ONE);

        let attestation = oracle.attest(Collection::Primary, &[]).await.unwrap();

        assert_eq!(attestation, Attestation::default());
        assert!(attestation.signature.is_none());
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn resolve_returns_override_verbatim_and_formatted_default() {
        let (oracle, _chain, store, _dir) = oracle_with(RATE_ONE);
        store.upsert(Collection::Primary, 3, "1.5").unwrap();

        let resolved = oracle.resolve(Collection::Primary, &[3, 7]).await.unwrap();

        assert_eq!(
            resolved,
            vec![
                ResolvedTrait {
                    no: 3,
                    value: "1.5".to_string()
                },
                ResolvedTrait {
                    no: 7,
                    value: "1.0".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn utility_collection_packs_its_own_address() {
        let (oracle, _chain, _store, _dir) = oracle_with(RATE_ONE);

        let primary = oracle.attest(Collection::Primary, &[1]).await.unwrap();
        let utility = oracle.attest(Collection::Utility, &[1]).await.unwrap();

        // Same token and rate, different collection address, different digest.
        assert_ne!(primary.signature, utility.signature);
        assert_eq!(primary.token_numbers, utility.token_numbers);
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use super::traits::parse_token_numbers;
use crate::{error::ApiError, models::Collection, oracle::Attestation, state::AppState};

#[utoipa::path(
    get,
    path = "/v1/traits/{collection}/deposit/{nums}",
    params(
        ("collection" = Collection, Path, description = "Trait collection"),
        ("nums" = String, Path, description = "JSON array of token numbers, order preserved")
    ),
    tag = "Deposit",
    responses((status = 200, body = Attestation))
)]
pub async fn deposit_attestation(
    Path((collection, nums)): Path<(Collection, String)>,
    State(state): State<AppState>,
) -> Result<Json<Attestation>, ApiError> {
    let nos = parse_token_numbers(&nums)?;
    Ok(Json(state.oracle.attest(collection, &nos).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::testing::StaticChain;
    use crate::config::CollectionAddresses;
    use crate::store::TraitStore;
    use alloy::primitives::{Address, U256};
    use alloy::signers::local::PrivateKeySigner;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tempfile::TempDir;

    const RATE_ONE: u128 = 1_000_000_000_000_000_000;

    fn test_state() -> (AppState, Arc<StaticChain>, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = Arc::new(TraitStore::open(&dir.path().join("traits.redb")).expect("store"));
        let chain = Arc::new(StaticChain::new(
            Address::repeat_byte(0x01),
            U256::from(RATE_ONE),
        ));
        let addresses = CollectionAddresses {
            primary: Address::repeat_byte(0xAB),
            utility: Address::repeat_byte(0xCD),
        };
        let state = AppState::new(store, chain.clone(), PrivateKeySigner::random(), addresses);
        (state, chain, dir)
    }

    #[tokio::test]
    async fn attestation_covers_requested_tokens() {
        let (state, _chain, _dir) = test_state();
        state.store.upsert(Collection::Primary, 3, "1.5").unwrap();

        let Json(attestation) = deposit_attestation(
            Path((Collection::Primary, "[3,7]".to_string())),
            State(state),
        )
        .await
        .unwrap();

        assert_eq!(attestation.token_numbers, vec!["0x03", "0x07"]);
        assert_eq!(
            attestation.trait_values,
            vec!["0x14d1120d7b160000", "0x0de0b6b3a7640000"]
        );
        assert!(attestation.signature.is_some());
    }

    #[tokio::test]
    async fn empty_token_list_yields_no_signature_and_no_chain_calls() {
        let (state, chain, _dir) = test_state();

        let Json(attestation) =
            deposit_attestation(Path((Collection::Primary, "[]".to_string())), State(state))
                .await
                .unwrap();

        assert!(attestation.token_numbers.is_empty());
        assert!(attestation.trait_values.is_empty());
        assert!(attestation.signature.is_none());
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_nums_is_rejected_before_chain_access() {
        let (state, chain, _dir) = test_state();

        let err = deposit_attestation(
            Path((Collection::Primary, "not-json".to_string())),
            State(state),
        )
        .await
        .expect_err("non-array input is rejected");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(chain.call_count(), 0);
    }
}

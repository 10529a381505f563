// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{Collection, ResolvedTrait, TraitRecord, WriteTraitRequest, WriteTraitResponse},
    oracle::Attestation,
    state::AppState,
};

pub mod deposit;
pub mod health;
pub mod traits;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/traits/{collection}",
            get(traits::list_traits)
                .post(traits::upsert_trait)
                .delete(traits::purge_traits),
        )
        .route("/traits/{collection}/{no}", delete(traits::delete_trait))
        .route(
            "/traits/{collection}/resolve/{nums}",
            get(traits::resolve_traits),
        )
        .route(
            "/traits/{collection}/deposit/{nums}",
            get(deposit::deposit_attestation),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        traits::upsert_trait,
        traits::list_traits,
        traits::resolve_traits,
        traits::delete_trait,
        traits::purge_traits,
        deposit::deposit_attestation,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Collection,
            TraitRecord,
            WriteTraitRequest,
            WriteTraitResponse,
            ResolvedTrait,
            Attestation,
            traits::PurgeResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Traits", description = "Trait record management and resolution"),
        (name = "Deposit", description = "Signed deposit attestations"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::testing::StaticChain;
    use crate::config::CollectionAddresses;
    use crate::store::TraitStore;
    use alloy::primitives::{Address, U256};
    use alloy::signers::local::PrivateKeySigner;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = Arc::new(TraitStore::open(&dir.path().join("traits.redb")).expect("store"));
        let chain = Arc::new(StaticChain::new(Address::repeat_byte(0x01), U256::ZERO));
        let addresses = CollectionAddresses {
            primary: Address::repeat_byte(0xAB),
            utility: Address::repeat_byte(0xCD),
        };
        let state = AppState::new(store, chain, PrivateKeySigner::random(), addresses);
        (state, dir)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}

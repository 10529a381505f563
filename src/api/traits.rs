// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    models::{
        Collection, ResolvedTrait, TraitRecord, TraitUpdate, WriteTraitRequest, WriteTraitResponse,
    },
    oracle::units,
    state::AppState,
};

/// Result of purging a collection.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgeResponse {
    pub deleted: usize,
}

/// Parse a path segment carrying an ordered JSON array of token numbers.
///
/// Rejected before any chain or store access.
pub(crate) fn parse_token_numbers(raw: &str) -> Result<Vec<u64>, ApiError> {
    serde_json::from_str::<Vec<u64>>(raw).map_err(|_| {
        ApiError::bad_request("token numbers must be a JSON array of unsigned integers")
    })
}

#[utoipa::path(
    post,
    path = "/v1/traits/{collection}",
    params(("collection" = Collection, Path, description = "Trait collection")),
    request_body = WriteTraitRequest,
    tag = "Traits",
    responses((status = 200, body = WriteTraitResponse))
)]
pub async fn upsert_trait(
    Path(collection): Path<Collection>,
    State(state): State<AppState>,
    Json(request): Json<WriteTraitRequest>,
) -> Result<Json<WriteTraitResponse>, ApiError> {
    if request.unsigned_msg.is_empty() {
        return Err(ApiError::bad_request("unsigned_msg is required"));
    }
    if request.signature.is_empty() {
        return Err(ApiError::bad_request("signature is required"));
    }

    let authorized = state
        .verifier
        .authorize(&request.unsigned_msg, &request.signature)
        .await?;
    if !authorized {
        return Ok(Json(WriteTraitResponse::denied()));
    }

    // Parse only the exact bytes that were signed.
    let update: TraitUpdate = serde_json::from_str(&request.unsigned_msg)
        .map_err(|e| ApiError::bad_request(format!("invalid trait update payload: {e}")))?;

    // An expired authorization looks the same as a denied one.
    if update.expires_at.is_some_and(|expiry| expiry < Utc::now()) {
        return Ok(Json(WriteTraitResponse::denied()));
    }

    units::parse_units(&update.value)
        .map_err(|e| ApiError::bad_request(format!("invalid trait value: {e}")))?;

    let record = state.store.upsert(collection, update.no, &update.value)?;
    Ok(Json(WriteTraitResponse::stored(record)))
}

#[utoipa::path(
    get,
    path = "/v1/traits/{collection}",
    params(("collection" = Collection, Path, description = "Trait collection")),
    tag = "Traits",
    responses((status = 200, body = [TraitRecord]))
)]
pub async fn list_traits(
    Path(collection): Path<Collection>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TraitRecord>>, ApiError> {
    Ok(Json(state.store.list(collection)?))
}

#[utoipa::path(
    get,
    path = "/v1/traits/{collection}/resolve/{nums}",
    params(
        ("collection" = Collection, Path, description = "Trait collection"),
        ("nums" = String, Path, description = "JSON array of token numbers, order preserved")
    ),
    tag = "Traits",
    responses((status = 200, body = [ResolvedTrait]))
)]
pub async fn resolve_traits(
    Path((collection, nums)): Path<(Collection, String)>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResolvedTrait>>, ApiError> {
    let nos = parse_token_numbers(&nums)?;
    Ok(Json(state.oracle.resolve(collection, &nos).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/traits/{collection}/{no}",
    params(
        ("collection" = Collection, Path, description = "Trait collection"),
        ("no" = u64, Path, description = "Token number to delete")
    ),
    tag = "Traits",
    responses((status = 204), (status = 404))
)]
pub async fn delete_trait(
    Path((collection, no)): Path<(Collection, u64)>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_one(collection, no)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/v1/traits/{collection}",
    params(("collection" = Collection, Path, description = "Trait collection")),
    tag = "Traits",
    responses((status = 200, body = PurgeResponse))
)]
pub async fn purge_traits(
    Path(collection): Path<Collection>,
    State(state): State<AppState>,
) -> Result<Json<PurgeResponse>, ApiError> {
    let deleted = state.store.delete_all(collection)?;
    Ok(Json(PurgeResponse { deleted }))
}

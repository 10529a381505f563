// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Collections
//!
//! The oracle serves two disjoint record sets, selected by [`Collection`]:
//! the primary collection and the utility collection. Both share the
//! [`TraitRecord`] shape but never cross-reference; each maps to its own
//! on-chain collection address.
//!
//! ## Write Authentication
//!
//! A trait write carries the raw JSON payload (`unsigned_msg`) next to a
//! personal-message signature over it. The payload is only parsed after
//! the signature has been recovered and matched against the vault's
//! current owner, so the bytes that were signed are exactly the bytes
//! that get interpreted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Collection Selector
// =============================================================================

/// Selector for the two independent trait record sets.
///
/// Parameterizes the store tables, the configured collection addresses,
/// and every route, instead of duplicating each component per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Primary,
    Utility,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Primary => "primary",
            Collection::Utility => "utility",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Trait Records
// =============================================================================

/// A stored trait multiplier for a single token.
///
/// `value` is the 18-decimal fixed-point multiplier as a decimal string
/// (e.g. `"1.5"`), validated at write time so the attestation path never
/// meets an unparseable entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TraitRecord {
    /// Token number, unique within its collection.
    pub no: u64,
    /// Decimal trait multiplier.
    #[serde(rename = "trait")]
    pub value: String,
    /// When this record was last written.
    pub updated_at: DateTime<Utc>,
}

/// The owner-signed payload carried inside a write request's `unsigned_msg`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitUpdate {
    /// Token number to upsert.
    pub no: u64,
    /// Decimal trait multiplier.
    #[serde(rename = "trait")]
    pub value: String,
    /// Optional expiry; a past timestamp makes the request unauthorized.
    /// Absent on legacy payloads.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Write Requests
// =============================================================================

/// Request to create or update a trait record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WriteTraitRequest {
    /// The raw JSON payload that was signed (a [`TraitUpdate`]).
    pub unsigned_msg: String,
    /// Hex-encoded 65-byte personal-message signature over `unsigned_msg`.
    pub signature: String,
}

/// Outcome of a write request.
///
/// An unauthorized write reports `success: false` with HTTP 200 rather
/// than an HTTP error; callers cannot tell which check failed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WriteTraitResponse {
    pub success: bool,
    /// The upserted record, present on success only.
    #[serde(rename = "trait", skip_serializing_if = "Option::is_none")]
    pub record: Option<TraitRecord>,
}

impl WriteTraitResponse {
    pub fn stored(record: TraitRecord) -> Self {
        Self {
            success: true,
            record: Some(record),
        }
    }

    pub fn denied() -> Self {
        Self {
            success: false,
            record: None,
        }
    }
}

// =============================================================================
// Read Responses
// =============================================================================

/// A trait value resolved for one token: the stored override if present,
/// otherwise the chain-reported default formatted to the same decimal shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ResolvedTrait {
    pub no: u64,
    #[serde(rename = "trait")]
    pub value: String,
}

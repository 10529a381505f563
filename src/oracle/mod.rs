// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The signing oracle: owner-signature write authorization and signed
//! deposit attestations.
//!
//! Correctness here means byte-for-byte agreement with the vault
//! contract's verification path; see `attest` for the packed encoding and
//! `auth` for the personal-message recovery scheme.

pub mod attest;
pub mod auth;
pub mod units;

pub use attest::{AttestError, Attestation, DepositOracle};
pub use auth::{AuthError, OwnerVerifier};

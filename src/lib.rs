// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token Gate - Bearer Token Issuance Service
//!
//! Issues short-lived HMAC-signed bearer tokens and uses them to gate two
//! protected operations: random identifier generation and file upload.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification and the authorization gate
//! - `config` - Environment configuration
//! - `ids` - Random numeric identifiers
//! - `storage` - Upload persistence

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod ids;
pub mod state;
pub mod storage;

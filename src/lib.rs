// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client library for the leads management API.
//!
//! This crate wraps the backend of the partner leads console: session
//! handling with transparent token refresh, the typed endpoint surface,
//! and the phone masking used when capturing lead numbers.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod phone;
pub mod session;
pub mod whatsapp;

pub use client::LeadsClient;
pub use config::Config;
pub use error::{ApiError, Result};
pub use session::SessionStore;

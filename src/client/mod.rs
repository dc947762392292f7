// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the leads API.

mod endpoints;
mod http;

pub use http::LeadsClient;

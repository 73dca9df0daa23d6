// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP server exposing the live log stream and runtime snapshots.
//!
//! Routes:
//! - `GET /vigil/logs/stream` - `text/event-stream` of serialized log events
//! - `GET /vigil/metrics` - JSON runtime snapshot

pub mod api;
pub mod error;
pub mod routes;
pub mod telemetry;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;

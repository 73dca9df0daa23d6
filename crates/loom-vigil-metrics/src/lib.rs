// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Point-in-time process and host snapshot for Loom Vigil.
//!
//! Independent of the log stream: the collector holds no state shared with
//! it and can be called at any rate.

mod collector;
mod error;
mod snapshot;

pub use collector::RuntimeCollector;
pub use error::{MetricsError, Result};
pub use snapshot::{MemoryInfo, OsInfo, RuntimeInfo, RuntimeSnapshot, ThreadInfo};

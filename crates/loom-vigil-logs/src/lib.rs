// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Live log event capture and fan-out for Loom Vigil.
//!
//! This crate provides:
//! - [`LogEvent`] - A normalized log event as seen by stream subscribers
//! - [`normalize`] - Pure conversion of a raw record into a [`LogEvent`]
//! - [`LogHub`] - A broadcast hub that replays the latest event to new subscribers
//! - [`CaptureBridge`] - The hand-off point from a logging backend to the hub
//! - [`CaptureLayer`] - A tracing Layer that drives a [`CaptureBridge`]
//!
//! # Usage
//!
//! ```ignore
//! use loom_vigil_logs::{attach_hub, CaptureBridge, CaptureLayer, LogHub};
//! use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
//!
//! let bridge = CaptureBridge::new(Some("my_app".into()));
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(CaptureLayer::new(bridge.clone()))
//!     .init();
//!
//! let hub = LogHub::with_default_capacity();
//! attach_hub(Some(&bridge), &hub);
//! ```

mod backtrace;
mod bridge;
mod entry;
mod error;
mod hub;
mod layer;
pub mod normalize;

pub use backtrace::capture_frames;
pub use bridge::{attach_hub, CaptureBridge, RawRecord, RecordSink};
pub use entry::{ErrorInfo, LogEvent, LogLevel};
pub use error::{LogsError, Result};
pub use hub::{
	EventEncoder, HubStats, JsonEncoder, LogHub, LogSubscription, SubscriberId,
	DEFAULT_CHANNEL_CAPACITY,
};
pub use layer::CaptureLayer;
pub use normalize::normalize;

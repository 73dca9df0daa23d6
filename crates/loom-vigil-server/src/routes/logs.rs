// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Live log streaming endpoint.
//!
//! - GET /vigil/logs/stream - SSE stream of log events
//!
//! Each SSE message carries one serialized event exactly as produced by the
//! hub. A client that joins late first receives the most recent event.

use std::convert::Infallible;

use axum::{
	extract::State,
	response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use loom_vigil_logs::SubscriberId;

use crate::api::AppState;

/// GET /vigil/logs/stream - Stream log events via SSE.
pub async fn stream_logs(
	State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
	// Logged before joining so the client is not sent its own connect line.
	tracing::debug!(
		subscribers = state.hub.subscriber_count(),
		"log stream subscriber connecting"
	);

	let mut subscription = state.hub.subscribe();
	let subscriber_id = subscription.id();

	let stream = async_stream::stream! {
		let _disconnect = DisconnectLog { subscriber_id };
		while let Some(payload) = subscription.next().await {
			yield Ok::<_, Infallible>(Event::default().data(&*payload));
		}
	};

	Sse::new(stream).keep_alive(
		KeepAlive::new()
			.interval(state.keep_alive)
			.text("keep-alive"),
	)
}

/// Logs when the response stream is dropped, i.e. the client went away.
struct DisconnectLog {
	subscriber_id: SubscriberId,
}

impl Drop for DisconnectLog {
	fn drop(&mut self) {
		tracing::debug!(
			subscriber_id = self.subscriber_id,
			"log stream subscriber disconnected"
		);
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Process-wide fan-out point for serialized log events.
//!
//! Publishing with nobody listening costs one atomic load. Once at least one
//! subscriber exists, each event is serialized once and the resulting
//! payload is shared by every subscriber. The most recent payload is retained
//! so a subscriber joining later starts from current state.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::entry::LogEvent;
use crate::error::Result;

/// Default capacity of the shared fan-out channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

pub type SubscriberId = u64;

/// Turns a [`LogEvent`] into its transport form.
pub trait EventEncoder: Send + Sync {
	fn encode(&self, event: &LogEvent) -> Result<String>;
}

/// Flat JSON encoding of a [`LogEvent`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl EventEncoder for JsonEncoder {
	fn encode(&self, event: &LogEvent) -> Result<String> {
		Ok(serde_json::to_string(event)?)
	}
}

/// Point-in-time counters for a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
	pub subscribers: usize,
	pub published: u64,
	pub dropped: u64,
}

/// Broadcast hub with a replay depth of one.
///
/// Cheap to clone; all clones share the same state. Create one per process
/// and hand it to the capture bridge and the stream endpoint.
#[derive(Clone)]
pub struct LogHub {
	inner: Arc<HubInner>,
}

struct HubInner {
	encoder: Arc<dyn EventEncoder>,
	/// Last payload sent. Publishes and joins are ordered by this lock.
	retained: Mutex<Option<Arc<str>>>,
	sender: broadcast::Sender<Arc<str>>,
	/// Cancellation flag per live subscriber.
	subscribers: Mutex<HashMap<SubscriberId, Arc<AtomicBool>>>,
	/// Mirrors `subscribers.len()` for the lock-free publish check.
	active: AtomicUsize,
	next_id: AtomicU64,
	published: AtomicU64,
	dropped: AtomicU64,
}

impl LogHub {
	/// Create a hub whose fan-out channel holds `capacity` undelivered events.
	pub fn new(capacity: usize) -> Self {
		Self::with_encoder(capacity, Arc::new(JsonEncoder))
	}

	pub fn with_default_capacity() -> Self {
		Self::new(DEFAULT_CHANNEL_CAPACITY)
	}

	pub fn with_encoder(capacity: usize, encoder: Arc<dyn EventEncoder>) -> Self {
		let (sender, _) = broadcast::channel(capacity.max(1));
		Self {
			inner: Arc::new(HubInner {
				encoder,
				retained: Mutex::new(None),
				sender,
				subscribers: Mutex::new(HashMap::new()),
				active: AtomicUsize::new(0),
				next_id: AtomicU64::new(1),
				published: AtomicU64::new(0),
				dropped: AtomicU64::new(0),
			}),
		}
	}

	/// Serialize `event` and deliver it to every current subscriber.
	///
	/// Does nothing when there are no subscribers. Encoding failures drop the
	/// event. Never blocks on slow subscribers.
	pub fn publish(&self, event: &LogEvent) {
		if self.inner.active.load(Ordering::Acquire) == 0 {
			return;
		}

		let payload: Arc<str> = match self.inner.encoder.encode(event) {
			Ok(payload) => Arc::from(payload),
			Err(_) => {
				self.inner.dropped.fetch_add(1, Ordering::Relaxed);
				return;
			}
		};

		{
			let mut retained = self.inner.retained.lock();
			*retained = Some(Arc::clone(&payload));
			// Err only means every receiver is gone, which is fine.
			let _ = self.inner.sender.send(payload);
		}

		self.inner.published.fetch_add(1, Ordering::Relaxed);
	}

	/// Register a subscriber.
	///
	/// The returned stream yields the retained payload first, if any, then
	/// every later publish in order.
	pub fn subscribe(&self) -> LogSubscription {
		let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
		let cancelled = Arc::new(AtomicBool::new(false));

		let (replay, receiver) = {
			let mut subscribers = self.inner.subscribers.lock();
			subscribers.insert(id, Arc::clone(&cancelled));

			let retained = self.inner.retained.lock();
			self.inner.active.fetch_add(1, Ordering::AcqRel);
			(retained.clone(), self.inner.sender.subscribe())
		};

		LogSubscription {
			id,
			hub: self.clone(),
			replay,
			stream: BroadcastStream::new(receiver),
			cancelled,
			skipped: 0,
			done: false,
		}
	}

	/// Remove a subscriber. Returns `false` if it was already gone.
	///
	/// The subscriber's stream ends the next time it is polled.
	pub fn unsubscribe(&self, id: SubscriberId) -> bool {
		let mut subscribers = self.inner.subscribers.lock();
		match subscribers.remove(&id) {
			Some(cancelled) => {
				cancelled.store(true, Ordering::Release);
				self.inner.active.fetch_sub(1, Ordering::AcqRel);
				true
			}
			None => false,
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.active.load(Ordering::Acquire)
	}

	pub fn has_subscribers(&self) -> bool {
		self.subscriber_count() > 0
	}

	/// The payload a new subscriber would be replayed.
	pub fn retained(&self) -> Option<Arc<str>> {
		self.inner.retained.lock().clone()
	}

	pub fn stats(&self) -> HubStats {
		HubStats {
			subscribers: self.subscriber_count(),
			published: self.inner.published.load(Ordering::Relaxed),
			dropped: self.inner.dropped.load(Ordering::Relaxed),
		}
	}
}

impl Default for LogHub {
	fn default() -> Self {
		Self::with_default_capacity()
	}
}

impl std::fmt::Debug for LogHub {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LogHub").field("stats", &self.stats()).finish()
	}
}

/// One subscriber's view of the hub.
///
/// A `Stream` of serialized events with no natural end. Dropping it
/// unsubscribes.
pub struct LogSubscription {
	id: SubscriberId,
	hub: LogHub,
	replay: Option<Arc<str>>,
	stream: BroadcastStream<Arc<str>>,
	cancelled: Arc<AtomicBool>,
	skipped: u64,
	done: bool,
}

impl LogSubscription {
	pub fn id(&self) -> SubscriberId {
		self.id
	}

	/// Events overwritten before this subscriber could read them.
	pub fn skipped(&self) -> u64 {
		self.skipped
	}

	pub fn is_cancelled(&self) -> bool {
		self.done || self.cancelled.load(Ordering::Acquire)
	}

	/// Leave the hub. Safe to call more than once.
	pub fn unsubscribe(&mut self) {
		self.hub.unsubscribe(self.id);
		self.done = true;
		self.replay = None;
	}
}

impl Stream for LogSubscription {
	type Item = Arc<str>;

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		let this = self.get_mut();

		if this.is_cancelled() {
			this.done = true;
			return Poll::Ready(None);
		}

		if let Some(payload) = this.replay.take() {
			return Poll::Ready(Some(payload));
		}

		loop {
			match ready!(this.stream.poll_next_unpin(cx)) {
				Some(Ok(payload)) => {
					if this.cancelled.load(Ordering::Acquire) {
						this.done = true;
						return Poll::Ready(None);
					}
					return Poll::Ready(Some(payload));
				}
				Some(Err(BroadcastStreamRecvError::Lagged(n))) => {
					this.skipped += n;
				}
				None => {
					this.done = true;
					return Poll::Ready(None);
				}
			}
		}
	}
}

impl Drop for LogSubscription {
	fn drop(&mut self) {
		self.hub.unsubscribe(self.id);
	}
}

impl std::fmt::Debug for LogSubscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LogSubscription")
			.field("id", &self.id)
			.field("skipped", &self.skipped)
			.field("cancelled", &self.is_cancelled())
			.finish()
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracking calls forwarded from an embedded web view.
//!
//! Web content posts JSON messages of the form
//! `{"command": ..., "trackers": [...], "event": {...}, "context": [...]}`.
//! Each message is validated and dispatched once per named tracker, or once
//! with `tracker: null` when no tracker is named.

use futures::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::bridge::SharedBridge;
use crate::deferred::SharedErrorHandler;
use crate::error::{Result, TrackerError};
use crate::router::{EventKind, EventRouter};

/// Commands a web view may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WebViewCommand {
	TrackSelfDescribingEvent,
	TrackStructEvent,
	TrackPageView,
	TrackScreenView,
	#[serde(other)]
	Unknown,
}

impl WebViewCommand {
	fn kind(&self) -> Option<EventKind> {
		match self {
			WebViewCommand::TrackSelfDescribingEvent => Some(EventKind::SelfDescribing),
			WebViewCommand::TrackStructEvent => Some(EventKind::Structured),
			WebViewCommand::TrackPageView => Some(EventKind::PageView),
			WebViewCommand::TrackScreenView => Some(EventKind::ScreenView),
			WebViewCommand::Unknown => None,
		}
	}
}

/// One inbound web-view message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebViewMessage {
	pub command: WebViewCommand,
	#[serde(default)]
	pub trackers: Option<Vec<String>>,
	#[serde(default)]
	pub event: Value,
	#[serde(default)]
	pub context: Option<Value>,
}

/// Dispatches web-view messages. Every failure goes to the error handler.
#[derive(Clone)]
pub struct WebViewHandler {
	router: EventRouter,
	handler: SharedErrorHandler,
}

impl WebViewHandler {
	pub fn new(bridge: SharedBridge, handler: SharedErrorHandler) -> Self {
		Self {
			router: EventRouter::new(bridge),
			handler,
		}
	}

	/// Parses and dispatches a raw message.
	pub async fn handle(&self, message: &str) {
		match serde_json::from_str::<WebViewMessage>(message) {
			Ok(message) => self.handle_message(&message).await,
			Err(err) => {
				self.handler
					.on_error(&TrackerError::WebViewMessage(err.to_string()))
					.await
			}
		}
	}

	/// Dispatches a parsed message. Unknown commands are ignored.
	pub async fn handle_message(&self, message: &WebViewMessage) {
		for err in self.dispatch(message).await {
			self.handler.on_error(&err).await;
		}
	}

	/// Dispatches to every named tracker and returns the failures.
	pub async fn dispatch(&self, message: &WebViewMessage) -> Vec<TrackerError> {
		let Some(kind) = message.command.kind() else {
			debug!(command = ?message.command, "Ignoring unknown web-view command");
			return Vec::new();
		};

		// Page views from web content carry no contexts.
		let (event, contexts) = match kind {
			EventKind::PageView => (page_view(&message.event), None),
			_ => (message.event.clone(), message.context.as_ref()),
		};

		let namespaces: Vec<Option<&str>> = match message.trackers.as_deref() {
			None | Some([]) => vec![None],
			Some(trackers) => trackers.iter().map(|t| Some(t.as_str())).collect(),
		};

		let dispatches = namespaces
			.into_iter()
			.map(|namespace| self.router.dispatch(kind, namespace, &event, contexts));
		join_all(dispatches)
			.await
			.into_iter()
			.filter_map(Result::err)
			.collect()
	}
}

/// Maps a web page view `{url, title, referrer}` onto the page view event.
fn page_view(event: &Value) -> Value {
	let text = |key: &str| {
		event
			.get(key)
			.filter(|v| !v.is_null())
			.cloned()
			.unwrap_or_else(|| json!(""))
	};
	let mut mapped = json!({
		"pageUrl": text("url"),
		"pageTitle": text("title"),
	});
	if let Some(referrer) = event.get("referrer").filter(|r| !r.is_null()) {
		mapped["referrer"] = referrer.clone();
	}
	mapped
}

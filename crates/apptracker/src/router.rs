// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validates payloads and forwards them to the native bridge.
//!
//! Every operation follows the same sequence: check the payload against its
//! schema, check the contexts array, call the bridge, and wrap any failure
//! with the operation name. The router does not wait for readiness; the
//! tracker façade and the web-view handler decide that.

use apptracker_core::{validate, SchemaKind};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::bridge::{BridgeMethod, SharedBridge};
use crate::error::{Result, TrackerError};

/// Event kinds dispatched through [`EventRouter::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	SelfDescribing,
	ScreenView,
	Structured,
	PageView,
	Timing,
	ConsentGranted,
	ConsentWithdrawn,
	EcommerceTransaction,
	DeepLinkReceived,
	MessageNotification,
}

impl EventKind {
	pub const ALL: [EventKind; 10] = [
		EventKind::SelfDescribing,
		EventKind::ScreenView,
		EventKind::Structured,
		EventKind::PageView,
		EventKind::Timing,
		EventKind::ConsentGranted,
		EventKind::ConsentWithdrawn,
		EventKind::EcommerceTransaction,
		EventKind::DeepLinkReceived,
		EventKind::MessageNotification,
	];

	pub fn schema(&self) -> SchemaKind {
		match self {
			EventKind::SelfDescribing => SchemaKind::SelfDescribing,
			EventKind::ScreenView => SchemaKind::ScreenView,
			EventKind::Structured => SchemaKind::Structured,
			EventKind::PageView => SchemaKind::PageView,
			EventKind::Timing => SchemaKind::Timing,
			EventKind::ConsentGranted => SchemaKind::ConsentGranted,
			EventKind::ConsentWithdrawn => SchemaKind::ConsentWithdrawn,
			EventKind::EcommerceTransaction => SchemaKind::EcommerceTransaction,
			EventKind::DeepLinkReceived => SchemaKind::DeepLinkReceived,
			EventKind::MessageNotification => SchemaKind::MessageNotification,
		}
	}

	/// Maps an event schema back to its kind.
	pub fn from_schema(schema: SchemaKind) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.schema() == schema)
	}

	pub fn method(&self) -> BridgeMethod {
		match self {
			EventKind::SelfDescribing => BridgeMethod::TrackSelfDescribingEvent,
			EventKind::ScreenView => BridgeMethod::TrackScreenViewEvent,
			EventKind::Structured => BridgeMethod::TrackStructuredEvent,
			EventKind::PageView => BridgeMethod::TrackPageView,
			EventKind::Timing => BridgeMethod::TrackTimingEvent,
			EventKind::ConsentGranted => BridgeMethod::TrackConsentGrantedEvent,
			EventKind::ConsentWithdrawn => BridgeMethod::TrackConsentWithdrawnEvent,
			EventKind::EcommerceTransaction => BridgeMethod::TrackEcommerceTransactionEvent,
			EventKind::DeepLinkReceived => BridgeMethod::TrackDeepLinkReceivedEvent,
			EventKind::MessageNotification => BridgeMethod::TrackMessageNotificationEvent,
		}
	}

	/// Returns the prefix used on errors raised while tracking this kind.
	pub fn operation(&self) -> &'static str {
		match self {
			EventKind::SelfDescribing => "trackSelfDescribingEvent",
			EventKind::ScreenView => "trackScreenViewEvent",
			EventKind::Structured => "trackStructuredEvent",
			EventKind::PageView => "trackPageView",
			EventKind::Timing => "trackTimingEvent",
			EventKind::ConsentGranted => "trackConsentGranted",
			EventKind::ConsentWithdrawn => "trackConsentWithdrawn",
			EventKind::EcommerceTransaction => "trackEcommerceTransaction",
			EventKind::DeepLinkReceived => "trackDeepLinkReceivedEvent",
			EventKind::MessageNotification => "trackMessageNotificationEvent",
		}
	}
}

/// Validating front of a [`NativeBridge`](crate::NativeBridge).
///
/// `namespace` is `None` only for web-view messages that name no tracker.
#[derive(Clone)]
pub struct EventRouter {
	bridge: SharedBridge,
}

impl EventRouter {
	pub fn new(bridge: SharedBridge) -> Self {
		Self { bridge }
	}

	pub fn bridge(&self) -> &SharedBridge {
		&self.bridge
	}

	/// Validates and forwards one event.
	///
	/// `contexts` defaults to an empty array.
	pub async fn dispatch(
		&self,
		kind: EventKind,
		namespace: Option<&str>,
		event: &Value,
		contexts: Option<&Value>,
	) -> Result<()> {
		let operation = kind.operation();
		check(operation, kind.schema(), event)?;
		let contexts = checked_contexts(operation, contexts)?;

		let args = json!({
			"tracker": namespace,
			"eventData": event,
			"contexts": contexts,
		});
		self.invoke(operation, kind.method(), args).await.map(drop)
	}

	/// Tracks a custom event. The payload may be any object.
	pub async fn track_custom(
		&self,
		namespace: Option<&str>,
		name: &str,
		data: &Value,
		contexts: Option<&Value>,
	) -> Result<()> {
		const OPERATION: &str = "trackCustomEvent";
		check(OPERATION, SchemaKind::Custom, data)?;
		let contexts = checked_contexts(OPERATION, contexts)?;

		let args = json!({
			"tracker": namespace,
			"eventName": name,
			"eventData": data,
			"contexts": contexts,
		});
		self.invoke(OPERATION, BridgeMethod::TrackCustomEvent, args)
			.await
			.map(drop)
	}

	/// Tracks a click. Click events carry no contexts.
	pub async fn track_click(&self, namespace: Option<&str>, data: &Value) -> Result<()> {
		const OPERATION: &str = "trackClickEvent";
		check(OPERATION, SchemaKind::Click, data)?;

		let args = json!({"tracker": namespace, "eventData": data});
		self.invoke(OPERATION, BridgeMethod::TrackClickEvent, args)
			.await
			.map(drop)
	}

	/// Sets custom tags, optionally under a category.
	pub async fn set_custom_tags(
		&self,
		namespace: Option<&str>,
		category: Option<&str>,
		tags: &Value,
		contexts: Option<&Value>,
	) -> Result<()> {
		const OPERATION: &str = "setCustomTags";
		check(OPERATION, SchemaKind::CustomTags, tags)?;
		let contexts = checked_contexts(OPERATION, contexts)?;

		let mut args = Map::new();
		args.insert("tracker".to_string(), json!(namespace));
		let method = match category {
			Some(category) => {
				args.insert("category".to_string(), json!(category));
				BridgeMethod::SetCustomTagsWithCategory
			}
			None => BridgeMethod::SetCustomTags,
		};
		args.insert("tags".to_string(), tags.clone());
		args.insert("contexts".to_string(), contexts);
		self.invoke(OPERATION, method, Value::Object(args))
			.await
			.map(drop)
	}

	/// Clears the named custom tags.
	pub async fn clear_custom_tags(
		&self,
		namespace: Option<&str>,
		tag_keys: &Value,
		contexts: Option<&Value>,
	) -> Result<()> {
		const OPERATION: &str = "clearCustomTags";
		check(OPERATION, SchemaKind::TagKeys, tag_keys)?;
		let contexts = checked_contexts(OPERATION, contexts)?;

		let args = json!({"tracker": namespace, "tagKeys": tag_keys, "contexts": contexts});
		self.invoke(OPERATION, BridgeMethod::ClearCustomTags, args)
			.await
			.map(drop)
	}

	pub async fn clear_all_custom_tags(
		&self,
		namespace: Option<&str>,
		contexts: Option<&Value>,
	) -> Result<()> {
		const OPERATION: &str = "clearAllCustomTags";
		let contexts = checked_contexts(OPERATION, contexts)?;

		let args = json!({"tracker": namespace, "contexts": contexts});
		self.invoke(OPERATION, BridgeMethod::ClearAllCustomTags, args)
			.await
			.map(drop)
	}

	/// Adds a global context bundle. Tag uniqueness is left to the bridge.
	pub async fn add_global_contexts(&self, namespace: Option<&str>, bundle: &Value) -> Result<()> {
		const OPERATION: &str = "addGlobalContexts";
		check(OPERATION, SchemaKind::GlobalContext, bundle)?;

		let args = json!({"tracker": namespace, "addGlobalContext": bundle});
		self.invoke(OPERATION, BridgeMethod::AddGlobalContexts, args)
			.await
			.map(drop)
	}

	/// Removes the global context bundle registered under `tag`.
	pub async fn remove_global_contexts(&self, namespace: Option<&str>, tag: &str) -> Result<()> {
		const OPERATION: &str = "removeGlobalContexts";
		let args = json!({"tracker": namespace, "removeTag": tag});
		self.invoke(OPERATION, BridgeMethod::RemoveGlobalContexts, args)
			.await
			.map(drop)
	}

	/// Calls the bridge and attributes a failure to `operation`.
	pub(crate) async fn invoke(
		&self,
		operation: &'static str,
		method: BridgeMethod,
		args: Value,
	) -> Result<Value> {
		debug!(method = %method, tracker = %args["tracker"], "Calling native bridge");
		self.bridge
			.call(method, args)
			.await
			.map_err(|source| TrackerError::Bridge { operation, source })
	}
}

pub(crate) fn check(operation: &'static str, schema: SchemaKind, value: &Value) -> Result<()> {
	validate(schema, value).map_err(|source| TrackerError::Validation { operation, source })
}

fn checked_contexts(operation: &'static str, contexts: Option<&Value>) -> Result<Value> {
	match contexts {
		None | Some(Value::Null) => Ok(Value::Array(Vec::new())),
		Some(contexts) => {
			check(operation, SchemaKind::Contexts, contexts)?;
			Ok(contexts.clone())
		}
	}
}

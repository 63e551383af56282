// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The tracker façade.
//!
//! A [`Tracker`] binds a namespace, a native bridge and a readiness signal.
//! Building one validates the init configuration synchronously, then creates
//! the native tracker on a spawned task. Every operation is callable right
//! away and runs once creation settles.

use std::sync::Arc;

use apptracker_core::{validate_init, Event, InitConfig, ScreenSize, SelfDescribing, SubjectAttribute};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::bridge::SharedBridge;
use crate::deferred::{Deferred, ErrorHandler, ErrorPolicy, LogErrorHandler, SharedErrorHandler};
use crate::error::{Result, TrackerError};
use crate::readiness::{self, Readiness, ReadinessSignal};
use crate::router::{EventKind, EventRouter};
use crate::session::SessionGetter;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "CAT";

/// Error routing for deferred operations.
///
/// Fire-and-forget methods (`track_*`, `set_*`, tags, global contexts) and
/// session getters are configured separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOptions {
	pub method_policy: ErrorPolicy,
	pub getter_policy: ErrorPolicy,
}

enum ConfigSource {
	Typed(Box<InitConfig>),
	Raw(Value),
}

/// Builder for [`Tracker`].
pub struct TrackerBuilder {
	bridge: SharedBridge,
	config: Option<ConfigSource>,
	namespace: String,
	error_handler: SharedErrorHandler,
	options: DispatchOptions,
}

impl TrackerBuilder {
	pub fn new(bridge: SharedBridge) -> Self {
		Self {
			bridge,
			config: None,
			namespace: DEFAULT_NAMESPACE.to_string(),
			error_handler: Arc::new(LogErrorHandler),
			options: DispatchOptions::default(),
		}
	}

	/// Sets a typed init configuration.
	pub fn config(mut self, config: InitConfig) -> Self {
		self.config = Some(ConfigSource::Typed(Box::new(config)));
		self
	}

	/// Sets an untrusted JSON init configuration.
	pub fn raw_config(mut self, config: Value) -> Self {
		self.config = Some(ConfigSource::Raw(config));
		self
	}

	pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();
		self
	}

	/// Sets the handler for swallowed errors. Defaults to [`LogErrorHandler`].
	pub fn error_handler(mut self, handler: impl ErrorHandler) -> Self {
		self.error_handler = Arc::new(handler);
		self
	}

	pub fn shared_error_handler(mut self, handler: SharedErrorHandler) -> Self {
		self.error_handler = handler;
		self
	}

	pub fn dispatch_options(mut self, options: DispatchOptions) -> Self {
		self.options = options;
		self
	}

	/// Validates the configuration and starts tracker creation.
	///
	/// Must be called from within a tokio runtime.
	///
	/// # Errors
	/// [`TrackerError::Config`] if the configuration is invalid (no tracker
	/// is created), [`TrackerError::NoRuntime`] outside a runtime.
	pub fn build(self) -> Result<Tracker> {
		let mut config = match self.config {
			Some(ConfigSource::Typed(config)) => serde_json::to_value(&*config)?,
			Some(ConfigSource::Raw(config)) => config,
			None => Value::Object(Map::new()),
		};
		validate_init(&config)?;
		let runtime = Handle::try_current().map_err(|_| TrackerError::NoRuntime)?;

		if let Value::Object(map) = &mut config {
			map.insert("namespace".to_string(), json!(self.namespace));
		}

		let (resolver, readiness) = readiness::channel();
		let bridge = Arc::clone(&self.bridge);
		let namespace = self.namespace.clone();
		info!(namespace = %namespace, "Creating tracker");
		runtime.spawn(async move {
			match bridge.create_tracker(config).await {
				Ok(()) => {
					info!(namespace = %namespace, "Tracker ready");
					resolver.resolve();
				}
				Err(source) => {
					let err = TrackerError::Bridge {
						operation: "createTracker",
						source,
					};
					warn!(namespace = %namespace, error = %err, "Tracker creation failed");
					resolver.reject(err.to_string());
				}
			}
		});

		let inner = TrackerInner {
			methods: Deferred::new(
				readiness.clone(),
				Arc::clone(&self.error_handler),
				self.options.method_policy,
			),
			getters: Deferred::new(
				readiness.clone(),
				self.error_handler,
				self.options.getter_policy,
			),
			namespace: self.namespace,
			router: EventRouter::new(self.bridge),
			readiness,
		};
		Ok(Tracker {
			inner: Arc::new(inner),
		})
	}
}

/// Handle to one native tracker. Cheap to clone.
#[derive(Clone)]
pub struct Tracker {
	inner: Arc<TrackerInner>,
}

struct TrackerInner {
	namespace: String,
	router: EventRouter,
	methods: Deferred,
	getters: Deferred,
	readiness: ReadinessSignal,
}

impl Tracker {
	pub fn builder(bridge: SharedBridge) -> TrackerBuilder {
		TrackerBuilder::new(bridge)
	}

	pub fn namespace(&self) -> &str {
		&self.inner.namespace
	}

	/// Returns the creation state without waiting.
	pub fn readiness(&self) -> Readiness {
		self.inner.readiness.current()
	}

	/// Waits for tracker creation to settle.
	pub async fn ready(&self) -> Result<()> {
		self.inner.readiness.wait().await
	}

	fn ns(&self) -> Option<&str> {
		Some(self.inner.namespace.as_str())
	}

	// Events

	/// Tracks an event of the given kind once the tracker is ready.
	pub async fn track_event(&self, kind: EventKind, event: Value, contexts: Option<Value>) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.dispatch(kind, self.ns(), &event, contexts.as_ref()))
			.await
	}

	/// Tracks a typed event.
	pub async fn track<E: Event>(&self, event: &E, contexts: &[SelfDescribing]) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| async move {
				let kind = EventKind::from_schema(E::SCHEMA).ok_or(TrackerError::InvalidArgument {
					operation: "track",
					message: format!("{} is not a trackable event", E::SCHEMA),
				})?;
				let event = serde_json::to_value(event)?;
				let contexts = serde_json::to_value(contexts)?;
				router.dispatch(kind, self.ns(), &event, Some(&contexts)).await
			})
			.await
	}

	pub async fn track_self_describing_event(&self, event: Value, contexts: Option<Value>) -> Result<()> {
		self.track_event(EventKind::SelfDescribing, event, contexts).await
	}

	pub async fn track_screen_view_event(&self, event: Value, contexts: Option<Value>) -> Result<()> {
		self.track_event(EventKind::ScreenView, event, contexts).await
	}

	pub async fn track_structured_event(&self, event: Value, contexts: Option<Value>) -> Result<()> {
		self.track_event(EventKind::Structured, event, contexts).await
	}

	pub async fn track_page_view(&self, event: Value, contexts: Option<Value>) -> Result<()> {
		self.track_event(EventKind::PageView, event, contexts).await
	}

	pub async fn track_timing_event(&self, event: Value, contexts: Option<Value>) -> Result<()> {
		self.track_event(EventKind::Timing, event, contexts).await
	}

	pub async fn track_consent_granted_event(&self, event: Value, contexts: Option<Value>) -> Result<()> {
		self.track_event(EventKind::ConsentGranted, event, contexts).await
	}

	pub async fn track_consent_withdrawn_event(
		&self,
		event: Value,
		contexts: Option<Value>,
	) -> Result<()> {
		self.track_event(EventKind::ConsentWithdrawn, event, contexts).await
	}

	pub async fn track_ecommerce_transaction_event(
		&self,
		event: Value,
		contexts: Option<Value>,
	) -> Result<()> {
		self.track_event(EventKind::EcommerceTransaction, event, contexts)
			.await
	}

	pub async fn track_deep_link_received_event(
		&self,
		event: Value,
		contexts: Option<Value>,
	) -> Result<()> {
		self.track_event(EventKind::DeepLinkReceived, event, contexts).await
	}

	pub async fn track_message_notification_event(
		&self,
		event: Value,
		contexts: Option<Value>,
	) -> Result<()> {
		self.track_event(EventKind::MessageNotification, event, contexts)
			.await
	}

	pub async fn track_custom_event(&self, name: &str, data: Value, contexts: Option<Value>) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.track_custom(self.ns(), name, &data, contexts.as_ref()))
			.await
	}

	pub async fn track_click_event(&self, data: Value) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.track_click(self.ns(), &data))
			.await
	}

	// Custom tags

	pub async fn set_custom_tags(&self, tags: Value, contexts: Option<Value>) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.set_custom_tags(self.ns(), None, &tags, contexts.as_ref()))
			.await
	}

	pub async fn set_custom_tags_with_category(
		&self,
		category: &str,
		tags: Value,
		contexts: Option<Value>,
	) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.set_custom_tags(self.ns(), Some(category), &tags, contexts.as_ref()))
			.await
	}

	pub async fn clear_custom_tags(&self, tag_keys: Value, contexts: Option<Value>) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.clear_custom_tags(self.ns(), &tag_keys, contexts.as_ref()))
			.await
	}

	pub async fn clear_all_custom_tags(&self, contexts: Option<Value>) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.clear_all_custom_tags(self.ns(), contexts.as_ref()))
			.await
	}

	// Global contexts

	pub async fn add_global_contexts(&self, bundle: Value) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.add_global_contexts(self.ns(), &bundle))
			.await
	}

	pub async fn remove_global_contexts(&self, tag: &str) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.remove_global_contexts(self.ns(), tag))
			.await
	}

	// Subject

	pub async fn set_subject_attribute(&self, attribute: SubjectAttribute, value: Value) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.set_subject_attribute(self.ns(), attribute, &value))
			.await
	}

	pub async fn set_user_id(&self, user_id: Option<&str>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::UserId, user_id.into())
			.await
	}

	pub async fn set_network_user_id(&self, network_user_id: Option<&str>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::NetworkUserId, network_user_id.into())
			.await
	}

	pub async fn set_domain_user_id(&self, domain_user_id: Option<&str>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::DomainUserId, domain_user_id.into())
			.await
	}

	pub async fn set_ip_address(&self, ip_address: Option<&str>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::IpAddress, ip_address.into())
			.await
	}

	pub async fn set_useragent(&self, useragent: Option<&str>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::Useragent, useragent.into())
			.await
	}

	pub async fn set_timezone(&self, timezone: Option<&str>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::Timezone, timezone.into())
			.await
	}

	pub async fn set_language(&self, language: Option<&str>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::Language, language.into())
			.await
	}

	pub async fn set_screen_resolution(&self, size: Option<ScreenSize>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::ScreenResolution, screen_size(size))
			.await
	}

	pub async fn set_screen_viewport(&self, size: Option<ScreenSize>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::ScreenViewport, screen_size(size))
			.await
	}

	pub async fn set_color_depth(&self, color_depth: Option<u32>) -> Result<()> {
		self.set_subject_attribute(SubjectAttribute::ColorDepth, color_depth.into())
			.await
	}

	/// Applies a subject configuration; see [`EventRouter::set_subject_data`].
	pub async fn set_subject_data(&self, config: Value) -> Result<()> {
		let router = &self.inner.router;
		self.inner
			.methods
			.call(|| router.set_subject_data(self.ns(), &config))
			.await
	}

	// Session getters

	async fn get_session<T: DeserializeOwned>(&self, getter: SessionGetter) -> Result<Option<T>> {
		let router = &self.inner.router;
		self.inner
			.getters
			.call_with_result(|| router.get_session::<T>(self.ns(), getter))
			.await
			.map(Option::flatten)
	}

	pub async fn get_session_user_id(&self) -> Result<Option<String>> {
		self.get_session(SessionGetter::SessionUserId).await
	}

	pub async fn get_session_id(&self) -> Result<Option<String>> {
		self.get_session(SessionGetter::SessionId).await
	}

	pub async fn get_session_index(&self) -> Result<Option<u64>> {
		self.get_session(SessionGetter::SessionIndex).await
	}

	pub async fn get_is_in_background(&self) -> Result<Option<bool>> {
		self.get_session(SessionGetter::IsInBackground).await
	}

	pub async fn get_background_index(&self) -> Result<Option<u64>> {
		self.get_session(SessionGetter::BackgroundIndex).await
	}

	pub async fn get_foreground_index(&self) -> Result<Option<u64>> {
		self.get_session(SessionGetter::ForegroundIndex).await
	}
}

fn screen_size(size: Option<ScreenSize>) -> Value {
	match size {
		Some(ScreenSize(width, height)) => json!([width, height]),
		None => Value::Null,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bridge::{BridgeMethod, NativeBridge};
	use crate::error::BridgeError;
	use apptracker_core::ConfigError;
	use async_trait::async_trait;
	use std::sync::Mutex;

	#[derive(Default)]
	struct CreateBridge {
		created: Mutex<Vec<Value>>,
	}

	#[async_trait]
	impl NativeBridge for CreateBridge {
		async fn create_tracker(&self, config: Value) -> std::result::Result<(), BridgeError> {
			self.created.lock().unwrap().push(config);
			Ok(())
		}

		async fn remove_tracker(&self, _namespace: &str) -> std::result::Result<bool, BridgeError> {
			Ok(true)
		}

		async fn remove_all_trackers(&self) -> std::result::Result<bool, BridgeError> {
			Ok(true)
		}

		async fn call(
			&self,
			_method: BridgeMethod,
			_args: Value,
		) -> std::result::Result<Value, BridgeError> {
			Ok(Value::Null)
		}
	}

	#[tokio::test]
	async fn invalid_config_is_returned_and_nothing_is_created() {
		let bridge = Arc::new(CreateBridge::default());
		let result = Tracker::builder(bridge.clone())
			.raw_config(json!({"customerKey": "ck", "appName": "shop", "sessionConfig": {"foregroundTimeout": 100}}))
			.build();

		match result {
			Err(TrackerError::Config(ConfigError::InvalidSection { section, .. })) => {
				assert_eq!(section.key(), "sessionConfig")
			}
			Err(other) => panic!("unexpected error: {other}"),
			Ok(_) => panic!("tracker built from an invalid configuration"),
		}
		tokio::task::yield_now().await;
		assert!(bridge.created.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn missing_config_reports_customer_key() {
		let result = Tracker::builder(Arc::new(CreateBridge::default())).build();
		assert!(matches!(
			result,
			Err(TrackerError::Config(ConfigError::MissingCustomerKey))
		));
	}

	#[tokio::test]
	async fn typed_config_reaches_the_bridge_with_namespace() {
		let bridge = Arc::new(CreateBridge::default());
		let tracker = Tracker::builder(bridge.clone())
			.config(InitConfig::new("ck-1", "shop"))
			.build()
			.unwrap();
		assert_eq!(tracker.namespace(), DEFAULT_NAMESPACE);

		tracker.ready().await.unwrap();
		assert_eq!(tracker.readiness(), Readiness::Ready);
		assert_eq!(
			bridge.created.lock().unwrap().clone(),
			vec![json!({"customerKey": "ck-1", "appName": "shop", "namespace": "CAT"})]
		);
	}

	#[test]
	fn build_outside_a_runtime_fails() {
		let result = Tracker::builder(Arc::new(CreateBridge::default()))
			.raw_config(json!({"customerKey": "ck", "appName": "shop"}))
			.build();
		assert!(matches!(result, Err(TrackerError::NoRuntime)));
	}

	#[test]
	fn screen_sizes_serialize_as_pairs() {
		assert_eq!(screen_size(Some(ScreenSize(320.0, 480.0))), json!([320.0, 480.0]));
		assert_eq!(screen_size(None), Value::Null);
	}
}

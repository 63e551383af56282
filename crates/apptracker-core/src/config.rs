// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker init configuration.
//!
//! [`validate_init`] checks a raw JSON configuration before any tracker is
//! created. The typed structs below serialize into exactly that JSON shape,
//! so a configuration built in Rust passes through the same check.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::event::{GlobalContext, ScreenSize};
use crate::schema::SchemaKind;
use crate::validate::validate;

/// An optional sub-configuration of the init configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
	Network,
	Tracker,
	Session,
	Emitter,
	Subject,
	Gdpr,
	GlobalContexts,
	Remote,
}

impl ConfigSection {
	/// Sections in the order they are checked.
	pub const ALL: [ConfigSection; 8] = [
		ConfigSection::Network,
		ConfigSection::Tracker,
		ConfigSection::Session,
		ConfigSection::Emitter,
		ConfigSection::Subject,
		ConfigSection::Gdpr,
		ConfigSection::GlobalContexts,
		ConfigSection::Remote,
	];

	/// Returns the key of this section in the init configuration.
	pub fn key(&self) -> &'static str {
		match self {
			ConfigSection::Network => "networkConfig",
			ConfigSection::Tracker => "trackerConfig",
			ConfigSection::Session => "sessionConfig",
			ConfigSection::Emitter => "emitterConfig",
			ConfigSection::Subject => "subjectConfig",
			ConfigSection::Gdpr => "gdprConfig",
			ConfigSection::GlobalContexts => "gcConfig",
			ConfigSection::Remote => "remoteConfig",
		}
	}

	pub fn schema(&self) -> SchemaKind {
		match self {
			ConfigSection::Network => SchemaKind::NetworkConfig,
			ConfigSection::Tracker => SchemaKind::TrackerConfig,
			ConfigSection::Session => SchemaKind::SessionConfig,
			ConfigSection::Emitter => SchemaKind::EmitterConfig,
			ConfigSection::Subject => SchemaKind::SubjectConfig,
			ConfigSection::Gdpr => SchemaKind::GdprConfig,
			ConfigSection::GlobalContexts => SchemaKind::GlobalContexts,
			ConfigSection::Remote => SchemaKind::RemoteConfig,
		}
	}
}

impl fmt::Display for ConfigSection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.key())
	}
}

/// Validates a raw tracker init configuration.
///
/// `customerKey` and `appName` are checked first, then each present
/// sub-configuration in [`ConfigSection::ALL`] order. A section that is
/// present must be a valid object (or array, for `gcConfig`); `null` is
/// rejected. Top-level keys outside these are passed through to the native
/// layer untouched.
///
/// # Errors
/// Returns the first [`ConfigError`] encountered.
pub fn validate_init(config: &Value) -> Result<()> {
	let Value::Object(map) = config else {
		return Err(ConfigError::NotAnObject);
	};

	if !is_non_empty_string(map.get("customerKey")) {
		return Err(ConfigError::MissingCustomerKey);
	}
	if !is_non_empty_string(map.get("appName")) {
		return Err(ConfigError::MissingAppName);
	}

	for section in ConfigSection::ALL {
		match map.get(section.key()) {
			None => continue,
			Some(value) => {
				validate(section.schema(), value).map_err(|err| ConfigError::InvalidSection {
					section,
					reason: err.reason,
				})?
			}
		}
	}

	Ok(())
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
	matches!(value, Some(Value::String(s)) if !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
	Post,
	Get,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
	Web,
	Mob,
	Pc,
	Srv,
	App,
	Tv,
	Cnsl,
	Iot,
}

/// Native SDK log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Off,
	Error,
	Debug,
	Verbose,
}

/// Emitter buffer size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferOption {
	Single,
	Default,
	Large,
	Heavy,
}

/// GDPR basis for processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
	Consent,
	Contract,
	LegalObligation,
	LegitimateInterests,
	PublicTask,
	VitalInterests,
}

/// Typed tracker init configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitConfig {
	pub customer_key: String,
	pub app_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub network_config: Option<NetworkConfig>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tracker_config: Option<TrackerConfig>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_config: Option<SessionConfig>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub emitter_config: Option<EmitterConfig>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subject_config: Option<SubjectConfig>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gdpr_config: Option<GdprConfig>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gc_config: Option<Vec<GlobalContext>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub remote_config: Option<RemoteConfig>,
}

impl InitConfig {
	pub fn new(customer_key: impl Into<String>, app_name: impl Into<String>) -> Self {
		Self {
			customer_key: customer_key.into(),
			app_name: app_name.into(),
			network_config: None,
			tracker_config: None,
			session_config: None,
			emitter_config: None,
			subject_config: None,
			gdpr_config: None,
			gc_config: None,
			remote_config: None,
		}
	}

	pub fn with_network(mut self, network: NetworkConfig) -> Self {
		self.network_config = Some(network);
		self
	}

	pub fn with_tracker(mut self, tracker: TrackerConfig) -> Self {
		self.tracker_config = Some(tracker);
		self
	}

	pub fn with_session(mut self, session: SessionConfig) -> Self {
		self.session_config = Some(session);
		self
	}

	pub fn with_emitter(mut self, emitter: EmitterConfig) -> Self {
		self.emitter_config = Some(emitter);
		self
	}

	pub fn with_subject(mut self, subject: SubjectConfig) -> Self {
		self.subject_config = Some(subject);
		self
	}

	pub fn with_gdpr(mut self, gdpr: GdprConfig) -> Self {
		self.gdpr_config = Some(gdpr);
		self
	}

	pub fn with_global_contexts(mut self, bundles: Vec<GlobalContext>) -> Self {
		self.gc_config = Some(bundles);
		self
	}

	pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
		self.remote_config = Some(remote);
		self
	}
}

/// Collector endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
	pub endpoint: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<HttpMethod>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom_post_path: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request_headers: Option<BTreeMap<String, String>>,
}

impl NetworkConfig {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			method: None,
			custom_post_path: None,
			request_headers: None,
		}
	}

	pub fn with_method(mut self, method: HttpMethod) -> Self {
		self.method = Some(method);
		self
	}
}

/// Tracker feature switches. Unset fields keep the native defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub device_platform: Option<DevicePlatform>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base64_encoding: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub log_level: Option<LogLevel>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub application_context: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub platform_context: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub geo_location_context: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_context: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deep_link_context: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub screen_context: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub screen_view_autotracking: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lifecycle_autotracking: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub install_autotracking: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception_autotracking: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub diagnostic_autotracking: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_anonymisation: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bundle_info_autotracking: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enable_periodic_heartbeat: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub periodic_heartbeat_interval_in_sec: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub periodic_heartbeat_delay_in_sec: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_click_autotracking: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deep_link_autotracking: Option<bool>,
}

/// Session timeouts in seconds. Both are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
	pub foreground_timeout: u64,
	pub background_timeout: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitterConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub buffer_option: Option<BufferOption>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub emit_range: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thread_pool_size: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub byte_limit_post: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub byte_limit_get: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server_anonymisation: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub disable_event_caching: Option<bool>,
}

/// Subject attributes. Also the argument of `set_subject_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub network_user_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain_user_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub useragent: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ip_address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timezone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub language: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub screen_resolution: Option<ScreenSize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub screen_viewport: Option<ScreenSize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color_depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprConfig {
	pub basis_for_processing: Basis,
	pub document_id: String,
	pub document_version: String,
	pub document_description: String,
}

/// Remote configuration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
	pub endpoint: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<HttpMethod>,
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The seam between the SDK and the native tracker module.
//!
//! The native module exposes one entry point per operation. Every call takes a
//! single JSON argument object carrying the target tracker namespace under
//! `tracker`, plus operation-specific fields:
//!
//! | Operation | Arguments |
//! |-----------|-----------|
//! | `track*Event`, `trackPageView` | `{tracker, eventData, contexts}` |
//! | `trackCustomEvent` | `{tracker, eventName, eventData, contexts}` |
//! | `trackClickEvent` | `{tracker, eventData}` |
//! | `setCustomTags` | `{tracker, tags, contexts}` (+ `category`) |
//! | `clearCustomTags` | `{tracker, tagKeys, contexts}` |
//! | `addGlobalContexts` | `{tracker, addGlobalContext}` |
//! | `removeGlobalContexts` | `{tracker, removeTag}` |
//! | `set<Attribute>` | `{tracker, <attribute>: value or null}` |
//! | `get*` | `{tracker}` |

use std::fmt;
use std::sync::Arc;

use apptracker_core::SubjectAttribute;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::BridgeError;

/// A native module method reached through [`NativeBridge::call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeMethod {
	TrackSelfDescribingEvent,
	TrackScreenViewEvent,
	TrackStructuredEvent,
	TrackPageView,
	TrackTimingEvent,
	TrackConsentGrantedEvent,
	TrackConsentWithdrawnEvent,
	TrackEcommerceTransactionEvent,
	TrackDeepLinkReceivedEvent,
	TrackMessageNotificationEvent,
	TrackCustomEvent,
	TrackClickEvent,
	SetCustomTags,
	SetCustomTagsWithCategory,
	ClearCustomTags,
	ClearAllCustomTags,
	AddGlobalContexts,
	RemoveGlobalContexts,
	SetUserId,
	SetNetworkUserId,
	SetDomainUserId,
	SetIpAddress,
	SetUseragent,
	SetTimezone,
	SetLanguage,
	SetScreenResolution,
	SetScreenViewport,
	SetColorDepth,
	GetSessionUserId,
	GetSessionId,
	GetSessionIndex,
	GetIsInBackground,
	GetBackgroundIndex,
	GetForegroundIndex,
}

impl BridgeMethod {
	/// Returns the method name on the native module.
	pub fn as_str(&self) -> &'static str {
		match self {
			BridgeMethod::TrackSelfDescribingEvent => "trackSelfDescribingEvent",
			BridgeMethod::TrackScreenViewEvent => "trackScreenViewEvent",
			BridgeMethod::TrackStructuredEvent => "trackStructuredEvent",
			BridgeMethod::TrackPageView => "trackPageView",
			BridgeMethod::TrackTimingEvent => "trackTimingEvent",
			BridgeMethod::TrackConsentGrantedEvent => "trackConsentGrantedEvent",
			BridgeMethod::TrackConsentWithdrawnEvent => "trackConsentWithdrawnEvent",
			BridgeMethod::TrackEcommerceTransactionEvent => "trackEcommerceTransactionEvent",
			BridgeMethod::TrackDeepLinkReceivedEvent => "trackDeepLinkReceivedEvent",
			BridgeMethod::TrackMessageNotificationEvent => "trackMessageNotificationEvent",
			BridgeMethod::TrackCustomEvent => "trackCustomEvent",
			BridgeMethod::TrackClickEvent => "trackClickEvent",
			BridgeMethod::SetCustomTags => "setCustomTags",
			BridgeMethod::SetCustomTagsWithCategory => "setCustomTagsWithCategory",
			BridgeMethod::ClearCustomTags => "clearCustomTags",
			BridgeMethod::ClearAllCustomTags => "clearAllCustomTags",
			BridgeMethod::AddGlobalContexts => "addGlobalContexts",
			BridgeMethod::RemoveGlobalContexts => "removeGlobalContexts",
			BridgeMethod::SetUserId => "setUserId",
			BridgeMethod::SetNetworkUserId => "setNetworkUserId",
			BridgeMethod::SetDomainUserId => "setDomainUserId",
			BridgeMethod::SetIpAddress => "setIpAddress",
			BridgeMethod::SetUseragent => "setUseragent",
			BridgeMethod::SetTimezone => "setTimezone",
			BridgeMethod::SetLanguage => "setLanguage",
			BridgeMethod::SetScreenResolution => "setScreenResolution",
			BridgeMethod::SetScreenViewport => "setScreenViewport",
			BridgeMethod::SetColorDepth => "setColorDepth",
			BridgeMethod::GetSessionUserId => "getSessionUserId",
			BridgeMethod::GetSessionId => "getSessionId",
			BridgeMethod::GetSessionIndex => "getSessionIndex",
			BridgeMethod::GetIsInBackground => "getIsInBackground",
			BridgeMethod::GetBackgroundIndex => "getBackgroundIndex",
			BridgeMethod::GetForegroundIndex => "getForegroundIndex",
		}
	}

	/// Returns the setter for a subject attribute.
	pub fn setter(attribute: SubjectAttribute) -> Self {
		match attribute {
			SubjectAttribute::UserId => BridgeMethod::SetUserId,
			SubjectAttribute::NetworkUserId => BridgeMethod::SetNetworkUserId,
			SubjectAttribute::DomainUserId => BridgeMethod::SetDomainUserId,
			SubjectAttribute::IpAddress => BridgeMethod::SetIpAddress,
			SubjectAttribute::Useragent => BridgeMethod::SetUseragent,
			SubjectAttribute::Timezone => BridgeMethod::SetTimezone,
			SubjectAttribute::Language => BridgeMethod::SetLanguage,
			SubjectAttribute::ScreenResolution => BridgeMethod::SetScreenResolution,
			SubjectAttribute::ScreenViewport => BridgeMethod::SetScreenViewport,
			SubjectAttribute::ColorDepth => BridgeMethod::SetColorDepth,
		}
	}
}

impl fmt::Display for BridgeMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// The native tracker module.
///
/// Implementations forward to the platform SDK. Validation has already
/// happened by the time any of these methods is called.
#[async_trait]
pub trait NativeBridge: Send + Sync + 'static {
	/// Creates a tracker from a validated init configuration.
	async fn create_tracker(&self, config: Value) -> Result<(), BridgeError>;

	/// Removes the tracker with the given namespace. Returns whether one existed.
	async fn remove_tracker(&self, namespace: &str) -> Result<bool, BridgeError>;

	/// Removes every tracker.
	async fn remove_all_trackers(&self) -> Result<bool, BridgeError>;

	/// Invokes a per-tracker method. Getters resolve to their value, or `null`
	/// when the native side has none; other methods resolve to `null`.
	async fn call(&self, method: BridgeMethod, args: Value) -> Result<Value, BridgeError>;
}

/// Type alias for a shared native bridge.
pub type SharedBridge = Arc<dyn NativeBridge>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn setters_are_named_after_the_attribute() {
		for attribute in SubjectAttribute::ALL {
			let method = BridgeMethod::setter(attribute);
			let key = attribute.key();
			let expected = format!("set{}{}", key[..1].to_uppercase(), &key[1..]);
			assert_eq!(method.as_str(), expected);
		}
	}

	#[test]
	fn display_matches_native_name() {
		assert_eq!(BridgeMethod::GetIsInBackground.to_string(), "getIsInBackground");
		assert_eq!(
			BridgeMethod::TrackConsentWithdrawnEvent.to_string(),
			"trackConsentWithdrawnEvent"
		);
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session state getters.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::bridge::BridgeMethod;
use crate::error::{BridgeError, Result, TrackerError};
use crate::router::EventRouter;

/// A session value the native tracker can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionGetter {
	/// The anonymous user id of the current session (UUID string).
	SessionUserId,
	/// The current session id (UUID string).
	SessionId,
	/// Number of sessions so far.
	SessionIndex,
	IsInBackground,
	/// Number of background transitions in the current session.
	BackgroundIndex,
	/// Number of foreground transitions in the current session.
	ForegroundIndex,
}

impl SessionGetter {
	pub fn method(&self) -> BridgeMethod {
		match self {
			SessionGetter::SessionUserId => BridgeMethod::GetSessionUserId,
			SessionGetter::SessionId => BridgeMethod::GetSessionId,
			SessionGetter::SessionIndex => BridgeMethod::GetSessionIndex,
			SessionGetter::IsInBackground => BridgeMethod::GetIsInBackground,
			SessionGetter::BackgroundIndex => BridgeMethod::GetBackgroundIndex,
			SessionGetter::ForegroundIndex => BridgeMethod::GetForegroundIndex,
		}
	}
}

impl EventRouter {
	/// Reads a raw session value. `null` means the native side has none.
	pub async fn get_session_value(
		&self,
		namespace: Option<&str>,
		getter: SessionGetter,
	) -> Result<Value> {
		let method = getter.method();
		self.invoke(method.as_str(), method, json!({"tracker": namespace}))
			.await
	}

	/// Reads a session value and decodes it. `null` decodes to `None`.
	pub async fn get_session<T: DeserializeOwned>(
		&self,
		namespace: Option<&str>,
		getter: SessionGetter,
	) -> Result<Option<T>> {
		let value = self.get_session_value(namespace, getter).await?;
		serde_json::from_value(value).map_err(|err| TrackerError::Bridge {
			operation: getter.method().as_str(),
			source: BridgeError::new(format!("unexpected response: {err}")),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bridge::NativeBridge;
	use async_trait::async_trait;
	use std::collections::HashMap;
	use std::sync::Arc;

	struct SessionBridge {
		values: HashMap<&'static str, Value>,
	}

	#[async_trait]
	impl NativeBridge for SessionBridge {
		async fn create_tracker(&self, _config: Value) -> std::result::Result<(), BridgeError> {
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
			method: BridgeMethod,
			args: Value,
		) -> std::result::Result<Value, BridgeError> {
			assert_eq!(args, json!({"tracker": "CAT"}));
			Ok(self.values.get(method.as_str()).cloned().unwrap_or(Value::Null))
		}
	}

	fn router() -> EventRouter {
		let values = HashMap::from([
			("getSessionId", json!("5f3c2a8e-0d2b-4b8e-9a47-1c2d3e4f5a6b")),
			("getSessionIndex", json!(3)),
			("getIsInBackground", json!(false)),
			("getForegroundIndex", json!("not a number")),
		]);
		EventRouter::new(Arc::new(SessionBridge { values }))
	}

	#[tokio::test]
	async fn getters_decode_native_values() {
		let router = router();
		let id: Option<String> = router
			.get_session(Some("CAT"), SessionGetter::SessionId)
			.await
			.unwrap();
		assert_eq!(id.as_deref(), Some("5f3c2a8e-0d2b-4b8e-9a47-1c2d3e4f5a6b"));

		let index: Option<u64> = router
			.get_session(Some("CAT"), SessionGetter::SessionIndex)
			.await
			.unwrap();
		assert_eq!(index, Some(3));

		let background: Option<bool> = router
			.get_session(Some("CAT"), SessionGetter::IsInBackground)
			.await
			.unwrap();
		assert_eq!(background, Some(false));
	}

	#[tokio::test]
	async fn null_is_none() {
		let user: Option<String> = router()
			.get_session(Some("CAT"), SessionGetter::SessionUserId)
			.await
			.unwrap();
		assert_eq!(user, None);
	}

	#[tokio::test]
	async fn mistyped_response_is_a_bridge_error() {
		let err = router()
			.get_session::<u64>(Some("CAT"), SessionGetter::ForegroundIndex)
			.await
			.unwrap_err();
		assert_eq!(err.operation(), Some("getForegroundIndex"));
		assert!(err.to_string().starts_with("getForegroundIndex: unexpected response"));
	}
}

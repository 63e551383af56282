// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use apptracker::{BridgeError, BridgeMethod, ErrorHandler, NativeBridge, TrackerError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A native bridge that records every call.
///
/// Creation can be held open with a gate or made to fail. Global context
/// bundles are kept by tag so add/remove can be observed.
#[derive(Default)]
pub struct RecordingBridge {
	calls: Mutex<Vec<(BridgeMethod, Value)>>,
	created: Mutex<Vec<Value>>,
	init_gate: Option<Arc<Notify>>,
	init_failure: Option<String>,
	failing: Mutex<HashSet<BridgeMethod>>,
	responses: Mutex<HashMap<BridgeMethod, Value>>,
	global_contexts: Mutex<BTreeMap<String, Value>>,
	trackers: Mutex<HashSet<String>>,
}

impl RecordingBridge {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Creation waits until the returned gate is notified.
	pub fn gated() -> (Arc<Self>, Arc<Notify>) {
		let gate = Arc::new(Notify::new());
		let bridge = Self {
			init_gate: Some(Arc::clone(&gate)),
			..Default::default()
		};
		(Arc::new(bridge), gate)
	}

	pub fn failing_init(message: &str) -> Arc<Self> {
		Arc::new(Self {
			init_failure: Some(message.to_string()),
			..Default::default()
		})
	}

	pub fn fail(&self, method: BridgeMethod) {
		self.failing.lock().unwrap().insert(method);
	}

	pub fn respond(&self, method: BridgeMethod, value: Value) {
		self.responses.lock().unwrap().insert(method, value);
	}

	pub fn calls(&self) -> Vec<(BridgeMethod, Value)> {
		self.calls.lock().unwrap().clone()
	}

	pub fn methods(&self) -> Vec<BridgeMethod> {
		self.calls().into_iter().map(|(method, _)| method).collect()
	}

	pub fn created(&self) -> Vec<Value> {
		self.created.lock().unwrap().clone()
	}

	pub fn global_context_tags(&self) -> Vec<String> {
		self.global_contexts.lock().unwrap().keys().cloned().collect()
	}
}

#[async_trait]
impl NativeBridge for RecordingBridge {
	async fn create_tracker(&self, config: Value) -> Result<(), BridgeError> {
		if let Some(gate) = &self.init_gate {
			gate.notified().await;
		}
		if let Some(message) = &self.init_failure {
			return Err(BridgeError::new(message.clone()));
		}
		if let Some(namespace) = config["namespace"].as_str() {
			self.trackers.lock().unwrap().insert(namespace.to_string());
		}
		self.created.lock().unwrap().push(config);
		Ok(())
	}

	async fn remove_tracker(&self, namespace: &str) -> Result<bool, BridgeError> {
		Ok(self.trackers.lock().unwrap().remove(namespace))
	}

	async fn remove_all_trackers(&self) -> Result<bool, BridgeError> {
		self.trackers.lock().unwrap().clear();
		Ok(true)
	}

	async fn call(&self, method: BridgeMethod, args: Value) -> Result<Value, BridgeError> {
		if self.failing.lock().unwrap().contains(&method) {
			return Err(BridgeError::new("native failure"));
		}
		match method {
			BridgeMethod::AddGlobalContexts => {
				let bundle = args["addGlobalContext"].clone();
				if let Some(tag) = bundle["tag"].as_str() {
					self.global_contexts
						.lock()
						.unwrap()
						.insert(tag.to_string(), bundle.clone());
				}
			}
			BridgeMethod::RemoveGlobalContexts => {
				if let Some(tag) = args["removeTag"].as_str() {
					self.global_contexts.lock().unwrap().remove(tag);
				}
			}
			_ => {}
		}
		self.calls.lock().unwrap().push((method, args));
		Ok(self
			.responses
			.lock()
			.unwrap()
			.get(&method)
			.cloned()
			.unwrap_or(Value::Null))
	}
}

/// An error handler that keeps every error it receives.
#[derive(Default)]
pub struct RecordingHandler {
	errors: Mutex<Vec<TrackerError>>,
}

impl RecordingHandler {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn errors(&self) -> Vec<TrackerError> {
		self.errors.lock().unwrap().clone()
	}
}

#[async_trait]
impl ErrorHandler for RecordingHandler {
	async fn on_error(&self, error: &TrackerError) {
		self.errors.lock().unwrap().push(error.clone());
	}
}

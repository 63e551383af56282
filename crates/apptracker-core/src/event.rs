// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed event payloads.
//!
//! Each payload serializes into the JSON shape its schema expects. The SDK
//! accepts raw [`serde_json::Value`]s too; typed payloads are a convenience
//! and go through the same validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::SchemaKind;

/// A payload with a fixed event schema.
pub trait Event: Serialize {
	const SCHEMA: SchemaKind;
}

/// `[width, height]` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize(pub f64, pub f64);

/// A self-describing JSON envelope: an Iglu schema URI plus its data.
///
/// Used both as a self-describing event and as an entry in a contexts array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfDescribing {
	pub schema: String,
	pub data: Map<String, Value>,
}

impl SelfDescribing {
	/// Creates an envelope with empty data.
	pub fn new(schema: impl Into<String>) -> Self {
		Self {
			schema: schema.into(),
			data: Map::new(),
		}
	}

	/// Adds a data field (builder pattern).
	pub fn with<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.data.insert(key.into(), value.into());
		self
	}
}

impl Event for SelfDescribing {
	const SCHEMA: SchemaKind = SchemaKind::SelfDescribing;
}

/// A set of contexts attached to every event under a tag.
///
/// Tags are unique per tracker; the native layer enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalContext {
	pub tag: String,
	pub global_contexts: Vec<SelfDescribing>,
}

impl GlobalContext {
	pub fn new(tag: impl Into<String>, contexts: Vec<SelfDescribing>) -> Self {
		Self {
			tag: tag.into(),
			global_contexts: contexts,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub screen_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub previous_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub previous_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub previous_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transition_type: Option<String>,
}

impl ScreenView {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

impl Event for ScreenView {
	const SCHEMA: SchemaKind = SchemaKind::ScreenView;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structured {
	pub category: String,
	pub action: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub property: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
}

impl Structured {
	pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			category: category.into(),
			action: action.into(),
			..Default::default()
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_value(mut self, value: f64) -> Self {
		self.value = Some(value);
		self
	}
}

impl Event for Structured {
	const SCHEMA: SchemaKind = SchemaKind::Structured;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
	pub page_url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub referrer: Option<String>,
}

impl Event for PageView {
	const SCHEMA: SchemaKind = SchemaKind::PageView;
}

/// A user timing measurement, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timing {
	pub category: String,
	pub variable: String,
	pub timing: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl Event for Timing {
	const SCHEMA: SchemaKind = SchemaKind::Timing;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentGranted {
	pub expiry: String,
	pub document_id: String,
	pub version: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub document_description: Option<String>,
}

impl Event for ConsentGranted {
	const SCHEMA: SchemaKind = SchemaKind::ConsentGranted;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentWithdrawn {
	/// Whether consent is withdrawn for every document.
	pub all: bool,
	pub document_id: String,
	pub version: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub document_description: Option<String>,
}

impl Event for ConsentWithdrawn {
	const SCHEMA: SchemaKind = SchemaKind::ConsentWithdrawn;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcommerceItem {
	pub sku: String,
	pub price: f64,
	pub quantity: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
}

impl EcommerceItem {
	pub fn new(sku: impl Into<String>, price: f64, quantity: u32) -> Self {
		Self {
			sku: sku.into(),
			price,
			quantity,
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcommerceTransaction {
	pub order_id: String,
	pub total_value: f64,
	pub items: Vec<EcommerceItem>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub affiliation: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tax_value: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shipping: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
}

impl Event for EcommerceTransaction {
	const SCHEMA: SchemaKind = SchemaKind::EcommerceTransaction;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLinkReceived {
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub referrer: Option<String>,
}

impl Event for DeepLinkReceived {
	const SCHEMA: SchemaKind = SchemaKind::DeepLinkReceived;
}

/// What caused a notification to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
	Push,
	Location,
	Calendar,
	TimeInterval,
	Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttachment {
	pub identifier: String,
	#[serde(rename = "type")]
	pub attachment_type: String,
	pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageNotification {
	pub title: String,
	pub body: String,
	pub trigger: Trigger,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attachments: Option<Vec<MessageAttachment>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub body_loc_args: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub body_loc_key: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content_available: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notification_count: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notification_timestamp: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sound: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtitle: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tag: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thread_identifier: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title_loc_args: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title_loc_key: Option<String>,
}

impl MessageNotification {
	pub fn new(title: impl Into<String>, body: impl Into<String>, trigger: Trigger) -> Self {
		Self {
			title: title.into(),
			body: body.into(),
			trigger,
			action: None,
			attachments: None,
			body_loc_args: None,
			body_loc_key: None,
			category: None,
			content_available: None,
			group: None,
			icon: None,
			notification_count: None,
			notification_timestamp: None,
			sound: None,
			subtitle: None,
			tag: None,
			thread_identifier: None,
			title_loc_args: None,
			title_loc_key: None,
		}
	}
}

impl Event for MessageNotification {
	const SCHEMA: SchemaKind = SchemaKind::MessageNotification;
}

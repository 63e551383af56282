// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static schema tables for events, contexts and tracker configuration.
//!
//! Every schema is a fixed list of [`Field`]s. Validation walks that list and
//! never derives the expected shape from the keys a caller happens to send.
//!
//! Event payloads tolerate keys that are not in their table
//! ([`UnknownKeys::Allow`]) and only their required fields are enforced; the
//! optional entries record the known wire names. Configuration objects reject
//! unknown keys ([`UnknownKeys::Reject`]) and type-check every field.
//! Session and GDPR configuration mark every field as required, so a partial
//! object is rejected even when each key it does carry is allowed.

use serde::{Deserialize, Serialize};

/// Allowed values for a message notification `trigger`.
pub const TRIGGERS: &[&str] = &["push", "location", "calendar", "timeInterval", "other"];

/// Allowed values for a GDPR `basisForProcessing`.
pub const BASES: &[&str] = &[
	"consent",
	"contract",
	"legal_obligation",
	"legitimate_interests",
	"public_task",
	"vital_interests",
];

/// Allowed HTTP methods for network and remote configuration.
pub const HTTP_METHODS: &[&str] = &["post", "get"];

/// Allowed `devicePlatform` values.
pub const DEVICE_PLATFORMS: &[&str] = &["web", "mob", "pc", "srv", "app", "tv", "cnsl", "iot"];

/// Allowed `logLevel` values.
pub const LOG_LEVELS: &[&str] = &["off", "error", "debug", "verbose"];

/// Allowed emitter `bufferOption` values.
pub const BUFFER_OPTIONS: &[&str] = &["single", "default", "large", "heavy"];

/// Every schema the validator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaKind {
	SelfDescribing,
	ScreenView,
	Structured,
	PageView,
	Timing,
	ConsentGranted,
	ConsentWithdrawn,
	EcommerceTransaction,
	EcommerceItem,
	EcommerceItems,
	DeepLinkReceived,
	MessageNotification,
	MessageAttachment,
	Custom,
	Click,
	CustomTags,
	TagKeys,
	Contexts,
	GlobalContext,
	GlobalContexts,
	NetworkConfig,
	TrackerConfig,
	SessionConfig,
	EmitterConfig,
	SubjectConfig,
	GdprConfig,
	RemoteConfig,
}

impl SchemaKind {
	/// Returns the label used in error messages.
	pub fn as_str(&self) -> &'static str {
		match self {
			SchemaKind::SelfDescribing => "selfDescribing event",
			SchemaKind::ScreenView => "screenView event",
			SchemaKind::Structured => "structured event",
			SchemaKind::PageView => "pageView event",
			SchemaKind::Timing => "timing event",
			SchemaKind::ConsentGranted => "consentGranted event",
			SchemaKind::ConsentWithdrawn => "consentWithdrawn event",
			SchemaKind::EcommerceTransaction => "ecommerceTransaction event",
			SchemaKind::EcommerceItem => "ecommerce item",
			SchemaKind::EcommerceItems => "ecommerce items",
			SchemaKind::DeepLinkReceived => "deepLinkReceived event",
			SchemaKind::MessageNotification => "messageNotification event",
			SchemaKind::MessageAttachment => "notification attachment",
			SchemaKind::Custom => "custom event",
			SchemaKind::Click => "click event",
			SchemaKind::CustomTags => "custom tags",
			SchemaKind::TagKeys => "custom tag keys",
			SchemaKind::Contexts => "contexts",
			SchemaKind::GlobalContext => "global context",
			SchemaKind::GlobalContexts => "global contexts",
			SchemaKind::NetworkConfig => "networkConfig",
			SchemaKind::TrackerConfig => "trackerConfig",
			SchemaKind::SessionConfig => "sessionConfig",
			SchemaKind::EmitterConfig => "emitterConfig",
			SchemaKind::SubjectConfig => "subjectConfig",
			SchemaKind::GdprConfig => "gdprConfig",
			SchemaKind::RemoteConfig => "remoteConfig",
		}
	}

	/// Returns the static shape for this schema.
	pub fn shape(&self) -> &'static Shape {
		match self {
			SchemaKind::SelfDescribing => &SELF_DESCRIBING,
			SchemaKind::ScreenView => &SCREEN_VIEW,
			SchemaKind::Structured => &STRUCTURED,
			SchemaKind::PageView => &PAGE_VIEW,
			SchemaKind::Timing => &TIMING,
			SchemaKind::ConsentGranted => &CONSENT_GRANTED,
			SchemaKind::ConsentWithdrawn => &CONSENT_WITHDRAWN,
			SchemaKind::EcommerceTransaction => &ECOMMERCE_TRANSACTION,
			SchemaKind::EcommerceItem => &ECOMMERCE_ITEM,
			SchemaKind::EcommerceItems => &ECOMMERCE_ITEMS,
			SchemaKind::DeepLinkReceived => &DEEP_LINK_RECEIVED,
			SchemaKind::MessageNotification => &MESSAGE_NOTIFICATION,
			SchemaKind::MessageAttachment => &MESSAGE_ATTACHMENT,
			SchemaKind::Custom | SchemaKind::Click | SchemaKind::CustomTags => &ANY_OBJECT,
			SchemaKind::TagKeys => &TAG_KEYS,
			SchemaKind::Contexts => &CONTEXTS,
			SchemaKind::GlobalContext => &GLOBAL_CONTEXT,
			SchemaKind::GlobalContexts => &GLOBAL_CONTEXTS,
			SchemaKind::NetworkConfig => &NETWORK_CONFIG,
			SchemaKind::TrackerConfig => &TRACKER_CONFIG,
			SchemaKind::SessionConfig => &SESSION_CONFIG,
			SchemaKind::EmitterConfig => &EMITTER_CONFIG,
			SchemaKind::SubjectConfig => &SUBJECT_CONFIG,
			SchemaKind::GdprConfig => &GDPR_CONFIG,
			SchemaKind::RemoteConfig => &REMOTE_CONFIG,
		}
	}

	/// Returns the fields declared for an object schema, or an empty slice for
	/// array schemas.
	pub fn fields(&self) -> &'static [Field] {
		match self.shape() {
			Shape::Object { fields, .. } => fields,
			Shape::List(_) => &[],
		}
	}

	/// Returns the names of the required fields.
	pub fn required_fields(&self) -> impl Iterator<Item = &'static str> {
		self.fields().iter().filter(|f| f.required).map(|f| f.name)
	}
}

impl std::fmt::Display for SchemaKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// The expected kind of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	String,
	/// A string with at least one character.
	NonEmptyString,
	/// A finite number.
	Number,
	Boolean,
	/// Any JSON object.
	Object,
	/// A string drawn from a closed set.
	OneOf(&'static [&'static str]),
	/// `[width, height]` of finite numbers, or `null`.
	ScreenSize,
	/// The inner kind, or `null`.
	Nullable(&'static FieldKind),
	/// An array whose elements all match the inner kind.
	ListOf(&'static FieldKind),
	/// A value matching another schema.
	Schema(SchemaKind),
}

/// One entry in an object schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
	pub name: &'static str,
	pub kind: FieldKind,
	pub required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> Field {
	Field {
		name,
		kind,
		required: true,
	}
}

const fn optional(name: &'static str, kind: FieldKind) -> Field {
	Field {
		name,
		kind,
		required: false,
	}
}

/// Whether an object schema accepts keys outside its field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
	Allow,
	Reject,
}

/// The top-level shape of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
	Object {
		fields: &'static [Field],
		unknown_keys: UnknownKeys,
	},
	List(FieldKind),
}

use FieldKind::{Boolean, NonEmptyString, Number, Object, OneOf, ScreenSize};

const STR: FieldKind = FieldKind::String;
const NULLABLE_STR: FieldKind = FieldKind::Nullable(&FieldKind::String);
const NULLABLE_NUMBER: FieldKind = FieldKind::Nullable(&FieldKind::Number);
const STRINGS: FieldKind = FieldKind::ListOf(&FieldKind::String);

static SELF_DESCRIBING: Shape = Shape::Object {
	fields: &[
		required("schema", NonEmptyString),
		required("data", Object),
	],
	unknown_keys: UnknownKeys::Allow,
};

static SCREEN_VIEW: Shape = Shape::Object {
	fields: &[
		required("name", STR),
		optional("id", STR),
		optional("type", STR),
		optional("previousName", STR),
		optional("previousId", STR),
		optional("previousType", STR),
		optional("transitionType", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static STRUCTURED: Shape = Shape::Object {
	fields: &[
		required("category", STR),
		required("action", STR),
		optional("label", STR),
		optional("property", STR),
		optional("value", Number),
	],
	unknown_keys: UnknownKeys::Allow,
};

static PAGE_VIEW: Shape = Shape::Object {
	fields: &[
		required("pageUrl", STR),
		optional("pageTitle", STR),
		optional("referrer", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static TIMING: Shape = Shape::Object {
	fields: &[
		required("category", STR),
		required("variable", STR),
		required("timing", Number),
		optional("label", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static CONSENT_GRANTED: Shape = Shape::Object {
	fields: &[
		required("expiry", STR),
		required("documentId", STR),
		required("version", STR),
		optional("name", STR),
		optional("documentDescription", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static CONSENT_WITHDRAWN: Shape = Shape::Object {
	fields: &[
		required("all", Boolean),
		required("documentId", STR),
		required("version", STR),
		optional("name", STR),
		optional("documentDescription", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static ECOMMERCE_TRANSACTION: Shape = Shape::Object {
	fields: &[
		required("orderId", STR),
		required("totalValue", Number),
		required("items", FieldKind::Schema(SchemaKind::EcommerceItems)),
		optional("affiliation", STR),
		optional("taxValue", Number),
		optional("shipping", Number),
		optional("city", STR),
		optional("state", STR),
		optional("country", STR),
		optional("currency", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static ECOMMERCE_ITEM: Shape = Shape::Object {
	fields: &[
		required("sku", STR),
		required("price", Number),
		required("quantity", Number),
		optional("name", STR),
		optional("category", STR),
		optional("currency", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static ECOMMERCE_ITEMS: Shape = Shape::List(FieldKind::Schema(SchemaKind::EcommerceItem));

static DEEP_LINK_RECEIVED: Shape = Shape::Object {
	fields: &[
		required("url", STR),
		optional("referrer", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static MESSAGE_NOTIFICATION: Shape = Shape::Object {
	fields: &[
		required("title", STR),
		required("body", STR),
		required("trigger", OneOf(TRIGGERS)),
		optional("action", STR),
		optional(
			"attachments",
			FieldKind::ListOf(&FieldKind::Schema(SchemaKind::MessageAttachment)),
		),
		optional("bodyLocArgs", STRINGS),
		optional("bodyLocKey", STR),
		optional("category", STR),
		optional("contentAvailable", Boolean),
		optional("group", STR),
		optional("icon", STR),
		optional("notificationCount", Number),
		optional("notificationTimestamp", STR),
		optional("sound", STR),
		optional("subtitle", STR),
		optional("tag", STR),
		optional("threadIdentifier", STR),
		optional("titleLocArgs", STRINGS),
		optional("titleLocKey", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static MESSAGE_ATTACHMENT: Shape = Shape::Object {
	fields: &[
		required("identifier", STR),
		required("type", STR),
		required("url", STR),
	],
	unknown_keys: UnknownKeys::Allow,
};

static ANY_OBJECT: Shape = Shape::Object {
	fields: &[],
	unknown_keys: UnknownKeys::Allow,
};

static TAG_KEYS: Shape = Shape::List(STR);

static CONTEXTS: Shape = Shape::List(FieldKind::Schema(SchemaKind::SelfDescribing));

static GLOBAL_CONTEXT: Shape = Shape::Object {
	fields: &[
		required("tag", STR),
		required("globalContexts", FieldKind::Schema(SchemaKind::Contexts)),
	],
	unknown_keys: UnknownKeys::Reject,
};

static GLOBAL_CONTEXTS: Shape = Shape::List(FieldKind::Schema(SchemaKind::GlobalContext));

static NETWORK_CONFIG: Shape = Shape::Object {
	fields: &[
		required("endpoint", NonEmptyString),
		optional("method", OneOf(HTTP_METHODS)),
		optional("customPostPath", STR),
		optional("requestHeaders", Object),
	],
	unknown_keys: UnknownKeys::Reject,
};

static TRACKER_CONFIG: Shape = Shape::Object {
	fields: &[
		optional("devicePlatform", OneOf(DEVICE_PLATFORMS)),
		optional("base64Encoding", Boolean),
		optional("logLevel", OneOf(LOG_LEVELS)),
		optional("applicationContext", Boolean),
		optional("platformContext", Boolean),
		optional("geoLocationContext", Boolean),
		optional("sessionContext", Boolean),
		optional("deepLinkContext", Boolean),
		optional("screenContext", Boolean),
		optional("screenViewAutotracking", Boolean),
		optional("lifecycleAutotracking", Boolean),
		optional("installAutotracking", Boolean),
		optional("exceptionAutotracking", Boolean),
		optional("diagnosticAutotracking", Boolean),
		optional("userAnonymisation", Boolean),
		optional("bundleInfoAutotracking", Boolean),
		optional("enablePeriodicHeartbeat", Boolean),
		optional("periodicHeartbeatIntervalInSec", Number),
		optional("periodicHeartbeatDelayInSec", Number),
		optional("userClickAutotracking", Boolean),
		optional("deepLinkAutotracking", Boolean),
	],
	unknown_keys: UnknownKeys::Reject,
};

static SESSION_CONFIG: Shape = Shape::Object {
	fields: &[
		required("foregroundTimeout", Number),
		required("backgroundTimeout", Number),
	],
	unknown_keys: UnknownKeys::Reject,
};

static EMITTER_CONFIG: Shape = Shape::Object {
	fields: &[
		optional("bufferOption", OneOf(BUFFER_OPTIONS)),
		optional("emitRange", Number),
		optional("threadPoolSize", Number),
		optional("byteLimitPost", Number),
		optional("byteLimitGet", Number),
		optional("serverAnonymisation", Boolean),
		optional("disableEventCaching", Boolean),
	],
	unknown_keys: UnknownKeys::Reject,
};

static SUBJECT_CONFIG: Shape = Shape::Object {
	fields: &[
		optional("userId", NULLABLE_STR),
		optional("networkUserId", NULLABLE_STR),
		optional("domainUserId", NULLABLE_STR),
		optional("useragent", NULLABLE_STR),
		optional("ipAddress", NULLABLE_STR),
		optional("timezone", NULLABLE_STR),
		optional("language", NULLABLE_STR),
		optional("screenResolution", ScreenSize),
		optional("screenViewport", ScreenSize),
		optional("colorDepth", NULLABLE_NUMBER),
	],
	unknown_keys: UnknownKeys::Reject,
};

static GDPR_CONFIG: Shape = Shape::Object {
	fields: &[
		required("basisForProcessing", OneOf(BASES)),
		required("documentId", STR),
		required("documentVersion", STR),
		required("documentDescription", STR),
	],
	unknown_keys: UnknownKeys::Reject,
};

static REMOTE_CONFIG: Shape = Shape::Object {
	fields: &[
		required("endpoint", NonEmptyString),
		optional("method", OneOf(HTTP_METHODS)),
	],
	unknown_keys: UnknownKeys::Reject,
};

/// A settable attribute of the tracker subject.
///
/// Each attribute maps to one subject-config key and one setter on the
/// native bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectAttribute {
	UserId,
	NetworkUserId,
	DomainUserId,
	IpAddress,
	Useragent,
	Timezone,
	Language,
	ScreenResolution,
	ScreenViewport,
	ColorDepth,
}

impl SubjectAttribute {
	pub const ALL: [SubjectAttribute; 10] = [
		SubjectAttribute::UserId,
		SubjectAttribute::NetworkUserId,
		SubjectAttribute::DomainUserId,
		SubjectAttribute::IpAddress,
		SubjectAttribute::Useragent,
		SubjectAttribute::Timezone,
		SubjectAttribute::Language,
		SubjectAttribute::ScreenResolution,
		SubjectAttribute::ScreenViewport,
		SubjectAttribute::ColorDepth,
	];

	/// Returns the subject-config key, which is also the argument name the
	/// native setter expects.
	pub fn key(&self) -> &'static str {
		match self {
			SubjectAttribute::UserId => "userId",
			SubjectAttribute::NetworkUserId => "networkUserId",
			SubjectAttribute::DomainUserId => "domainUserId",
			SubjectAttribute::IpAddress => "ipAddress",
			SubjectAttribute::Useragent => "useragent",
			SubjectAttribute::Timezone => "timezone",
			SubjectAttribute::Language => "language",
			SubjectAttribute::ScreenResolution => "screenResolution",
			SubjectAttribute::ScreenViewport => "screenViewport",
			SubjectAttribute::ColorDepth => "colorDepth",
		}
	}

	/// Looks an attribute up by its subject-config key.
	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|a| a.key() == key)
	}

	/// Returns the accepted value kind, taken from the subject-config table.
	pub fn kind(&self) -> FieldKind {
		let key = self.key();
		SchemaKind::SubjectConfig
			.fields()
			.iter()
			.find(|f| f.name == key)
			.map(|f| f.kind)
			.unwrap_or(NULLABLE_STR)
	}

	/// Describes the accepted values, for error messages.
	pub fn expectation(&self) -> &'static str {
		match self {
			SubjectAttribute::NetworkUserId | SubjectAttribute::DomainUserId => {
				"a string (UUID) or null"
			}
			SubjectAttribute::ScreenResolution | SubjectAttribute::ScreenViewport => {
				"of ScreenSize type or null"
			}
			SubjectAttribute::ColorDepth => "a number (integer) or null",
			_ => "a string or null",
		}
	}
}

impl std::fmt::Display for SubjectAttribute {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.key())
	}
}

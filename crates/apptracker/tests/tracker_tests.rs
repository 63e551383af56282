// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tests of the tracker façade against a recording bridge.

mod common;

use std::time::Duration;

use apptracker::{
	remove_all_trackers, remove_tracker, BridgeMethod, ConfigError, DispatchOptions,
	EcommerceItem, EcommerceTransaction, ErrorPolicy, GlobalContext,
	MessageNotification, Readiness, ScreenSize, ScreenView, SelfDescribing, SubjectAttribute,
	Tracker, TrackerError, Trigger, WebViewHandler,
};
use common::{RecordingBridge, RecordingHandler};
use serde_json::{json, Value};

fn init() -> Value {
	json!({"customerKey": "ck-test", "appName": "shop"})
}

const PROPAGATE: DispatchOptions = DispatchOptions {
	method_policy: ErrorPolicy::Propagate,
	getter_policy: ErrorPolicy::Propagate,
};

async fn ready_tracker(bridge: &std::sync::Arc<RecordingBridge>, options: DispatchOptions) -> Tracker {
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.dispatch_options(options)
		.build()
		.unwrap();
	tracker.ready().await.unwrap();
	tracker
}

#[tokio::test]
async fn calls_made_during_creation_run_after_it_completes() {
	let (bridge, gate) = RecordingBridge::gated();
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.build()
		.unwrap();

	let pending = {
		let tracker = tracker.clone();
		tokio::spawn(async move {
			tracker
				.track_screen_view_event(json!({"name": "Home"}), None)
				.await
		})
	};

	tokio::time::sleep(Duration::from_millis(20)).await;
	assert_eq!(tracker.readiness(), Readiness::Initializing);
	assert!(bridge.calls().is_empty());

	gate.notify_one();
	assert_eq!(pending.await.unwrap(), Ok(()));
	assert_eq!(tracker.readiness(), Readiness::Ready);
	assert_eq!(
		bridge.calls(),
		vec![(
			BridgeMethod::TrackScreenViewEvent,
			json!({"tracker": "CAT", "eventData": {"name": "Home"}, "contexts": []})
		)]
	);
}

#[tokio::test]
async fn failed_creation_skips_the_call_and_notifies_once() {
	let bridge = RecordingBridge::failing_init("no native module");
	let handler = RecordingHandler::new();
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.shared_error_handler(handler.clone())
		.build()
		.unwrap();

	let result = tracker
		.track_structured_event(json!({"category": "shop", "action": "add"}), None)
		.await;

	assert_eq!(result, Ok(()));
	assert!(bridge.calls().is_empty());
	assert_eq!(
		handler.errors(),
		vec![TrackerError::InitFailed(
			"createTracker: no native module".to_string()
		)]
	);
	assert!(matches!(tracker.readiness(), Readiness::Failed(_)));
}

#[tokio::test]
async fn propagate_returns_failures_to_the_caller() {
	let bridge = RecordingBridge::failing_init("no native module");
	let handler = RecordingHandler::new();
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.shared_error_handler(handler.clone())
		.dispatch_options(PROPAGATE)
		.build()
		.unwrap();

	let err = tracker.track_click_event(json!({})).await.unwrap_err();
	assert_eq!(
		err.to_string(),
		"tracker initialization failed: createTracker: no native module"
	);
	assert!(handler.errors().is_empty());
}

#[tokio::test]
async fn invalid_init_configurations_are_rejected_at_build() {
	let bridge = RecordingBridge::new();
	let cases = [
		json!({"customerKey": "ck", "appName": "shop", "sessionConfig": {"foregroundTimeout": 100}}),
		json!({"customerKey": "ck", "appName": "shop", "networkConfig": {"endpoint": "x", "unknownKey": 1}}),
		json!({"customerKey": "ck", "appName": "shop", "gdprConfig": null}),
		json!({"appName": "shop"}),
	];

	for config in cases {
		let result = Tracker::builder(bridge.clone()).raw_config(config).build();
		assert!(matches!(result, Err(TrackerError::Config(_))));
	}

	let result = Tracker::builder(bridge.clone())
		.raw_config(json!({"customerKey": "ck"}))
		.build();
	assert!(matches!(
		result,
		Err(TrackerError::Config(ConfigError::MissingAppName))
	));

	tokio::task::yield_now().await;
	assert!(bridge.created().is_empty());
}

#[tokio::test]
async fn namespace_is_passed_to_creation_and_every_call() {
	let bridge = RecordingBridge::new();
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.namespace("web")
		.build()
		.unwrap();
	tracker.ready().await.unwrap();
	tracker.set_user_id(Some("u-1")).await.unwrap();

	assert_eq!(bridge.created()[0]["namespace"], json!("web"));
	assert_eq!(bridge.calls()[0].1["tracker"], json!("web"));
}

#[tokio::test]
async fn screen_view_requires_a_name() {
	let bridge = RecordingBridge::new();
	let tracker = ready_tracker(&bridge, PROPAGATE).await;

	tracker
		.track_screen_view_event(json!({"name": "Home"}), None)
		.await
		.unwrap();
	let err = tracker
		.track_screen_view_event(json!({}), None)
		.await
		.unwrap_err();

	assert!(err.to_string().contains("`name`"));
	assert_eq!(err.operation(), Some("trackScreenViewEvent"));
	assert_eq!(bridge.calls().len(), 1);
}

#[tokio::test]
async fn ecommerce_items_are_checked_individually() {
	let bridge = RecordingBridge::new();
	let tracker = ready_tracker(&bridge, PROPAGATE).await;

	let transaction = EcommerceTransaction {
		order_id: "o-1".to_string(),
		total_value: 19.98,
		items: vec![EcommerceItem::new("sku-1", 9.99, 2)],
		..Default::default()
	};
	tracker.track(&transaction, &[]).await.unwrap();

	let err = tracker
		.track_ecommerce_transaction_event(
			json!({
				"orderId": "o-2",
				"totalValue": 9.99,
				"items": [{"sku": "sku-1", "price": 9.99, "quantity": "2"}],
			}),
			None,
		)
		.await
		.unwrap_err();
	assert!(err.to_string().contains("items[0].quantity"));
	assert_eq!(
		bridge.methods(),
		vec![BridgeMethod::TrackEcommerceTransactionEvent]
	);
}

#[tokio::test]
async fn message_notification_trigger_must_be_known() {
	let bridge = RecordingBridge::new();
	let tracker = ready_tracker(&bridge, PROPAGATE).await;

	let err = tracker
		.track_message_notification_event(
			json!({"title": "Sale", "body": "Now on", "trigger": "invalid"}),
			None,
		)
		.await
		.unwrap_err();
	assert_eq!(err.operation(), Some("trackMessageNotificationEvent"));

	tracker
		.track(&MessageNotification::new("Sale", "Now on", Trigger::Push), &[])
		.await
		.unwrap();
	assert_eq!(bridge.calls()[0].1["eventData"]["trigger"], json!("push"));
}

#[tokio::test]
async fn typed_events_carry_their_contexts() {
	let bridge = RecordingBridge::new();
	let tracker = ready_tracker(&bridge, PROPAGATE).await;
	let context = SelfDescribing::new("iglu:com.example/screen/jsonschema/1-0-0").with("dark", true);

	tracker
		.track(&ScreenView::new("Home"), &[context])
		.await
		.unwrap();

	let calls = bridge.calls();
	assert_eq!(
		calls[0].1["contexts"],
		json!([{"schema": "iglu:com.example/screen/jsonschema/1-0-0", "data": {"dark": true}}])
	);
}

#[tokio::test]
async fn invalid_contexts_are_swallowed_by_default() {
	let bridge = RecordingBridge::new();
	let handler = RecordingHandler::new();
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.shared_error_handler(handler.clone())
		.build()
		.unwrap();

	let result = tracker
		.track_page_view(json!({"pageUrl": "https://a.test"}), Some(json!([{"data": {}}])))
		.await;

	assert_eq!(result, Ok(()));
	assert!(bridge.calls().is_empty());
	let errors = handler.errors();
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].operation(), Some("trackPageView"));
}

#[tokio::test]
async fn global_contexts_round_trip_by_tag() {
	let bridge = RecordingBridge::new();
	let tracker = ready_tracker(&bridge, PROPAGATE).await;
	let bundle = GlobalContext::new(
		"app",
		vec![SelfDescribing::new("iglu:com.example/app/jsonschema/1-0-0").with("build", 42)],
	);

	tracker
		.add_global_contexts(serde_json::to_value(&bundle).unwrap())
		.await
		.unwrap();
	assert_eq!(bridge.global_context_tags(), vec!["app".to_string()]);

	tracker.remove_global_contexts("app").await.unwrap();
	assert!(bridge.global_context_tags().is_empty());
	assert_eq!(
		bridge.methods(),
		vec![
			BridgeMethod::AddGlobalContexts,
			BridgeMethod::RemoveGlobalContexts
		]
	);
}

#[tokio::test]
async fn custom_tags_use_the_category_method_when_given() {
	let bridge = RecordingBridge::new();
	let tracker = ready_tracker(&bridge, PROPAGATE).await;

	tracker
		.set_custom_tags(json!({"plan": "pro"}), None)
		.await
		.unwrap();
	tracker
		.set_custom_tags_with_category("account", json!({"tier": 2}), None)
		.await
		.unwrap();
	tracker
		.clear_custom_tags(json!(["plan"]), None)
		.await
		.unwrap();
	tracker.clear_all_custom_tags(None).await.unwrap();

	let err = tracker
		.clear_custom_tags(json!(["plan", 3]), None)
		.await
		.unwrap_err();
	assert_eq!(err.operation(), Some("clearCustomTags"));

	assert_eq!(
		bridge.methods(),
		vec![
			BridgeMethod::SetCustomTags,
			BridgeMethod::SetCustomTagsWithCategory,
			BridgeMethod::ClearCustomTags,
			BridgeMethod::ClearAllCustomTags,
		]
	);
	assert_eq!(bridge.calls()[1].1["category"], json!("account"));
}

#[tokio::test]
async fn subject_setters_forward_typed_values() {
	let bridge = RecordingBridge::new();
	let tracker = ready_tracker(&bridge, PROPAGATE).await;

	tracker
		.set_screen_resolution(Some(ScreenSize(1080.0, 1920.0)))
		.await
		.unwrap();
	tracker.set_color_depth(None).await.unwrap();
	let err = tracker
		.set_subject_attribute(SubjectAttribute::Language, json!(7))
		.await
		.unwrap_err();
	assert_eq!(err.to_string(), "setLanguage: language can only be a string or null");

	let calls = bridge.calls();
	assert_eq!(
		calls[0].1,
		json!({"tracker": "CAT", "screenResolution": [1080.0, 1920.0]})
	);
	assert_eq!(calls[1].1, json!({"tracker": "CAT", "colorDepth": null}));
}

#[tokio::test]
async fn subject_data_joins_setter_failures() {
	let bridge = RecordingBridge::new();
	bridge.fail(BridgeMethod::SetTimezone);
	let tracker = ready_tracker(&bridge, PROPAGATE).await;

	let err = tracker
		.set_subject_data(json!({"userId": "u-1", "timezone": "UTC"}))
		.await
		.unwrap_err();

	assert_eq!(err.to_string(), "setSubjectData:setTimezone: native failure");
	assert_eq!(bridge.methods(), vec![BridgeMethod::SetUserId]);
}

#[tokio::test]
async fn getters_decode_native_values() {
	let bridge = RecordingBridge::new();
	bridge.respond(BridgeMethod::GetSessionIndex, json!(4));
	bridge.respond(BridgeMethod::GetIsInBackground, json!(true));
	let tracker = ready_tracker(&bridge, PROPAGATE).await;

	assert_eq!(tracker.get_session_index().await, Ok(Some(4)));
	assert_eq!(tracker.get_is_in_background().await, Ok(Some(true)));
	assert_eq!(tracker.get_session_id().await, Ok(None));
}

#[tokio::test]
async fn swallowed_getter_failures_resolve_to_none() {
	let bridge = RecordingBridge::new();
	bridge.fail(BridgeMethod::GetSessionUserId);
	let handler = RecordingHandler::new();
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.shared_error_handler(handler.clone())
		.build()
		.unwrap();

	assert_eq!(tracker.get_session_user_id().await, Ok(None));
	assert_eq!(handler.errors().len(), 1);
	assert_eq!(handler.errors()[0].operation(), Some("getSessionUserId"));
}

#[tokio::test]
async fn propagated_getter_failures_reach_the_caller() {
	let bridge = RecordingBridge::new();
	bridge.fail(BridgeMethod::GetForegroundIndex);
	let handler = RecordingHandler::new();
	let tracker = Tracker::builder(bridge.clone())
		.raw_config(init())
		.shared_error_handler(handler.clone())
		.dispatch_options(DispatchOptions {
			method_policy: ErrorPolicy::Swallow,
			getter_policy: ErrorPolicy::Propagate,
		})
		.build()
		.unwrap();

	let err = tracker.get_foreground_index().await.unwrap_err();
	assert_eq!(err.to_string(), "getForegroundIndex: native failure");
	assert!(handler.errors().is_empty());
}

#[tokio::test]
async fn web_view_messages_share_the_router() {
	let bridge = RecordingBridge::new();
	let handler = RecordingHandler::new();
	let webview = WebViewHandler::new(bridge.clone(), handler.clone());

	webview
		.handle(r#"{"command":"trackPageView","trackers":["CAT"],"event":{"url":"https://a.test","title":"A"}}"#)
		.await;
	webview
		.handle(r#"{"command":"trackSelfDescribingEvent","event":{"schema":"","data":{}}}"#)
		.await;

	assert_eq!(
		bridge.calls(),
		vec![(
			BridgeMethod::TrackPageView,
			json!({
				"tracker": "CAT",
				"eventData": {"pageUrl": "https://a.test", "pageTitle": "A"},
				"contexts": [],
			})
		)]
	);
	let errors = handler.errors();
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].operation(), Some("trackSelfDescribingEvent"));
}

#[tokio::test]
async fn trackers_can_be_removed() {
	let bridge = RecordingBridge::new();
	let _tracker = ready_tracker(&bridge, PROPAGATE).await;

	assert_eq!(remove_tracker(bridge.as_ref(), "CAT").await, Ok(true));
	assert_eq!(remove_tracker(bridge.as_ref(), "CAT").await, Ok(false));
	assert_eq!(remove_all_trackers(bridge.as_ref()).await, Ok(true));
}

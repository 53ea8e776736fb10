use std::{env, sync::Arc};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use sr_api::{routes, state::AppState};
use sr_config::{Config, Engine, Search, Service, SyncSource};
use sr_service::ScholarService;
use sr_store::JsonlRecordStore;
use sr_testkit::MemoryEngine;

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		engine: Engine {
			url: "http://localhost:9200".to_string(),
			username: None,
			password: None,
			timeout_ms: 1_000,
			max_sessions: 2,
			accept_invalid_certs: false,
		},
		search: Search {
			default_size: 10,
			max_size: 20,
			deadline_oversample: 5,
			recommend_collection: "scholarships".to_string(),
			keyword_fuzziness: "AUTO".to_string(),
		},
		sync: SyncSource {
			source_dir: env::temp_dir().join("sr_api_test_missing_exports"),
			batch_size: 100,
			collections: vec!["scholarships".to_string()],
		},
	}
}

fn test_state(engine: Arc<MemoryEngine>) -> AppState {
	let config = test_config();
	let store = JsonlRecordStore::new(config.sync.source_dir.clone());

	AppState::with_service(ScholarService::new(config, engine, Arc::new(store)))
}

fn seeded_engine() -> Arc<MemoryEngine> {
	let engine = Arc::new(MemoryEngine::new());

	engine.insert(
		"scholarships",
		"chevening",
		serde_json::json!({
			"Scholarship_Name": "Chevening Scholarship",
			"Country": "UK",
			"End_Date": "2030-11-05",
			"Funding_Level": "Full",
		}),
	);
	engine.insert(
		"scholarships",
		"eiffel",
		serde_json::json!({
			"Scholarship_Name": "Eiffel Excellence",
			"Country": "France",
			"End_Date": "2030-01-10",
		}),
	);

	engine
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri(uri)
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call route.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: Value = serde_json::from_slice(&body).expect("Failed to parse response.");

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let app = routes::router(test_state(seeded_engine()));
	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn keyword_search_returns_summaries() {
	let app = routes::router(test_state(seeded_engine()));
	let (status, json) = post_json(
		app,
		"/v1/search",
		serde_json::json!({ "collection": "scholarships", "q": "chevening" }),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["total"], 1);
	assert_eq!(json["items"][0]["id"], "chevening");
	assert_eq!(json["items"][0]["summary"]["name"], "Chevening Scholarship");
	assert_eq!(json["has_next"], false);
}

#[tokio::test]
async fn filter_search_accepts_operators() {
	let app = routes::router(test_state(seeded_engine()));
	let (status, json) = post_json(
		app,
		"/v1/search",
		serde_json::json!({
			"collection": "scholarships",
			"filters": [
				{ "field": "Country", "string_values": ["UK"] },
				{ "field": "End_Date", "min": "2030-06-01" }
			],
			"inter_field_operator": "AND"
		}),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["total"], 1);
	assert_eq!(json["items"][0]["id"], "chevening");
}

#[tokio::test]
async fn unknown_filter_field_is_bad_request() {
	let engine = seeded_engine();
	let app = routes::router(test_state(engine.clone()));
	let (status, json) = post_json(
		app,
		"/v1/search",
		serde_json::json!({
			"collection": "scholarships",
			"filters": [{ "field": "Password", "string_values": ["x"] }]
		}),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
	assert_eq!(json["fields"][0], "$.filters[0].field");
	assert_eq!(engine.execute_calls(), 0);
}

#[tokio::test]
async fn engine_failure_is_service_unavailable() {
	let engine = seeded_engine();

	engine.set_fail_execute(true);

	let app = routes::router(test_state(engine));
	let (status, json) = post_json(
		app,
		"/v1/search",
		serde_json::json!({ "collection": "scholarships", "q": "scholarship" }),
	)
	.await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(json["error_code"], "engine_unavailable");
}

#[tokio::test]
async fn recommend_returns_explanations() {
	let app = routes::router(test_state(seeded_engine()));
	let (status, json) = post_json(
		app,
		"/v1/recommend",
		serde_json::json!({
			"profile": {
				"desired_countries": ["UK"],
				"deadline_after": "2030-06-01"
			}
		}),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["items"][0]["id"], "chevening");
	assert_eq!(
		json["items"][0]["matched_fields"],
		serde_json::json!(["country_match:UK", "deadline_in_window:2030-11-05"])
	);
}

#[tokio::test]
async fn malformed_profile_date_is_bad_request() {
	let app = routes::router(test_state(seeded_engine()));
	let (status, json) = post_json(
		app,
		"/v1/recommend",
		serde_json::json!({ "profile": { "deadline_before": "next week" } }),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["fields"][0], "$.profile.deadline_before");
}

#[tokio::test]
async fn admin_sync_of_missing_export_is_store_error() {
	let app = routes::admin_router(test_state(seeded_engine()));
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/admin/sync?collection=scholarships")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call sync.");

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

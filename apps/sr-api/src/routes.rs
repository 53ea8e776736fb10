use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use sr_service::{
	Error, MatchResponse, RecommendRequest, SearchRequest, SearchResponse, SyncReport,
};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SyncQuery {
	collection: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::InvalidField { field, message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, Some(vec![field])),
			Error::EngineUnavailable { message } => {
				tracing::error!(error = %message, "Search engine unavailable.");

				json_error(
					StatusCode::SERVICE_UNAVAILABLE,
					"engine_unavailable",
					"Search engine is unavailable.",
					None,
				)
			},
			Error::Store { message } => {
				tracing::error!(error = %message, "Record store failure.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message, None)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/recommend", post(recommend))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/sync", post(sync_collection)).with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn recommend(
	State(state): State<AppState>,
	Json(payload): Json<RecommendRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
	let response = state.service.recommend(payload).await?;

	Ok(Json(response))
}

async fn sync_collection(
	State(state): State<AppState>,
	Query(query): Query<SyncQuery>,
) -> Result<Json<SyncReport>, ApiError> {
	let report = state.service.sync_collection(&query.collection).await?;

	Ok(Json(report))
}

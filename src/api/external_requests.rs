//! External requests endpoint for Sentry App installations.
//!
//! Proxies select-option lookups (e.g. populating a dropdown in the issue
//! linking UI) to the third-party app backing an installation.

use crate::requester::SelectOptionsRequest;
use crate::types::{AppInstallation, ProjectId};
use crate::AppState;
use axum::extract::{FromRef, FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::Query;
use serde::Deserialize;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Feature flag gating the whole Sentry App surface for an organization.
const SENTRY_APPS_FEATURE: &str = "organizations:sentry-apps";

/// Fixed client-facing error body. Mediator failure details stay in the
/// logs and are never surfaced to the caller.
const SERVICE_ERROR: &str = "Error communicating with Sentry App service";

pub fn routes() -> Router<AppState> {
	Router::new().route(
		"/api/0/sentry-app-installations/{uuid}/external-requests/",
		get(external_requests),
	)
}

/// Resolves the Sentry App installation addressed by the request path.
///
/// An unknown installation is indistinguishable from an unknown route.
pub struct Installation(pub AppInstallation);

impl<S> FromRequestParts<S> for Installation
where
	AppState: FromRef<S>,
	S: Send + Sync,
{
	type Rejection = StatusCode;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		#[derive(Deserialize)]
		struct InstallationPath {
			uuid: Uuid,
		}

		let Path(InstallationPath { uuid }) = Path::from_request_parts(parts, state)
			.await
			.map_err(|_| StatusCode::NOT_FOUND)?;

		let state = AppState::from_ref(state);
		state
			.directory
			.installation(&uuid)
			.cloned()
			.map(Self)
			.ok_or(StatusCode::NOT_FOUND)
	}
}

#[derive(Debug, Deserialize)]
struct ExternalRequestParams {
	/// Kept as a string: a non-numeric value simply resolves to no project,
	/// matching the "no scoping" path rather than a client error.
	#[serde(rename = "projectId")]
	project_id: Option<String>,
	uri: String,
	query: Option<String>,
}

#[instrument(skip_all, fields(installation.uuid = %installation.uuid))]
async fn external_requests(
	State(state): State<AppState>,
	Installation(installation): Installation,
	Query(params): Query<ExternalRequestParams>,
) -> Response {
	let feature_enabled = state
		.directory
		.organization(installation.organization_id)
		.is_some_and(|organization| organization.has_feature(SENTRY_APPS_FEATURE));
	// 404 rather than 403: the endpoint's existence is hidden from
	// organizations without the feature.
	if !feature_enabled {
		return StatusCode::NOT_FOUND.into_response();
	}

	let project = params
		.project_id
		.as_deref()
		.and_then(|id| id.parse::<ProjectId>().ok())
		.and_then(|id| state.directory.project(id, installation.organization_id))
		.cloned();

	let request = SelectOptionsRequest {
		installation,
		uri: params.uri,
		query: params.query,
		project,
	};

	match state.requester.run(request).await {
		Ok(choices) => Json(choices).into_response(),
		Err(error) => {
			warn!(%error, "Select-options request to app service failed");
			(
				StatusCode::BAD_REQUEST,
				Json(serde_json::json!({ "error": SERVICE_ERROR })),
			)
				.into_response()
		}
	}
}

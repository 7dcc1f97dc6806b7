//! Issue detail routes: the aggregated detail page and per-plugin actions.

use crate::plugins::{
	DispatchResponse, IssueAction, IssuePanel, IssueWidget, PluginDispatcher, PluginProxy,
};
use crate::types::{Group, GroupId, ProjectId};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tracing::instrument;

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/projects/{project_id}/issues/{group_id}/", get(issue_detail))
		.route(
			"/projects/{project_id}/issues/{group_id}/plugins/{slug}/",
			get(plugin_action),
		)
}

/// The issue detail payload after every enabled plugin had its say.
#[derive(Serialize)]
struct IssueDetail {
	group: Group,
	tags: Vec<String>,
	actions: Vec<IssueAction>,
	panels: Vec<IssuePanel>,
	widgets: Vec<IssueWidget>,
}

/// Folds the list-modification hooks of all enabled plugins over the issue,
/// in plugin registration order. Each plugin gets a fresh proxy so its
/// configuration step runs at most once per request.
#[instrument(skip_all, fields(project.id = project_id, group.id = group_id))]
async fn issue_detail(
	State(state): State<AppState>,
	Path((project_id, group_id)): Path<(ProjectId, GroupId)>,
) -> Response {
	let Some(group) = state.directory.group(project_id, group_id) else {
		return StatusCode::NOT_FOUND.into_response();
	};

	let mut tags = Vec::new();
	let mut actions = Vec::new();
	let mut panels = Vec::new();
	let mut widgets = Vec::new();

	for entry in state.registry.iter().filter(|entry| entry.enabled) {
		let proxy = PluginProxy::new(entry.plugin.clone(), group.project.clone());
		tags = proxy.tags(group, tags);
		actions = proxy.actions(group, actions);
		panels = proxy.panels(group, panels);
		if let Some(widget) = proxy.widget(group) {
			widgets.push(widget);
		}
	}

	Json(IssueDetail {
		group: group.clone(),
		tags,
		actions,
		panels,
		widgets,
	})
	.into_response()
}

/// Walks the plugin chain and returns the first response produced for the
/// requested action URL. Which plugin answers is decided by path comparison
/// inside the dispatcher, not by the `slug` path segment.
#[instrument(skip_all, fields(project.id = project_id, group.id = group_id))]
async fn plugin_action(
	State(state): State<AppState>,
	Path((project_id, group_id, _slug)): Path<(ProjectId, GroupId, String)>,
	uri: Uri,
) -> Response {
	let Some(group) = state.directory.group(project_id, group_id) else {
		return StatusCode::NOT_FOUND.into_response();
	};

	let dispatcher = PluginDispatcher::new(uri.path());
	for entry in state.registry.iter().filter(|entry| entry.enabled) {
		let proxy = PluginProxy::new(entry.plugin.clone(), group.project.clone());
		match dispatcher.handle(&proxy, &entry.slug, group) {
			Some(DispatchResponse::Redirect(location)) => {
				return Redirect::to(&location).into_response();
			}
			Some(DispatchResponse::Page(page)) => return Json(page).into_response(),
			None => {}
		}
	}

	StatusCode::NOT_FOUND.into_response()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::plugins::github::GithubIssuesPlugin;
	use crate::plugins::{redirect, IssuePlugin, PluginRegistry, ViewResponse};
	use crate::requester::{RequesterError, SelectOption, SelectOptionsRequest, SelectRequester};
	use crate::store::Directory;
	use crate::types::{Organization, Project};
	use async_trait::async_trait;
	use axum::body::Body;
	use axum::http::Request;
	use http_body_util::BodyExt;
	use std::sync::Arc;
	use tower::ServiceExt;

	struct UnusedRequester;

	#[async_trait]
	impl SelectRequester for UnusedRequester {
		async fn run(
			&self,
			_request: SelectOptionsRequest,
		) -> Result<Vec<SelectOption>, RequesterError> {
			unreachable!("issue routes never call the requester")
		}
	}

	fn state(registry: PluginRegistry) -> AppState {
		let project = Project {
			id: 3,
			slug: "api".to_owned(),
			organization_id: 1,
		};
		let directory = Directory::new(
			vec![Organization {
				id: 1,
				slug: "acme".to_owned(),
				features: Vec::new(),
			}],
			vec![project.clone()],
			vec![Group {
				id: 42,
				title: "Panic in request handler".to_owned(),
				project,
			}],
			Vec::new(),
		)
		.unwrap();

		AppState {
			registry: Arc::new(registry),
			directory: Arc::new(directory),
			requester: Arc::new(UnusedRequester),
		}
	}

	async fn json_body(response: Response) -> serde_json::Value {
		let bytes = response.into_body().collect().await.unwrap().to_bytes();
		serde_json::from_slice(&bytes).unwrap()
	}

	#[tokio::test]
	async fn detail_aggregates_plugin_contributions() {
		let mut registry = PluginRegistry::new();
		registry.register(Arc::new(GithubIssuesPlugin)).unwrap();

		let response = crate::api::routes()
			.with_state(state(registry))
			.oneshot(
				Request::builder()
					.uri("/projects/3/issues/42/")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::OK);
		let body = json_body(response).await;
		assert_eq!(
			body["actions"][0]["label"],
			serde_json::Value::String("Create GitHub Issue".to_owned())
		);
		assert_eq!(body["widgets"][0]["template"], "github/widget.html");
		assert_eq!(body["group"]["id"], 42);
	}

	#[tokio::test]
	async fn plugin_action_renders_the_owning_plugins_view() {
		let mut registry = PluginRegistry::new();
		registry.register(Arc::new(GithubIssuesPlugin)).unwrap();

		let response = crate::api::routes()
			.with_state(state(registry))
			.oneshot(
				Request::builder()
					.uri("/projects/3/issues/42/plugins/github-issues/")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::OK);
		let body = json_body(response).await;
		assert_eq!(body["template"], "github/create_issue.html");
		assert_eq!(body["context"]["project"]["slug"], "api");
		assert_eq!(
			body["context"]["issue_title"],
			"Panic in request handler"
		);
	}

	#[tokio::test]
	async fn plugin_action_passes_redirects_through() {
		struct LoginPlugin;

		impl IssuePlugin for LoginPlugin {
			fn title(&self) -> &str {
				"Login Plugin"
			}

			fn view(&self, _group: &Group) -> Option<ViewResponse> {
				Some(redirect("https://example.com/login"))
			}
		}

		let mut registry = PluginRegistry::new();
		registry.register(Arc::new(LoginPlugin)).unwrap();

		let response = crate::api::routes()
			.with_state(state(registry))
			.oneshot(
				Request::builder()
					.uri("/projects/3/issues/42/plugins/login-plugin/")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::SEE_OTHER);
		assert_eq!(
			response.headers()["location"],
			"https://example.com/login"
		);
	}

	#[tokio::test]
	async fn unowned_action_url_is_not_found() {
		let mut registry = PluginRegistry::new();
		registry.register(Arc::new(GithubIssuesPlugin)).unwrap();

		let response = crate::api::routes()
			.with_state(state(registry))
			.oneshot(
				Request::builder()
					.uri("/projects/3/issues/42/plugins/unknown/")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}
}

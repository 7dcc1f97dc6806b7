//! Per-request plugin dispatch.
//!
//! A plugin "owns" a request when the request path equals its action URL for
//! the issue at hand. Dispatch asks the owning plugin for a view response
//! and materializes it; for any other plugin it yields nothing so the caller
//! can continue along its chain.

use crate::plugins::{PluginProxy, ViewResponse};
use crate::types::{Group, GroupId, ProjectId};
use serde::Serialize;
use serde_json::{Map, Value};

/// The reversible action URL for a plugin on an issue.
pub fn action_url(project_id: ProjectId, group_id: GroupId, slug: &str) -> String {
	format!("/projects/{project_id}/issues/{group_id}/plugins/{slug}/")
}

/// A materialized plugin response for the current request.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResponse {
	Redirect(String),
	Page(RenderedPage),
}

/// A template reference plus its fully merged render context.
///
/// Template expansion itself is owned by the frontend; the server ships the
/// template name and context as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
	pub template: String,
	pub context: Map<String, Value>,
}

pub struct PluginDispatcher {
	request_path: String,
}

impl PluginDispatcher {
	pub fn new(request_path: impl Into<String>) -> Self {
		Self {
			request_path: request_path.into(),
		}
	}

	/// Dispatches the current request to the given plugin.
	///
	/// Returns `None` when the plugin does not own the request path or its
	/// view hook falls through; the caller then tries the next plugin in
	/// its chain. Redirects pass through unchanged. A rendered view gets
	/// `project` and `group` merged into its context, with plugin-supplied
	/// keys winning on collision.
	pub fn handle(
		&self,
		proxy: &PluginProxy,
		slug: &str,
		group: &Group,
	) -> Option<DispatchResponse> {
		let selected = self.request_path == action_url(group.project.id, group.id, slug);
		if !selected {
			return None;
		}

		match proxy.view(group)? {
			ViewResponse::Redirect(location) => Some(DispatchResponse::Redirect(location)),
			ViewResponse::Render { template, context } => {
				let mut merged = Map::new();
				merged.insert(
					"project".to_owned(),
					serde_json::to_value(&group.project).unwrap_or(Value::Null),
				);
				merged.insert(
					"group".to_owned(),
					serde_json::to_value(group).unwrap_or(Value::Null),
				);
				// Plugin-held keys override the defaults.
				merged.extend(context);

				Some(DispatchResponse::Page(RenderedPage {
					template,
					context: merged,
				}))
			}
		}
	}
}

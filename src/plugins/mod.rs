//! Issue plugin infrastructure.
//!
//! Plugins contribute views, tags, actions, panels and widgets to the issue
//! detail page. They are registered once at startup in a [`PluginRegistry`]
//! and invoked per request through a lazily configured [`PluginProxy`].

mod dispatch;
mod proxy;
mod registry;

pub mod github;

pub use dispatch::{action_url, DispatchResponse, PluginDispatcher, RenderedPage};
pub use proxy::PluginProxy;
pub use registry::{PluginRegistry, PluginRegistryError, RegisteredPlugin};

use crate::types::{Group, Project};
use serde::Serialize;
use serde_json::{Map, Value};

/// A pluggable extension unit for the issue detail page.
///
/// Every method except [`title`](Self::title) has a default implementation,
/// so a plugin only overrides the hooks it cares about. The list hooks must
/// return a value of the same shape they received to support chained
/// modification across multiple plugins.
pub trait IssuePlugin: Send + Sync {
	/// Human-readable name of the plugin.
	fn title(&self) -> &str;

	/// Explicit slug override. When `None`, the slug is derived from the
	/// title at registration time.
	fn slug(&self) -> Option<&str> {
		None
	}

	fn enabled(&self) -> bool {
		true
	}

	/// Called once per request before any other hook to perform
	/// per-project setup.
	fn configure(&self, project: &Project) {
		let _ = project;
	}

	/// Handles the view logic for the plugin's action URL. Returning `None`
	/// passes control to the next plugin in the chain.
	fn view(&self, group: &Group) -> Option<ViewResponse> {
		let _ = group;
		None
	}

	/// Modifies the tag list for an issue.
	fn tags(&self, group: &Group, tag_list: Vec<String>) -> Vec<String> {
		let _ = group;
		tag_list
	}

	/// Modifies the action list for an issue.
	fn actions(&self, group: &Group, action_list: Vec<IssueAction>) -> Vec<IssueAction> {
		let _ = group;
		action_list
	}

	/// Modifies the panel list for an issue.
	fn panels(&self, group: &Group, panel_list: Vec<IssuePanel>) -> Vec<IssuePanel> {
		let _ = group;
		panel_list
	}

	/// Renders as a widget in the issue details sidebar.
	fn widget(&self, group: &Group) -> Option<IssueWidget> {
		let _ = group;
		None
	}
}

/// The response produced by a plugin's [`view`](IssuePlugin::view) hook.
///
/// The closed set of variants makes the response contract explicit: a view
/// either redirects or renders a template, built through the [`redirect`]
/// and [`render`] helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewResponse {
	Redirect(String),
	Render {
		template: String,
		context: Map<String, Value>,
	},
}

pub fn render(template: impl Into<String>, context: Map<String, Value>) -> ViewResponse {
	ViewResponse::Render {
		template: template.into(),
		context,
	}
}

pub fn redirect(url: impl Into<String>) -> ViewResponse {
	ViewResponse::Redirect(url.into())
}

/// An action entry on the issue detail page, e.g. "Create GitHub Issue".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueAction {
	pub label: String,
	pub url: String,
}

/// A panel contributed to the issue detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuePanel {
	pub title: String,
	pub template: String,
}

/// A sidebar widget contributed to the issue detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueWidget {
	pub template: String,
	pub context: Map<String, Value>,
}

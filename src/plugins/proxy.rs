use crate::plugins::{IssueAction, IssuePanel, IssuePlugin, IssueWidget, ViewResponse};
use crate::types::{Group, Project};
use std::cell::Cell;
use std::sync::Arc;

/// Proxy for plugins to delay per-project configuration until they are
/// actually used.
///
/// The proxy is created fresh for every (plugin, project) pair handled in a
/// request. The `configured` flag is unsynchronized (`Cell` keeps the proxy
/// `!Sync`), so a proxy must never be shared across concurrent requests.
pub struct PluginProxy {
	plugin: Arc<dyn IssuePlugin>,
	project: Project,
	configured: Cell<bool>,
}

impl PluginProxy {
	pub fn new(plugin: Arc<dyn IssuePlugin>, project: Project) -> Self {
		Self {
			plugin,
			project,
			configured: Cell::new(false),
		}
	}

	/// Runs the plugin's configuration step on first use, then hands out
	/// the configured plugin. Later calls skip configuration.
	fn ensure_configured(&self) -> &dyn IssuePlugin {
		if !self.configured.get() {
			self.plugin.configure(&self.project);
			self.configured.set(true);
		}
		self.plugin.as_ref()
	}

	pub fn view(&self, group: &Group) -> Option<ViewResponse> {
		self.ensure_configured().view(group)
	}

	pub fn tags(&self, group: &Group, tag_list: Vec<String>) -> Vec<String> {
		self.ensure_configured().tags(group, tag_list)
	}

	pub fn actions(&self, group: &Group, action_list: Vec<IssueAction>) -> Vec<IssueAction> {
		self.ensure_configured().actions(group, action_list)
	}

	pub fn panels(&self, group: &Group, panel_list: Vec<IssuePanel>) -> Vec<IssuePanel> {
		self.ensure_configured().panels(group, panel_list)
	}

	pub fn widget(&self, group: &Group) -> Option<IssueWidget> {
		self.ensure_configured().widget(group)
	}
}

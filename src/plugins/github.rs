//! Built-in GitHub issue linking plugin.

use crate::plugins::{action_url, render, IssueAction, IssuePlugin, IssueWidget, ViewResponse};
use crate::types::{Group, Project};
use serde_json::{Map, Value};
use tracing::debug;

pub struct GithubIssuesPlugin;

impl IssuePlugin for GithubIssuesPlugin {
	fn title(&self) -> &str {
		"GitHub Issues"
	}

	fn configure(&self, project: &Project) {
		debug!(project.slug = %project.slug, "Configured GitHub Issues plugin");
	}

	fn view(&self, group: &Group) -> Option<ViewResponse> {
		let mut context = Map::new();
		context.insert("issue_title".to_owned(), Value::String(group.title.clone()));
		Some(render("github/create_issue.html", context))
	}

	fn actions(&self, group: &Group, mut action_list: Vec<IssueAction>) -> Vec<IssueAction> {
		action_list.push(IssueAction {
			label: "Create GitHub Issue".to_owned(),
			url: action_url(group.project.id, group.id, "github-issues"),
		});
		action_list
	}

	fn widget(&self, group: &Group) -> Option<IssueWidget> {
		let mut context = Map::new();
		context.insert("issue_title".to_owned(), Value::String(group.title.clone()));
		Some(IssueWidget {
			template: "github/widget.html".to_owned(),
			context,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn group() -> Group {
		Group {
			id: 8,
			title: "NullPointerException in checkout".to_owned(),
			project: Project {
				id: 2,
				slug: "storefront".to_owned(),
				organization_id: 1,
			},
		}
	}

	#[test]
	fn contributes_a_create_issue_action() {
		let actions = GithubIssuesPlugin.actions(&group(), Vec::new());

		assert_eq!(actions.len(), 1);
		assert_eq!(actions[0].label, "Create GitHub Issue");
		assert_eq!(actions[0].url, "/projects/2/issues/8/plugins/github-issues/");
	}

	#[test]
	fn view_renders_the_create_issue_form() {
		let Some(ViewResponse::Render { template, context }) = GithubIssuesPlugin.view(&group())
		else {
			panic!("expected a rendered view");
		};

		assert_eq!(template, "github/create_issue.html");
		assert_eq!(
			context["issue_title"],
			Value::String("NullPointerException in checkout".to_owned())
		);
	}
}

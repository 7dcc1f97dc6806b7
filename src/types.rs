use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type OrganizationId = u64;
pub type ProjectId = u64;
pub type GroupId = u64;

/// An organization owning projects and third-party app installations.
///
/// Feature flags are organization-scoped: a capability is available to an
/// actor only if the owning organization carries the corresponding flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
	pub id: OrganizationId,
	pub slug: String,
	pub features: Vec<String>,
}

impl Organization {
	pub fn has_feature(&self, flag: &str) -> bool {
		self.features.iter().any(|feature| feature == flag)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
	pub id: ProjectId,
	pub slug: String,
	pub organization_id: OrganizationId,
}

/// A tracked issue ("group" of aggregated error events) within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
	pub id: GroupId,
	pub title: String,
	pub project: Project,
}

/// An installed third-party application, reachable at its webhook URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInstallation {
	pub uuid: Uuid,
	pub organization_id: OrganizationId,
	pub webhook_url: String,
}

//! Read-only directory of organizations, projects, groups and installations.
//!
//! Faultline seeds this data from its configuration file. The directory is
//! built once at startup and shared immutably across requests.

use crate::config::AppConfig;
use crate::types::{AppInstallation, Group, GroupId, Organization, OrganizationId, Project, ProjectId};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug)]
pub struct Directory {
	organizations: HashMap<OrganizationId, Organization>,
	projects: HashMap<ProjectId, Project>,
	groups: HashMap<GroupId, Group>,
	installations: HashMap<Uuid, AppInstallation>,
}

impl Directory {
	/// Builds a directory from fully resolved domain records.
	///
	/// Every project must belong to a known organization, every group to a
	/// known project and every installation to a known organization.
	pub fn new(
		organizations: Vec<Organization>,
		projects: Vec<Project>,
		groups: Vec<Group>,
		installations: Vec<AppInstallation>,
	) -> Result<Self, DirectoryError> {
		let organizations: HashMap<_, _> = organizations
			.into_iter()
			.map(|organization| (organization.id, organization))
			.collect();

		for project in &projects {
			if !organizations.contains_key(&project.organization_id) {
				return Err(DirectoryError::UnknownOrganization {
					id: project.organization_id,
					referenced_by: format!("project {}", project.slug),
				});
			}
		}

		for installation in &installations {
			if !organizations.contains_key(&installation.organization_id) {
				return Err(DirectoryError::UnknownOrganization {
					id: installation.organization_id,
					referenced_by: format!("installation {}", installation.uuid),
				});
			}
		}

		Ok(Self {
			organizations,
			projects: projects
				.into_iter()
				.map(|project| (project.id, project))
				.collect(),
			groups: groups.into_iter().map(|group| (group.id, group)).collect(),
			installations: installations
				.into_iter()
				.map(|installation| (installation.uuid, installation))
				.collect(),
		})
	}

	pub fn from_config(config: &AppConfig) -> Result<Self, DirectoryError> {
		let organizations: Vec<Organization> = config
			.organizations
			.iter()
			.map(|organization| Organization {
				id: organization.id,
				slug: organization.slug.clone(),
				features: organization.features.clone(),
			})
			.collect();

		let projects: Vec<Project> = config
			.projects
			.iter()
			.map(|project| Project {
				id: project.id,
				slug: project.slug.clone(),
				organization_id: project.organization,
			})
			.collect();

		let groups = config
			.groups
			.iter()
			.map(|group| {
				let project = projects
					.iter()
					.find(|project| project.id == group.project)
					.cloned()
					.ok_or(DirectoryError::UnknownProject {
						id: group.project,
						group: group.id,
					})?;

				Ok(Group {
					id: group.id,
					title: group.title.clone(),
					project,
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		let installations = config
			.installations
			.iter()
			.map(|installation| AppInstallation {
				uuid: installation.uuid,
				organization_id: installation.organization,
				webhook_url: installation.webhook_url.clone(),
			})
			.collect();

		Self::new(organizations, projects, groups, installations)
	}

	pub fn organization(&self, id: OrganizationId) -> Option<&Organization> {
		self.organizations.get(&id)
	}

	/// Looks up a project by id, scoped to the given organization.
	///
	/// A project that exists under a different organization is treated as
	/// absent so that callers cannot reach across organization boundaries.
	pub fn project(&self, id: ProjectId, organization_id: OrganizationId) -> Option<&Project> {
		self.projects
			.get(&id)
			.filter(|project| project.organization_id == organization_id)
	}

	pub fn group(&self, project_id: ProjectId, group_id: GroupId) -> Option<&Group> {
		self.groups
			.get(&group_id)
			.filter(|group| group.project.id == project_id)
	}

	pub fn installation(&self, uuid: &Uuid) -> Option<&AppInstallation> {
		self.installations.get(uuid)
	}
}

#[derive(Debug, Error)]
pub enum DirectoryError {
	#[error("group {group} references unknown project {id}")]
	UnknownProject { id: ProjectId, group: GroupId },

	#[error("{referenced_by} references unknown organization {id}")]
	UnknownOrganization { id: OrganizationId, referenced_by: String },
}

#[cfg(test)]
mod tests {
	use super::*;

	fn organization(id: OrganizationId) -> Organization {
		Organization {
			id,
			slug: format!("org-{id}"),
			features: Vec::new(),
		}
	}

	fn project(id: ProjectId, organization_id: OrganizationId) -> Project {
		Project {
			id,
			slug: format!("project-{id}"),
			organization_id,
		}
	}

	#[test]
	fn project_lookup_is_organization_scoped() {
		let directory = Directory::new(
			vec![organization(1), organization(2)],
			vec![project(10, 1)],
			Vec::new(),
			Vec::new(),
		)
		.unwrap();

		assert!(directory.project(10, 1).is_some());
		assert!(directory.project(10, 2).is_none());
		assert!(directory.project(99, 1).is_none());
	}

	#[test]
	fn group_lookup_requires_matching_project() {
		let group = Group {
			id: 5,
			title: "TypeError in worker".to_owned(),
			project: project(10, 1),
		};
		let directory = Directory::new(
			vec![organization(1)],
			vec![project(10, 1)],
			vec![group],
			Vec::new(),
		)
		.unwrap();

		assert!(directory.group(10, 5).is_some());
		assert!(directory.group(11, 5).is_none());
	}

	#[test]
	fn dangling_organization_reference_is_rejected() {
		let error = Directory::new(Vec::new(), vec![project(10, 1)], Vec::new(), Vec::new())
			.unwrap_err();

		assert!(matches!(
			error,
			DirectoryError::UnknownOrganization { id: 1, .. }
		));
	}
}

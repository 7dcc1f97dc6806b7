//! Mediator for forwarding "external request" calls to installed
//! third-party apps.
//!
//! The select requester asks the app backing an installation for the options
//! of a select field, e.g. to populate a repository dropdown in the issue
//! linking UI.

use crate::config::RequesterConfig;
use crate::types::{AppInstallation, Project};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// A single choice returned by the third-party app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
	pub label: String,
	pub value: String,
}

/// Parameters for one select-options request. Constructed and discarded
/// within a single HTTP request; nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOptionsRequest {
	pub installation: AppInstallation,
	/// URI of the select endpoint, relative to the app's webhook URL.
	pub uri: String,
	/// User-typed filter text, if any.
	pub query: Option<String>,
	/// Optional project scope. Absent when the caller supplied no (or an
	/// unresolvable) project id.
	pub project: Option<Project>,
}

#[async_trait]
pub trait SelectRequester: Send + Sync {
	async fn run(
		&self,
		request: SelectOptionsRequest,
	) -> Result<Vec<SelectOption>, RequesterError>;
}

/// Failure kinds for a select-options request.
///
/// The endpoint maps all of these to the same generic client error; the
/// distinction exists for logs and telemetry.
#[derive(Debug, Error)]
pub enum RequesterError {
	#[error("failed to reach the app service: {source}")]
	Network {
		#[from]
		source: reqwest::Error,
	},

	#[error("app service rejected the request with status {status}")]
	UpstreamRejected { status: u16 },

	#[error("invalid external request: {reason}")]
	Validation { reason: String },
}

/// Production requester speaking HTTP to the installed app.
pub struct AsyncSelectRequester {
	client: reqwest::Client,
}

impl AsyncSelectRequester {
	pub fn new(config: &RequesterConfig) -> Result<Self, RequesterError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_millis(config.timeout))
			.user_agent(concat!("faultline/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self { client })
	}
}

#[async_trait]
impl SelectRequester for AsyncSelectRequester {
	#[instrument(skip_all, fields(installation.uuid = %request.installation.uuid, uri = %request.uri))]
	async fn run(
		&self,
		request: SelectOptionsRequest,
	) -> Result<Vec<SelectOption>, RequesterError> {
		let url = request_url(&request)?;
		debug!(%url, "Forwarding select-options request to app service");

		let response = self.client.get(url).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(RequesterError::UpstreamRejected {
				status: status.as_u16(),
			});
		}

		Ok(response.json::<Vec<SelectOption>>().await?)
	}
}

fn request_url(request: &SelectOptionsRequest) -> Result<Url, RequesterError> {
	let base = Url::parse(&request.installation.webhook_url).map_err(|source| {
		RequesterError::Validation {
			reason: format!("invalid webhook URL: {source}"),
		}
	})?;

	let mut url = base
		.join(&request.uri)
		.map_err(|source| RequesterError::Validation {
			reason: format!("invalid select URI {:?}: {source}", request.uri),
		})?;

	{
		let mut pairs = url.query_pairs_mut();
		pairs.append_pair(
			"installationId",
			&request.installation.uuid.to_string(),
		);
		if let Some(query) = &request.query {
			pairs.append_pair("query", query);
		}
		if let Some(project) = &request.project {
			pairs.append_pair("projectSlug", &project.slug);
		}
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	use super::*;
	use uuid::Uuid;

	fn request(query: Option<&str>, project: Option<Project>) -> SelectOptionsRequest {
		SelectOptionsRequest {
			installation: AppInstallation {
				uuid: Uuid::nil(),
				organization_id: 1,
				webhook_url: "https://app.example.com/sentry/".to_owned(),
			},
			uri: "select/repositories".to_owned(),
			query: query.map(str::to_owned),
			project,
		}
	}

	#[test]
	fn builds_the_select_url_with_all_parameters() {
		let url = request_url(&request(
			Some("abc"),
			Some(Project {
				id: 1,
				slug: "backend".to_owned(),
				organization_id: 1,
			}),
		))
		.unwrap();

		assert_eq!(url.path(), "/sentry/select/repositories");
		let pairs: Vec<(String, String)> = url
			.query_pairs()
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect();
		assert!(pairs.contains(&(
			"installationId".to_owned(),
			Uuid::nil().to_string()
		)));
		assert!(pairs.contains(&("query".to_owned(), "abc".to_owned())));
		assert!(pairs.contains(&("projectSlug".to_owned(), "backend".to_owned())));
	}

	#[test]
	fn omits_absent_parameters() {
		let url = request_url(&request(None, None)).unwrap();
		let keys: Vec<String> = url.query_pairs().map(|(key, _)| key.into_owned()).collect();

		assert_eq!(keys, vec!["installationId".to_owned()]);
	}

	#[test]
	fn rejects_an_unparseable_webhook_url() {
		let mut request = request(None, None);
		request.installation.webhook_url = "not a url".to_owned();

		assert!(matches!(
			request_url(&request),
			Err(RequesterError::Validation { .. })
		));
	}
}

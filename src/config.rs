use crate::types::{GroupId, OrganizationId, ProjectId};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
	pub telemetry: TelemetryConfig,
	pub server: ServerConfig,
	pub requester: RequesterConfig,
	#[serde(default)]
	pub organizations: Vec<OrganizationConfig>,
	#[serde(default)]
	pub projects: Vec<ProjectConfig>,
	#[serde(default)]
	pub groups: Vec<GroupConfig>,
	#[serde(default)]
	pub installations: Vec<InstallationConfig>,
}

impl AppConfig {
	pub fn new() -> Result<Self, config::ConfigError> {
		let config = config::Config::builder()
			.add_source(config::File::from_str(
				include_str!("defaults.toml"),
				config::FileFormat::Toml,
			))
			.add_source(config::File::with_name("config.toml").required(false))
			.add_source(config::Environment::with_prefix("FAULTLINE").separator("_"))
			.build()?;

		config.try_deserialize()
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
	/// Log level for the fmt layer. Also configurable via RUST_LOG.
	#[serde(deserialize_with = "deserialize_level")]
	pub level: tracing::Level,
	/// Sentry DSN. An empty or missing value disables error tracking.
	pub sentry: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
	pub http: HttpServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
	/// The interface the HTTP server will be listening on
	pub interface: std::net::IpAddr,
	/// The port for the HTTP server
	pub port: u16,
	/// Request timeout in seconds
	pub request_timeout: u64,
	pub graceful_shutdown: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequesterConfig {
	/// Timeout in milliseconds for calls to installed third-party apps
	pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
	pub id: OrganizationId,
	pub slug: String,
	#[serde(default)]
	pub features: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
	pub id: ProjectId,
	pub slug: String,
	pub organization: OrganizationId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
	pub id: GroupId,
	pub title: String,
	pub project: ProjectId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationConfig {
	pub uuid: Uuid,
	pub organization: OrganizationId,
	pub webhook_url: String,
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<tracing::Level, D::Error>
where
	D: Deserializer<'de>,
{
	let value = String::deserialize(deserializer)?;
	value.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn compiled_in_defaults_parse() {
		let config = AppConfig::new().unwrap();
		assert_eq!(config.telemetry.level, tracing::Level::INFO);
		assert_eq!(config.server.http.port, 8080);
		assert!(config.organizations.is_empty());
	}
}

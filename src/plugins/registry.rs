//! Registry for the issue plugins available to this process.

use crate::plugins::IssuePlugin;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// A registered plugin with its resolved identity.
pub struct RegisteredPlugin {
	pub slug: String,
	pub enabled: bool,
	pub plugin: Arc<dyn IssuePlugin>,
}

/// Registry mapping plugin slugs to their implementations.
///
/// The registry is populated once at startup and read without locking for
/// the remainder of the process. Registering is not safe to interleave with
/// traffic; share the finished registry behind an `Arc`.
pub struct PluginRegistry {
	plugins: HashMap<String, Arc<RegisteredPlugin>>,
	/// Slugs in first-registration order, for deterministic chain walks.
	order: Vec<String>,
}

impl PluginRegistry {
	pub fn new() -> Self {
		Self {
			plugins: HashMap::new(),
			order: Vec::new(),
		}
	}

	/// Registers a plugin under its resolved slug.
	///
	/// The slug is the plugin's explicit slug when set, otherwise the title
	/// lower-cased with spaces replaced by hyphens. Registering a second
	/// plugin with the same slug replaces the first.
	///
	/// # Errors
	/// Fails when neither an explicit slug nor a non-empty title is
	/// available, so a misconfigured plugin is rejected at startup instead
	/// of failing on first use.
	pub fn register(
		&mut self,
		plugin: Arc<dyn IssuePlugin>,
	) -> Result<String, PluginRegistryError> {
		let slug = match plugin.slug() {
			Some(slug) => slug.to_owned(),
			None => slugify(plugin.title()),
		};

		if slug.is_empty() {
			return Err(PluginRegistryError::MissingIdentity {
				title: plugin.title().to_owned(),
			});
		}

		let entry = Arc::new(RegisteredPlugin {
			slug: slug.clone(),
			enabled: plugin.enabled(),
			plugin,
		});

		info!(plugin.slug = %slug, "Registered issue plugin");
		if self.plugins.insert(slug.clone(), entry).is_none() {
			self.order.push(slug.clone());
		}
		Ok(slug)
	}

	pub fn get(&self, slug: &str) -> Option<Arc<RegisteredPlugin>> {
		self.plugins.get(slug).cloned()
	}

	/// Iterates over registered plugins in first-registration order.
	pub fn iter(&self) -> impl Iterator<Item = &RegisteredPlugin> {
		self.order
			.iter()
			.filter_map(|slug| self.plugins.get(slug))
			.map(Arc::as_ref)
	}

	pub fn len(&self) -> usize {
		self.plugins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plugins.is_empty()
	}
}

impl Default for PluginRegistry {
	fn default() -> Self {
		Self::new()
	}
}

fn slugify(title: &str) -> String {
	title.to_lowercase().replace(' ', "-")
}

#[derive(Debug, Error)]
pub enum PluginRegistryError {
	#[error("plugin {title:?} has neither an explicit slug nor a non-empty title")]
	MissingIdentity { title: String },
}

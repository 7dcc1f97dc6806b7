pub(crate) mod api;
pub(crate) mod config;
pub(crate) mod plugins;
pub(crate) mod requester;
pub(crate) mod store;
pub(crate) mod types;

use crate::config::{AppConfig, HttpServerConfig};
use crate::plugins::github::GithubIssuesPlugin;
use crate::plugins::PluginRegistry;
use crate::requester::{AsyncSelectRequester, SelectRequester};
use crate::store::Directory;
use axum::extract::Request;
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace;
use tracing::{error, info, level_filters::LevelFilter, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logger(level: tracing::Level) {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::fmt::layer()
				.compact()
				.with_ansi(true)
				.with_file(false)
				.with_line_number(false)
				.with_target(false),
		)
		.with(
			EnvFilter::builder()
				.with_default_directive(LevelFilter::from_level(level).into())
				.from_env_lossy(),
		)
		.with(sentry::integrations::tracing::layer())
		.init();
}

#[derive(Clone)]
pub struct AppState {
	pub registry: Arc<PluginRegistry>,
	pub directory: Arc<Directory>,
	pub requester: Arc<dyn SelectRequester>,
}

fn init_sentry(config: &AppConfig) -> sentry::ClientInitGuard {
	let guard = sentry::init((
		// An empty string will disable Sentry
		config.telemetry.sentry.as_deref().unwrap_or_default(),
		sentry::ClientOptions {
			release: sentry::release_name!(),
			traces_sample_rate: 1.0,
			..Default::default()
		},
	));

	if let Some(dsn) = &config.telemetry.sentry {
		info!(dsn, "Enabled Sentry for tracing and error tracking");
	};

	guard
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = AppConfig::new()?;
	init_logger(config.telemetry.level);

	// Manually create the Tokio runtime because the Sentry client needs to be created *before* the
	// Tokio runtime, which prevents us from using the #[tokio::main] macro.
	// See https://docs.sentry.io/platforms/rust/#async-main-function
	let _sentry = init_sentry(&config);

	tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?
		.block_on(async move {
			if let Err(error) = run(config).await {
				error!("Failed to start application due to error: {error}");
			}
		});
	Ok(())
}

fn build_registry() -> Result<PluginRegistry, plugins::PluginRegistryError> {
	let mut registry = PluginRegistry::new();
	registry.register(Arc::new(GithubIssuesPlugin))?;
	Ok(registry)
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
	let registry = build_registry()?;
	info!(plugins = registry.len(), "Initialized plugin registry");
	let directory = Directory::from_config(&config)?;
	let requester = AsyncSelectRequester::new(&config.requester)?;

	let app_state = AppState {
		registry: Arc::new(registry),
		directory: Arc::new(directory),
		requester: Arc::new(requester),
	};

	let HttpServerConfig {
		interface: host,
		port,
		request_timeout,
		graceful_shutdown,
	} = config.server.http;

	let app = api::routes()
		.layer(CorsLayer::permissive())
		.layer(axum::middleware::from_fn(add_common_headers))
		.layer(
			tower_http::trace::TraceLayer::new_for_http()
				.make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
				.on_request(trace::DefaultOnRequest::new().level(Level::INFO))
				.on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
		)
		.layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
		.with_state(app_state);

	let addr = SocketAddr::from((host, port));
	let listener = TcpListener::bind(addr).await?;

	info!("Started Faultline server on http://{addr}");
	if graceful_shutdown {
		axum::serve(listener, app)
			.with_graceful_shutdown(shutdown_signal())
			.await?;
	} else {
		axum::serve(listener, app).await?;
	}

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async { signal::ctrl_c().await.unwrap() };

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.unwrap()
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}

async fn add_common_headers(req: Request, next: axum::middleware::Next) -> Response {
	let mut response = next.run(req).await;
	let server_name = concat!("Faultline/", env!("CARGO_PKG_VERSION"));
	let headers = response.headers_mut();
	headers.insert("Server", axum::http::HeaderValue::from_static(server_name));
	response
}

//! Startup sequence.
//!
//! Configuration is validated before anything else runs, so a missing or
//! malformed variable stops the process before the listener binds.

use reqwest::Client;
use runners_cloud::http::build_client;
use runners_cloud::{
    ComputeInstancesClient, Endpoints, IamTokenProvider, InstanceCensus, NameFilter,
    ResourceDirectoryClient,
};
use runners_config::ExporterConfig;
use runners_telemetry::{
    DEFAULT_LOG_LEVEL, GlobalContextGuard, LogFormat, LoggingConfig, Metrics, ReportExt,
    init_logging,
};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::poller::Poller;
use crate::server;

/// Service name attached to the application span.
pub const SERVICE_NAME: &str = "runners-exporter";

/// Production poller wired to the real upstream clients.
pub type CloudPoller = Poller<IamTokenProvider, ResourceDirectoryClient, ComputeInstancesClient>;

/// Dependencies required to start the exporter.
pub(crate) struct BootstrapDependencies {
    config: ExporterConfig,
    endpoints: Endpoints,
    metrics: Metrics,
    client: Client,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the process environment.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config =
            runners_config::from_env().map_err(|err| AppError::config("config.from_env", err))?;
        Self::from_config(config)
    }

    pub(crate) fn from_config(config: ExporterConfig) -> AppResult<Self> {
        let endpoints = Endpoints::for_domain(&config.cloud.api_domain);
        Self::with_endpoints(config, endpoints)
    }

    pub(crate) fn with_endpoints(config: ExporterConfig, endpoints: Endpoints) -> AppResult<Self> {
        let metrics =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        let client = build_client().map_err(|err| AppError::http_client("http.client", err))?;
        Ok(Self {
            config,
            endpoints,
            metrics,
            client,
        })
    }

    /// Wire the upstream clients into a poller sharing this registry.
    pub(crate) fn poller(&self) -> CloudPoller {
        let cloud = &self.config.cloud;
        let tokens = IamTokenProvider::new(
            self.client.clone(),
            self.endpoints.token.clone(),
            cloud.service_account_id.clone(),
            cloud.key_id.clone(),
            cloud.private_key_path.clone(),
        );
        let directory = ResourceDirectoryClient::new(
            self.client.clone(),
            self.endpoints.folders.clone(),
            cloud.cloud_id.clone(),
        );
        let filter = NameFilter::new(
            self.config.filter.name_substring.clone(),
            self.config.filter.excluded_names.clone(),
        );
        let census = InstanceCensus::new(
            ComputeInstancesClient::new(self.client.clone(), self.endpoints.instances.clone()),
            filter,
        );
        Poller::new(
            tokens,
            directory,
            census,
            self.metrics.clone(),
            self.config.schedule,
        )
    }
}

/// Entry point for the exporter boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, telemetry, or the metrics listener
/// cannot be set up, or if the listener later fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let logging = LoggingConfig {
        level: DEFAULT_LOG_LEVEL,
        format: LogFormat::from_setting(dependencies.config.logging.format.as_deref()),
        ..LoggingConfig::default()
    };
    init_logging(&logging).map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new(SERVICE_NAME);

    log_startup(&dependencies.config);

    let listener = server::bind(dependencies.config.listener.port).await?;
    let listener_task = tokio::spawn(server::serve(listener, dependencies.metrics.clone()));
    let poller = dependencies.poller();

    tokio::select! {
        joined = listener_task => {
            let result = joined.map_err(|source| AppError::ListenerTask { source })?;
            if let Err(err) = &result {
                error!(error = %err.report(), "metrics listener stopped");
            }
            result
        }
        () = poller.run() => Ok(()),
    }
}

fn log_startup(config: &ExporterConfig) {
    info!(
        cloud_id = %config.cloud.cloud_id,
        api_domain = %config.cloud.api_domain,
        private_key_path = %config.cloud.private_key_path.display(),
        name_substring = %config.filter.name_substring,
        excluded = config.filter.excluded_names.len(),
        port = config.listener.port,
        "runners exporter starting"
    );
}

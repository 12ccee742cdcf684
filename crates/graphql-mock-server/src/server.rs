use std::{
    future::Future,
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};

use bon::bon;

use crate::{
    cors::CorsConfig, custom_scalar_map::CustomScalarMap, errors::ServerError,
    health::HealthCheckConfig, mock::DEFAULT_LIST_LENGTH, schema::DEFAULT_SCHEMA_PATH,
};

mod states;

use states::StateMachine;

/// Port used when none is configured
pub const DEFAULT_PORT: u16 = 4000;

/// How long in-flight requests may take to finish once shutdown starts
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// A GraphQL server answering every operation with mocked data
#[derive(Debug)]
pub struct Server {
    schema_path: PathBuf,
    address: IpAddr,
    port: u16,
    introspection: bool,
    list_length: usize,
    custom_scalar_map: Option<CustomScalarMap>,
    cors: CorsConfig,
    health_check: HealthCheckConfig,
    drain_timeout: Duration,
}

#[bon]
impl Server {
    #[builder]
    pub fn new(
        #[builder(into, default = PathBuf::from(DEFAULT_SCHEMA_PATH))] schema_path: PathBuf,
        #[builder(default = IpAddr::V4(Ipv4Addr::UNSPECIFIED))] address: IpAddr,
        #[builder(default = DEFAULT_PORT)] port: u16,
        #[builder(default = true)] introspection: bool,
        #[builder(default = DEFAULT_LIST_LENGTH)] list_length: usize,
        custom_scalar_map: Option<CustomScalarMap>,
        #[builder(default)] cors: CorsConfig,
        #[builder(default)] health_check: HealthCheckConfig,
        #[builder(default = DEFAULT_DRAIN_TIMEOUT)] drain_timeout: Duration,
    ) -> Self {
        Self {
            schema_path,
            address,
            port,
            introspection,
            list_length,
            custom_scalar_map,
            cors,
            health_check,
            drain_timeout,
        }
    }
}

impl Server {
    /// Serve until SIGTERM or Ctrl-C, then drain and stop
    pub async fn start(self) -> Result<(), ServerError> {
        self.start_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then drain and stop
    pub async fn start_until(
        self,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<(), ServerError> {
        StateMachine {}.start(self, shutdown).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

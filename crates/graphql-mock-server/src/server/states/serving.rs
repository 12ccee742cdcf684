use std::{future::Future, io, net::SocketAddr, time::Duration};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{errors::ServerError, health::HealthCheck};

use super::Draining;

pub(super) struct Serving {
    pub(super) address: SocketAddr,
    pub(super) server: JoinHandle<io::Result<()>>,
    pub(super) draining: CancellationToken,
    pub(super) health_check: Option<HealthCheck>,
    pub(super) drain_timeout: Duration,
}

impl Serving {
    pub(super) async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<Draining, ServerError> {
        let stopped = tokio::select! {
            () = shutdown => None,
            result = &mut self.server => Some(result),
        };

        match stopped {
            None => Ok(self.drain()),
            // The listener only closes on its own if serving failed
            Some(result) => Err(ServerError::Serve(result?.err().unwrap_or_else(|| {
                io::Error::other("listener closed before shutdown was requested")
            }))),
        }
    }

    /// Refuse new operations and close the listener
    pub(super) fn drain(self) -> Draining {
        info!(timeout = ?self.drain_timeout, "Draining GraphQL mock server");
        self.draining.cancel();
        if let Some(health_check) = &self.health_check {
            health_check.mark_draining();
        }
        Draining {
            server: self.server,
            drain_timeout: self.drain_timeout,
        }
    }
}

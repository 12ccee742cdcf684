use std::{io, time::Duration};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::ServerError;

pub(super) struct Draining {
    pub(super) server: JoinHandle<io::Result<()>>,
    pub(super) drain_timeout: Duration,
}

impl Draining {
    /// Wait for in-flight requests, dropping whatever is left at the timeout
    pub(super) async fn stop(mut self) -> Result<(), ServerError> {
        match tokio::time::timeout(self.drain_timeout, &mut self.server).await {
            Ok(result) => result?.map_err(ServerError::Serve)?,
            Err(_) => {
                warn!(
                    timeout = ?self.drain_timeout,
                    "Drain timeout elapsed, dropping remaining connections"
                );
                self.server.abort();
            }
        }
        info!("GraphQL mock server stopped");
        Ok(())
    }
}

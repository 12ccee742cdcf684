use tracing::info;

use super::{Config, Loading};

pub(super) struct Idle {
    pub(super) config: Config,
}

impl Idle {
    pub(super) fn start(self) -> Loading {
        info!(
            schema = %self.config.schema_path.display(),
            "Starting GraphQL mock server"
        );
        Loading {
            config: self.config,
        }
    }
}

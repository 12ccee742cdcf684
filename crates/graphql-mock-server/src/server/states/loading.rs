use crate::{errors::ServerError, schema::load_schema};

use super::{Building, Config};

pub(super) struct Loading {
    pub(super) config: Config,
}

impl Loading {
    #[allow(clippy::result_large_err)]
    pub(super) fn load(self) -> Result<Building, ServerError> {
        let sdl = load_schema(&self.config.schema_path).ok_or(ServerError::NoSchema)?;
        Ok(Building {
            config: self.config,
            sdl,
        })
    }
}

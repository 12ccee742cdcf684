use std::path::PathBuf;

use graphql_mock_server::{
    custom_scalar_map::CustomScalarMap, errors::ServerError, mock::DEFAULT_LIST_LENGTH,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// Mock generation options
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Mocks {
    /// Number of elements generated for every list field
    pub list_length: usize,

    /// Path to a JSON object of fixed values keyed by scalar name
    pub custom_scalars: Option<PathBuf>,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            list_length: DEFAULT_LIST_LENGTH,
            custom_scalars: None,
        }
    }
}

impl Mocks {
    /// Load the configured custom scalar values, if any
    #[allow(clippy::result_large_err)]
    pub fn custom_scalar_map(&self) -> Result<Option<CustomScalarMap>, ServerError> {
        self.custom_scalars
            .as_ref()
            .map(CustomScalarMap::try_from)
            .transpose()
    }
}

//! Loading and validating the GraphQL schema definition

use std::path::Path;

use apollo_compiler::{Schema, validation::Valid};
use tracing::{info, warn};

use crate::errors::ServerError;

/// The default schema file, resolved against the working directory
pub const DEFAULT_SCHEMA_PATH: &str = "schema.graphql";

/// Read the schema definition at `path`.
///
/// Read failures are logged and reported as `None` rather than surfaced as an
/// error, leaving the caller to decide whether a missing schema is fatal.
pub fn load_schema(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(sdl) => {
            info!(path = %path.display(), "Schema loaded");
            Some(sdl)
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "Could not load schema");
            None
        }
    }
}

/// Parse and validate schema definition language into an executable schema
#[allow(clippy::result_large_err)]
pub fn build_schema(sdl: &str, path: impl AsRef<Path>) -> Result<Valid<Schema>, ServerError> {
    Schema::parse_and_validate(sdl, path.as_ref())
        .map_err(|errors| ServerError::GraphQLSchema(Box::new(errors)))
}

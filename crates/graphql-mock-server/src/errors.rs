use apollo_compiler::{Schema, validation::WithErrors};
use tokio::task::JoinError;

/// An error in server initialization
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Could not parse GraphQL schema: {0}")]
    GraphQLSchema(Box<WithErrors<Schema>>),

    #[error("Could not build mocked schema: {0}")]
    MockSchema(String),

    #[error("No valid schema was supplied")]
    NoSchema,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not open file: {0}")]
    ReadFile(#[from] std::io::Error),

    #[error("invalid custom_scalars config: {0}")]
    CustomScalarConfig(serde_json::Error),

    #[error("invalid custom_scalars config: expected a JSON object, got {0}")]
    CustomScalarShape(serde_json::Value),

    #[error("Invalid CORS configuration: {0}")]
    Cors(String),

    #[error("Could not bind to {address}: {source}")]
    Bind {
        address: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP server failed: {0}")]
    Serve(std::io::Error),

    #[error("Server stopped unexpectedly: {0}")]
    StartupError(#[from] JoinError),
}

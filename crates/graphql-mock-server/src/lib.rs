pub mod cors;
pub mod custom_scalar_map;
pub mod errors;
mod graphql;
pub mod health;
pub mod mock;
pub mod schema;
pub mod server;

pub use graphql::GRAPHQL_PATH;

use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};

use graphql_mock_server::{
    cors::CorsConfig,
    health::HealthCheckConfig,
    schema::DEFAULT_SCHEMA_PATH,
    server::{DEFAULT_DRAIN_TIMEOUT, DEFAULT_PORT},
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{logging::Logging, mocks::Mocks};

/// Configuration for the GraphQL mock server
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// The IP address to bind to
    pub address: IpAddr,

    /// CORS configuration
    pub cors: CorsConfig,

    /// How long in-flight requests may run after a shutdown signal
    #[serde(deserialize_with = "humantime_serde::deserialize")]
    #[schemars(with = "String")]
    pub drain_timeout: Duration,

    /// Health check configuration
    pub health_check: HealthCheckConfig,

    /// Allow introspection queries
    pub introspection: bool,

    /// Logging configuration
    pub logging: Logging,

    /// Mock generation options
    pub mocks: Mocks,

    /// The port to listen on, also read from the `PORT` environment variable
    pub port: u16,

    /// Path to the GraphQL schema to mock, relative to the working directory
    pub schema: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            cors: CorsConfig::default(),
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            health_check: HealthCheckConfig::default(),
            introspection: true,
            logging: Logging::default(),
            mocks: Mocks::default(),
            port: DEFAULT_PORT,
            schema: PathBuf::from(DEFAULT_SCHEMA_PATH),
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::Config;

    #[test]
    fn it_parses_a_minimal_config() {
        let config = serde_json::from_str::<Config>("{}").unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.address.to_string(), "0.0.0.0");
        assert_eq!(config.schema.to_str(), Some("schema.graphql"));
        assert!(config.introspection);
        assert_eq!(config.drain_timeout, Duration::from_secs(5));
    }

    #[test]
    fn it_parses_human_durations() {
        let config = serde_json::from_str::<Config>(r#"{ "drain_timeout": "1m 30s" }"#).unwrap();

        assert_eq!(config.drain_timeout, Duration::from_secs(90));
    }

    #[test]
    fn it_contains_no_keys_with_double_underscore() {
        // Nested env keys are split on `__`, see [runtime::read_config]
        let schema = schemars::schema_for!(Config).to_value().to_string();

        assert!(!schema.contains("__"))
    }
}

//! Runtime utilites
//!
//! This module is only used by the main binary and provides helper code
//! related to runtime configuration.

mod config;
mod logging;
mod mocks;
mod schemas;

use std::path::Path;

pub use config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

/// Prefix of the environment variables mapped onto the config
const ENV_PREFIX: &str = "GRAPHQL_MOCK_";

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(port_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    Figment::new()
        .join(port_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file(yaml_path))
        .extract()
}

/// The conventional unprefixed `PORT` variable set by hosting platforms
fn port_env() -> Env {
    Env::raw().only(&["port"])
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::{read_config, read_config_from_env};

    #[test]
    fn it_reads_defaults_without_a_file() {
        figment::Jail::expect_with(|_jail| {
            let config = read_config_from_env()?;

            assert_eq!(config.port, 4000);
            assert_eq!(config.schema, PathBuf::from("schema.graphql"));
            Ok(())
        });
    }

    #[test]
    fn it_reads_the_port_variable() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PORT", "8080");

            let config = read_config_from_env()?;

            assert_eq!(config.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn it_prioritizes_env_vars() {
        let config = r#"
            port: 5000
            schema: from_file.graphql
        "#;

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;
            jail.set_env("PORT", "6000");
            jail.set_env("GRAPHQL_MOCK_SCHEMA", "from_env.graphql");

            let config = read_config(path)?;

            assert_eq!(config.port, 6000);
            assert_eq!(config.schema, PathBuf::from("from_env.graphql"));
            Ok(())
        });
    }

    #[test]
    fn it_prefers_port_over_prefixed_port() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PORT", "7000");
            jail.set_env("GRAPHQL_MOCK_PORT", "7001");

            let config = read_config_from_env()?;

            assert_eq!(config.port, 7000);
            Ok(())
        });
    }

    #[test]
    fn it_extracts_nested_env() {
        let config = r#"
            mocks:
                list_length: 3
        "#;

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;
            jail.set_env("GRAPHQL_MOCK_MOCKS__LIST_LENGTH", "7");
            jail.set_env("GRAPHQL_MOCK_HEALTH_CHECK__ENABLED", "true");

            let config = read_config(path)?;

            assert_eq!(config.mocks.list_length, 7);
            assert!(config.health_check.enabled);
            Ok(())
        });
    }

    #[test]
    fn it_merges_env_and_file() {
        let config = "
            introspection: false
            drain_timeout: 10s
            cors:
                allow_any_origin: false
                origins:
                    - http://localhost:3000
        ";

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;
            jail.set_env("GRAPHQL_MOCK_LOGGING__LEVEL", "debug");

            let config = read_config(path)?;

            assert!(!config.introspection);
            assert_eq!(config.drain_timeout.as_secs(), 10);
            assert_eq!(config.cors.origins, vec!["http://localhost:3000"]);
            assert_eq!(config.logging.level, tracing::Level::DEBUG);
            Ok(())
        });
    }

    #[test]
    fn it_rejects_unknown_nested_keys() {
        let config = "
            mocks:
                list_lenght: 3
        ";

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;

            assert!(read_config(path).is_err());
            Ok(())
        });
    }
}

//! Cross Origin Resource Sharing (CORS) for the mock server
//!
//! Frontends under development usually run on another origin than the mock
//! server, so CORS is enabled by default and allows any origin. Disable it or
//! narrow the allowed origins through configuration.

use std::time::Duration;

use http::{HeaderName, HeaderValue, Method};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};

use crate::errors::ServerError;

/// Cross origin request configuration.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS support
    pub enabled: bool,

    /// Set to true to allow any origin. Defaults to true.
    pub allow_any_origin: bool,

    /// Set to true to add the `Access-Control-Allow-Credentials` header.
    pub allow_credentials: bool,

    /// The headers to allow.
    /// If this value is not set, the server will mirror the client's `Access-Control-Request-Headers`.
    pub allow_headers: Vec<String>,

    /// Which response headers should be made available to scripts running in the browser.
    pub expose_headers: Vec<String>,

    /// Allowed request methods.
    pub methods: Vec<String>,

    /// The `Access-Control-Max-Age` header value in time units
    #[serde(with = "humantime_serde", default)]
    #[schemars(with = "Option<String>", default)]
    pub max_age: Option<Duration>,

    /// The origin(s) to allow requests from when `allow_any_origin` is false.
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_any_origin: true,
            allow_credentials: false,
            allow_headers: Vec::new(),
            expose_headers: Vec::new(),
            methods: vec!["GET".into(), "POST".into(), "OPTIONS".into()],
            max_age: None,
            origins: Vec::new(),
        }
    }
}

impl CorsConfig {
    /// Creates the CORS layer, or `None` when CORS is disabled
    #[allow(clippy::result_large_err)]
    pub fn into_layer(self) -> Result<Option<CorsLayer>, ServerError> {
        if !self.enabled {
            return Ok(None);
        }
        self.validate()?;

        let mut cors = CorsLayer::new();

        if self.allow_any_origin {
            cors = cors.allow_origin(AllowOrigin::any());
        } else if !self.origins.is_empty() {
            let origins: Vec<HeaderValue> = parse_all(&self.origins, "origin", |origin| {
                HeaderValue::from_str(origin).ok()
            })?;
            cors = cors.allow_origin(AllowOrigin::list(origins));
        }

        if !self.methods.is_empty() {
            let methods: Vec<Method> = parse_all(&self.methods, "method", |method| {
                Method::from_bytes(method.as_bytes()).ok()
            })?;
            cors = cors.allow_methods(AllowMethods::list(methods));
        }

        if self.allow_headers.is_empty() {
            cors = cors.allow_headers(AllowHeaders::mirror_request());
        } else {
            let headers: Vec<HeaderName> = parse_all(&self.allow_headers, "header name", |name| {
                HeaderName::from_bytes(name.as_bytes()).ok()
            })?;
            cors = cors.allow_headers(AllowHeaders::list(headers));
        }

        if !self.expose_headers.is_empty() {
            let headers: Vec<HeaderName> =
                parse_all(&self.expose_headers, "header name", |name| {
                    HeaderName::from_bytes(name.as_bytes()).ok()
                })?;
            cors = cors.expose_headers(ExposeHeaders::list(headers));
        }

        if self.allow_credentials {
            cors = cors.allow_credentials(true);
        }

        if let Some(max_age) = self.max_age {
            cors = cors.max_age(max_age);
        }

        Ok(Some(cors))
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<(), ServerError> {
        if self.origins.iter().any(|origin| origin == "*") {
            return Err(ServerError::Cors(
                "use `allow_any_origin: true` to set `Access-Control-Allow-Origin: *`".to_string(),
            ));
        }

        // A serialized origin never ends with a slash
        if let Some(origin) = self.origins.iter().find(|origin| origin.ends_with('/')) {
            return Err(ServerError::Cors(format!(
                "origin '{origin}' cannot have a trailing slash"
            )));
        }

        if self.allow_credentials {
            let wildcard = if self.allow_any_origin {
                Some("`allow_any_origin: true`")
            } else if self.allow_headers.iter().any(|x| x == "*") {
                Some("a wildcard in `allow_headers`")
            } else if self.methods.iter().any(|x| x == "*") {
                Some("a wildcard in `methods`")
            } else if self.expose_headers.iter().any(|x| x == "*") {
                Some("a wildcard in `expose_headers`")
            } else {
                None
            };
            if let Some(wildcard) = wildcard {
                return Err(ServerError::Cors(format!(
                    "cannot combine `Access-Control-Allow-Credentials: true` with {wildcard}"
                )));
            }
        }

        Ok(())
    }
}

#[allow(clippy::result_large_err)]
fn parse_all<T>(
    values: &[String],
    kind: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ServerError> {
    values
        .iter()
        .map(|value| {
            parse(value).ok_or_else(|| ServerError::Cors(format!("{kind} '{value}' is not valid")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_message(config: CorsConfig) -> String {
        config.into_layer().err().unwrap().to_string()
    }

    #[test]
    fn test_default_config() {
        let config = CorsConfig::default();
        assert!(config.enabled);
        assert!(config.allow_any_origin);
        assert!(!config.allow_credentials);
        assert!(config.origins.is_empty());
        assert_eq!(config.methods, vec!["GET", "POST", "OPTIONS"]);
        assert!(config.allow_headers.is_empty());
        assert!(config.expose_headers.is_empty());
        assert!(config.max_age.is_none());
        assert!(config.into_layer().unwrap().is_some());
    }

    #[test]
    fn test_disabled_has_no_layer() {
        let config = CorsConfig {
            enabled: false,
            ..Default::default()
        };

        assert!(config.into_layer().unwrap().is_none());
    }

    #[test]
    fn test_valid_configuration() {
        let config = CorsConfig {
            enabled: true,
            allow_any_origin: false,
            allow_credentials: true,
            allow_headers: vec!["content-type".into(), "authorization".into()],
            expose_headers: vec!["x-custom-header".into()],
            methods: vec!["GET".into(), "POST".into()],
            max_age: Some(Duration::from_secs(3600)),
            origins: vec!["http://localhost:3000".into()],
        };

        assert!(config.into_layer().unwrap().is_some());
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        let config = CorsConfig {
            allow_any_origin: false,
            origins: vec!["*".into()],
            ..Default::default()
        };

        insta::assert_snapshot!(
            error_message(config),
            @"Invalid CORS configuration: use `allow_any_origin: true` to set `Access-Control-Allow-Origin: *`"
        );
    }

    #[test]
    fn test_trailing_slash_origin_rejected() {
        let config = CorsConfig {
            allow_any_origin: false,
            origins: vec!["http://localhost:3000/".into()],
            ..Default::default()
        };

        insta::assert_snapshot!(
            error_message(config),
            @"Invalid CORS configuration: origin 'http://localhost:3000/' cannot have a trailing slash"
        );
    }

    #[test]
    fn test_credentials_with_any_origin_rejected() {
        let config = CorsConfig {
            allow_credentials: true,
            ..Default::default()
        };

        insta::assert_snapshot!(
            error_message(config),
            @"Invalid CORS configuration: cannot combine `Access-Control-Allow-Credentials: true` with `allow_any_origin: true`"
        );
    }

    #[test]
    fn test_credentials_with_wildcard_methods_rejected() {
        let config = CorsConfig {
            allow_any_origin: false,
            allow_credentials: true,
            methods: vec!["*".into()],
            ..Default::default()
        };

        assert!(error_message(config).contains("a wildcard in `methods`"));
    }

    #[test]
    fn test_invalid_method_rejected() {
        let config = CorsConfig {
            methods: vec!["INVALID\nMETHOD".into()],
            ..Default::default()
        };

        assert!(error_message(config).contains("method 'INVALID\nMETHOD' is not valid"));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config = CorsConfig {
            allow_headers: vec!["invalid\nheader".into()],
            ..Default::default()
        };

        assert!(error_message(config).contains("header name 'invalid\nheader' is not valid"));
    }
}

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::{
    errors::ServerError,
    graphql::{self, AppState, endpoint_url},
    health::{HealthCheck, health_endpoint},
    mock::{MockSchema, ScalarMocks},
    schema::build_schema,
};

use super::{Config, Serving};

pub(super) struct Building {
    pub(super) config: Config,
    pub(super) sdl: String,
}

impl Building {
    /// Build the mocked schema, bind the listener and start serving
    pub(super) async fn serve(self) -> Result<Serving, ServerError> {
        let Building { config, sdl } = self;

        let schema = build_schema(&sdl, &config.schema_path)?;
        debug!("Received schema:\n{}", schema);

        let scalars = match &config.custom_scalar_map {
            Some(custom_scalar_map) => ScalarMocks::default().with_overrides(custom_scalar_map),
            None => ScalarMocks::default(),
        };
        let mock = MockSchema::builder(&schema)
            .scalars(scalars)
            .list_length(config.list_length)
            .introspection(config.introspection)
            .build()?;
        let cors = config.cors.into_layer()?;
        let health_check = config
            .health_check
            .enabled
            .then(|| HealthCheck::new(config.health_check));

        let address = SocketAddr::new(config.address, config.port);
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;
        let address = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { address, source })?;
        let endpoint = endpoint_url(address)?;

        let draining = CancellationToken::new();
        let mut router = graphql::router(AppState {
            schema: mock,
            endpoint: endpoint.clone(),
            draining: draining.clone(),
        });
        if let Some(health_check) = &health_check {
            router = router.merge(
                Router::new()
                    .route(&health_check.config().path, get(health_endpoint))
                    .with_state(health_check.clone()),
            );
        }
        router = router.layer(TraceLayer::new_for_http());
        if let Some(cors) = cors {
            router = router.layer(cors);
        }

        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(draining.clone().cancelled_owned());
        let server = tokio::spawn(async move { serve.await });

        info!(%address, %endpoint, introspection = config.introspection, "GraphQL mock server ready");
        info!("CSRF prevention is not applied, serve mocks to trusted clients only");

        Ok(Serving {
            address,
            server,
            draining,
            health_check,
            drain_timeout: config.drain_timeout,
        })
    }
}

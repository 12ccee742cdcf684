use std::{future::Future, net::IpAddr, path::PathBuf, pin::pin, time::Duration};

use crate::{
    cors::CorsConfig, custom_scalar_map::CustomScalarMap, errors::ServerError,
    health::HealthCheckConfig,
};

use super::Server;

mod building;
mod draining;
mod idle;
mod loading;
mod serving;

use building::Building;
use draining::Draining;
use idle::Idle;
use loading::Loading;
use serving::Serving;

pub(super) struct StateMachine {}

/// Common configuration options for the states
#[derive(Debug)]
struct Config {
    schema_path: PathBuf,
    address: IpAddr,
    port: u16,
    introspection: bool,
    list_length: usize,
    custom_scalar_map: Option<CustomScalarMap>,
    cors: CorsConfig,
    health_check: HealthCheckConfig,
    drain_timeout: Duration,
}

impl From<Server> for Config {
    fn from(server: Server) -> Self {
        Self {
            schema_path: server.schema_path,
            address: server.address,
            port: server.port,
            introspection: server.introspection,
            list_length: server.list_length,
            custom_scalar_map: server.custom_scalar_map,
            cors: server.cors,
            health_check: server.health_check,
            drain_timeout: server.drain_timeout,
        }
    }
}

impl StateMachine {
    pub(crate) async fn start(
        self,
        server: Server,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<(), ServerError> {
        let mut shutdown = pin!(shutdown);
        let mut state = State::Idle(Idle {
            config: server.into(),
        });

        loop {
            state = match state {
                State::Idle(idle) => idle.start().into(),
                State::Loading(loading) => loading.load().into(),
                State::Building(building) => building.serve().await.into(),
                State::Serving(serving) => serving.run_until(shutdown.as_mut()).await.into(),
                State::Draining(draining) => draining.stop().await.into(),
                State::Stopped => return Ok(()),
                State::Failed(error) => return Err(error),
            };
        }
    }
}

#[allow(clippy::large_enum_variant)]
enum State {
    Idle(Idle),
    Loading(Loading),
    Building(Building),
    Serving(Serving),
    Draining(Draining),
    Stopped,
    Failed(ServerError),
}

impl From<Loading> for State {
    fn from(loading: Loading) -> Self {
        State::Loading(loading)
    }
}

impl From<Result<Building, ServerError>> for State {
    fn from(result: Result<Building, ServerError>) -> Self {
        match result {
            Ok(building) => State::Building(building),
            Err(error) => State::Failed(error),
        }
    }
}

impl From<Result<Serving, ServerError>> for State {
    fn from(result: Result<Serving, ServerError>) -> Self {
        match result {
            Ok(serving) => State::Serving(serving),
            Err(error) => State::Failed(error),
        }
    }
}

impl From<Result<Draining, ServerError>> for State {
    fn from(result: Result<Draining, ServerError>) -> Self {
        match result {
            Ok(draining) => State::Draining(draining),
            Err(error) => State::Failed(error),
        }
    }
}

impl From<Result<(), ServerError>> for State {
    fn from(result: Result<(), ServerError>) -> Self {
        match result {
            Ok(()) => State::Stopped,
            Err(error) => State::Failed(error),
        }
    }
}

//! Mocked executable schemas
//!
//! A [`MockSchema`] serves every operation of a GraphQL schema with
//! generated values whose shape always matches the declared types.

mod scalars;
mod strategy;
mod types;

use std::sync::Arc;

use apollo_compiler::{Schema, ast::OperationType, schema::ExtendedType, validation::Valid};
use async_graphql::dynamic;
use bon::bon;
use tracing::{debug, warn};

use crate::errors::ServerError;

pub use scalars::{ID_LENGTH, MOCK_STRING, ScalarMock, ScalarMocks};
pub use strategy::MockStrategy;
use strategy::MockSettings;
use types::TypeBuilder;

/// Number of elements generated for list fields
pub const DEFAULT_LIST_LENGTH: usize = 2;

/// An executable schema whose resolvers return mocked values
#[derive(Clone)]
pub struct MockSchema {
    schema: dynamic::Schema,
}

#[bon]
impl MockSchema {
    #[builder]
    #[allow(clippy::result_large_err)]
    pub fn new(
        #[builder(start_fn)] schema: &Valid<Schema>,
        #[builder(default)] scalars: ScalarMocks,
        #[builder(default = DEFAULT_LIST_LENGTH)] list_length: usize,
        #[builder(default = true)] introspection: bool,
    ) -> Result<Self, ServerError> {
        let query = schema
            .root_operation(OperationType::Query)
            .ok_or_else(|| ServerError::MockSchema("schema has no query root".to_string()))?;
        let mutation = schema.root_operation(OperationType::Mutation);
        let subscription = schema.root_operation(OperationType::Subscription);
        if let Some(subscription) = subscription {
            warn!(root = %subscription, "Subscriptions are not served, skipping root type");
        }

        let implementers = schema.implementers_map();
        for (name, _) in schema
            .types
            .iter()
            .filter(|(_, t)| matches!(t, ExtendedType::Interface(_)))
        {
            if implementers
                .get(name)
                .is_none_or(|implementers| implementers.objects.is_empty())
            {
                return Err(ServerError::MockSchema(format!(
                    "interface {name} has no implementing object type to mock"
                )));
            }
        }

        let builder = TypeBuilder {
            schema,
            implementers,
            settings: Arc::new(MockSettings {
                scalars,
                list_length,
            }),
        };

        let mut dynamic = dynamic::Schema::build(
            query.as_str(),
            mutation.map(|mutation| mutation.as_str()),
            None,
        );
        for (name, r#type) in schema.types.iter().filter(|(_, t)| !t.is_built_in()) {
            if Some(name) == subscription {
                continue;
            }
            dynamic = match r#type {
                ExtendedType::Object(object) => dynamic.register(builder.object(name, object)),
                ExtendedType::Interface(interface) => {
                    dynamic.register(builder.interface(name, interface))
                }
                ExtendedType::Union(union) => dynamic.register(types::union(name, union)),
                ExtendedType::Enum(r#enum) => dynamic.register(types::r#enum(name, r#enum)),
                ExtendedType::InputObject(input) => {
                    dynamic.register(types::input_object(name, input))
                }
                ExtendedType::Scalar(scalar) => {
                    dynamic.register(types::scalar(name, scalar.description.as_ref()))
                }
            };
        }
        if !introspection {
            dynamic = dynamic.disable_introspection();
        }

        let schema = dynamic
            .finish()
            .map_err(|error| ServerError::MockSchema(error.to_string()))?;
        debug!("Mocked schema:\n{}", schema.sdl());

        Ok(Self { schema })
    }
}

impl MockSchema {
    /// Execute a GraphQL request against the mocked resolvers
    pub async fn execute(
        &self,
        request: impl Into<async_graphql::Request>,
    ) -> async_graphql::Response {
        self.schema.execute(request).await
    }

    /// The SDL of the mocked schema
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

impl std::fmt::Debug for MockSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSchema").finish_non_exhaustive()
    }
}

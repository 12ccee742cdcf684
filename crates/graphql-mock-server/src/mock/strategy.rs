//! Per-field mock strategies
//!
//! Every output field's declared type is resolved once, while the mocked
//! schema is built, into a [`MockStrategy`]. Resolvers then only walk the
//! strategy to produce a value and never look at the schema again.

use apollo_compiler::{
    Name, Schema,
    collections::HashMap,
    ast::Type,
    schema::{ExtendedType, Implementers},
};
use async_graphql::{Name as ValueName, Value, dynamic::FieldValue};
use rand::seq::IndexedRandom as _;

use super::scalars::ScalarMocks;

/// Marker for a mocked object; its fields are mocked by their own resolvers
pub(crate) struct MockObject;

/// How to generate a value for one GraphQL output type
#[derive(Debug, Clone, PartialEq)]
pub enum MockStrategy {
    /// A leaf scalar, generated by the scalar mock of that name
    Scalar(String),

    /// One of the declared enum values
    Enum(Vec<String>),

    /// A concrete object type
    Object(String),

    /// An interface or union, mocked as one of its possible object types
    Abstract(Vec<String>),

    /// A list of mocked elements
    List(Box<MockStrategy>),

    /// A non-null wrapper; mocks never produce null so this only marks intent
    NonNull(Box<MockStrategy>),
}

/// Settings shared by every resolver of a mocked schema
#[derive(Debug, Clone)]
pub(crate) struct MockSettings {
    pub(crate) scalars: ScalarMocks,
    pub(crate) list_length: usize,
}

impl MockStrategy {
    /// Resolve the strategy for a declared field type
    pub fn for_type(
        r#type: &Type,
        schema: &Schema,
        implementers: &HashMap<Name, Implementers>,
    ) -> Self {
        match r#type {
            Type::Named(name) => Self::for_named(name, schema, implementers),
            Type::NonNullNamed(name) => {
                Self::NonNull(Box::new(Self::for_named(name, schema, implementers)))
            }
            Type::List(inner) => {
                Self::List(Box::new(Self::for_type(inner, schema, implementers)))
            }
            Type::NonNullList(inner) => Self::NonNull(Box::new(Self::List(Box::new(
                Self::for_type(inner, schema, implementers),
            )))),
        }
    }

    fn for_named(
        name: &Name,
        schema: &Schema,
        implementers: &HashMap<Name, Implementers>,
    ) -> Self {
        match schema.types.get(name) {
            Some(ExtendedType::Enum(r#enum)) => {
                Self::Enum(r#enum.values.keys().map(Name::to_string).collect())
            }
            Some(ExtendedType::Object(_)) => Self::Object(name.to_string()),
            Some(ExtendedType::Interface(_)) => Self::Abstract(
                implementers
                    .get(name)
                    .map(|implementers| implementers.objects.iter().map(Name::to_string).collect())
                    .unwrap_or_default(),
            ),
            Some(ExtendedType::Union(union)) => Self::Abstract(
                union
                    .members
                    .iter()
                    .map(|member| member.name.to_string())
                    .collect(),
            ),
            // Input objects never appear in output position of a valid schema
            Some(ExtendedType::Scalar(_) | ExtendedType::InputObject(_)) | None => {
                Self::Scalar(name.to_string())
            }
        }
    }

    /// Generate a fresh value following this strategy
    pub(crate) fn generate<'a>(&self, settings: &MockSettings) -> FieldValue<'a> {
        match self {
            Self::Scalar(name) => FieldValue::value(settings.scalars.generate(name)),
            Self::Enum(values) => values
                .choose(&mut rand::rng())
                .map(|value| FieldValue::value(Value::Enum(ValueName::new(value))))
                .unwrap_or(FieldValue::NULL),
            Self::Object(_) => FieldValue::owned_any(MockObject),
            Self::Abstract(types) => types
                .choose(&mut rand::rng())
                .map(|r#type| FieldValue::owned_any(MockObject).with_type(r#type.clone()))
                .unwrap_or(FieldValue::NULL),
            Self::List(inner) => FieldValue::list(
                (0..settings.list_length).map(|_| inner.generate(settings)),
            ),
            Self::NonNull(inner) => inner.generate(settings),
        }
    }
}

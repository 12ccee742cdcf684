//! Value generators for scalar types

use std::{collections::HashMap, fmt, sync::Arc};

use async_graphql::{Number, Value};
use rand::{Rng as _, seq::IndexedRandom as _};
use tracing::warn;

use crate::custom_scalar_map::CustomScalarMap;

/// Placeholder produced for `String` fields and for custom scalars without a mock
pub const MOCK_STRING: &str = "Mock String";

/// Length of generated `ID` values
pub const ID_LENGTH: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh value every time it is called
pub type ScalarMock = Arc<dyn Fn() -> Value + Send + Sync>;

/// Scalar generators keyed by scalar type name
#[derive(Clone)]
pub struct ScalarMocks {
    mocks: HashMap<String, ScalarMock>,
}

impl ScalarMocks {
    /// Register (or replace) the generator for a scalar
    pub fn with(
        mut self,
        name: impl Into<String>,
        mock: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.mocks.insert(name.into(), Arc::new(mock));
        self
    }

    /// Replace generators with the fixed values of a custom scalar map
    pub fn with_overrides(self, overrides: &CustomScalarMap) -> Self {
        overrides
            .iter()
            .fold(self, |mocks, (name, json)| match Value::from_json(json.clone()) {
                Ok(value) => mocks.with(name.clone(), move || value.clone()),
                Err(error) => {
                    warn!(scalar = %name, %error, "Ignoring unusable custom scalar value");
                    mocks
                }
            })
    }

    /// Produce a value for the named scalar, falling back to the `String` mock
    pub fn generate(&self, name: &str) -> Value {
        match self.mocks.get(name).or_else(|| self.mocks.get("String")) {
            Some(mock) => mock(),
            None => Value::String(MOCK_STRING.to_string()),
        }
    }
}

impl Default for ScalarMocks {
    fn default() -> Self {
        Self {
            mocks: HashMap::new(),
        }
        .with("Int", || {
            Value::Number(Number::from(rand::rng().random_range(0..100_i32)))
        })
        .with("Float", || {
            Number::from_f64(rand::rng().random_range(0.0..100.0))
                .map(Value::Number)
                .unwrap_or(Value::Null)
        })
        .with("String", || Value::String(MOCK_STRING.to_string()))
        .with("Boolean", || Value::Boolean(rand::rng().random()))
        .with("ID", || Value::String(random_id()))
    }
}

impl fmt::Debug for ScalarMocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.mocks.keys().collect();
        names.sort();
        f.debug_struct("ScalarMocks").field("mocks", &names).finish()
    }
}

fn random_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .filter_map(|_| ID_ALPHABET.choose(&mut rng))
        .map(|&byte| char::from(byte))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use rstest::rstest;

    use super::*;

    fn as_i64(value: Value) -> i64 {
        match value {
            Value::Number(number) => number.as_i64().unwrap(),
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn int_is_in_range() {
        let mocks = ScalarMocks::default();

        for _ in 0..1_000 {
            let value = as_i64(mocks.generate("Int"));
            assert!((0..100).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn id_is_short_and_alphanumeric() {
        let mocks = ScalarMocks::default();

        for _ in 0..100 {
            let Value::String(id) = mocks.generate("ID") else {
                panic!("ID should be a string");
            };
            assert_eq!(id.len(), ID_LENGTH);
            assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[rstest]
    #[case("String")]
    #[case("DateTime")]
    #[case("JSON")]
    fn strings_and_unknown_scalars_use_the_placeholder(#[case] scalar: &str) {
        assert_eq!(
            ScalarMocks::default().generate(scalar),
            Value::String(MOCK_STRING.to_string())
        );
    }

    #[test]
    fn boolean_and_float_have_the_right_shape() {
        let mocks = ScalarMocks::default();

        assert!(matches!(mocks.generate("Boolean"), Value::Boolean(_)));
        let Value::Number(float) = mocks.generate("Float") else {
            panic!("Float should be a number");
        };
        assert!((0.0..100.0).contains(&float.as_f64().unwrap()));
    }

    #[test]
    fn custom_generators_replace_defaults() {
        let mocks = ScalarMocks::default().with("Int", || Value::Number(Number::from(42)));

        assert_eq!(as_i64(mocks.generate("Int")), 42);
    }

    #[test]
    fn overrides_are_constant() {
        let overrides =
            CustomScalarMap::from_str(r#"{ "DateTime": "2024-01-01T00:00:00Z", "Int": 7 }"#)
                .unwrap();
        let mocks = ScalarMocks::default().with_overrides(&overrides);

        assert_eq!(
            mocks.generate("DateTime"),
            Value::String("2024-01-01T00:00:00Z".to_string())
        );
        assert_eq!(as_i64(mocks.generate("Int")), 7);
        assert_eq!(
            mocks.generate("String"),
            Value::String(MOCK_STRING.to_string())
        );
    }
}

use crate::errors::ServerError;
use std::{collections::HashMap, path::PathBuf, str::FromStr};

/// Fixed mock values for named scalars, keyed by scalar type name
///
/// Loaded from a JSON object such as `{"DateTime": "2024-01-01T00:00:00Z"}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomScalarMap(HashMap<String, serde_json::Value>);

impl CustomScalarMap {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

impl FromStr for CustomScalarMap {
    type Err = ServerError;

    fn from_str(custom_scalars: &str) -> Result<Self, Self::Err> {
        let parsed: serde_json::Value =
            serde_json::from_str(custom_scalars).map_err(ServerError::CustomScalarConfig)?;

        match parsed {
            serde_json::Value::Object(map) => Ok(CustomScalarMap(map.into_iter().collect())),
            other => Err(ServerError::CustomScalarShape(other)),
        }
    }
}

impl TryFrom<&PathBuf> for CustomScalarMap {
    type Error = ServerError;

    fn try_from(file_path_buf: &PathBuf) -> Result<Self, Self::Error> {
        let custom_scalars_path = file_path_buf.as_path();
        tracing::debug!(custom_scalars=?custom_scalars_path, "Loading custom_scalars config");
        let custom_scalars = std::fs::read_to_string(custom_scalars_path)?;
        CustomScalarMap::from_str(custom_scalars.as_str())
    }
}

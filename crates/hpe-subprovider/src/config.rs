//! Access to a sub-provider's block inside the provider configuration

use crate::error::{ProviderError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// View of one named list-nested block of the provider configuration
///
/// An absent or `null` block reads as zero elements.
#[derive(Debug, Clone, Copy)]
pub struct BlockAccessor<'a> {
    name: &'a str,
    config: &'a Value,
}

impl<'a> BlockAccessor<'a> {
    pub fn new(name: &'a str, config: &'a Value) -> Self {
        Self { name, config }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Raw block elements
    pub fn elements(&self) -> Result<&'a [Value]> {
        match self.config.get(self.name) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(ProviderError::InvalidConfig(format!(
                "block '{}' must be a list, got: {}",
                self.name, other
            ))),
        }
    }

    /// Decode every block element into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.elements()?.iter().map(decode).collect()
    }

    /// Decode the block as an optional single element
    ///
    /// More than one element is a cardinality error.
    pub fn decode_single<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let elements = self.elements()?;
        match elements {
            [] => Ok(None),
            [only] => decode(only).map(Some),
            _ => Err(ProviderError::BlockCardinality {
                block: self.name.to_string(),
                len: elements.len(),
            }),
        }
    }
}

/// Decode a configuration, plan or state object into `T`
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(T::deserialize(value)?)
}

//! Morpheus data sources
//!
//! Every data source looks its object up by `id` when set, otherwise by an
//! exact `name` match over the filtered list endpoint.

pub mod cloud;
pub mod environment;
pub mod group;

use crate::api::Named;

pub const ERROR_NO_VALID_SEARCH_TERMS: &str = "no valid search terms - an id or name is required";

/// Search term taken from the data source configuration
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lookup {
    Id(i64),
    Name(String),
}

impl Lookup {
    /// `id` wins when both are set
    pub(crate) fn from_terms(id: Option<i64>, name: Option<&str>) -> Result<Self, String> {
        match (id, name) {
            (Some(id), _) => Ok(Lookup::Id(id)),
            (None, Some(name)) => Ok(Lookup::Name(name.to_string())),
            (None, None) => Err(ERROR_NO_VALID_SEARCH_TERMS.to_string()),
        }
    }
}

/// Error texts of one object kind
pub(crate) struct LookupErrors {
    pub not_found: &'static str,
    pub multiple: &'static str,
}

/// Keep only exact name matches; exactly one must remain
pub(crate) fn single_by_name<T: Named>(
    items: Vec<T>,
    name: &str,
    errors: &LookupErrors,
) -> Result<T, String> {
    let mut matches: Vec<T> = items
        .into_iter()
        .filter(|item| item.name() == Some(name))
        .collect();

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(errors.not_found.to_string()),
        _ => Err(errors.multiple.to_string()),
    }
}

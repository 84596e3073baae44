//! GraphQL response decoding.
//!
//! Reverses the aliasing done by [`QueryBuilder`](crate::QueryBuilder): the
//! flat `data` mapping is walked by position, using the list lengths of the
//! config the query was built from.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    config::Config,
    data::{ContributionRecord, Data, ProjectRecord, UserRecord},
    error::{CoreError, Result},
    query::{contribution_alias, project_alias},
};

/// Raw response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
}

/// An error reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub locations: Vec<Value>,
}

/// Number of aliased items the response must contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expected {
    pub projects: usize,
    pub contributions: usize,
}

impl From<&Config> for Expected {
    fn from(config: &Config) -> Self {
        Self {
            projects: config.projects.len(),
            contributions: config.contributions.len(),
        }
    }
}

/// Decodes response bytes into [`Data`].
#[derive(Debug, Clone, Copy)]
pub struct ResponseDecoder {
    expected: Expected,
}

impl ResponseDecoder {
    /// Create a decoder expecting the given item counts.
    #[must_use]
    pub fn new(expected: Expected) -> Self {
        Self { expected }
    }

    /// Create a decoder for responses to queries built from `config`.
    #[must_use]
    pub fn for_config(config: &Config) -> Self {
        Self::new(Expected::from(config))
    }

    /// Decode a response body.
    pub fn decode(&self, body: &[u8]) -> Result<Data> {
        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|e| CoreError::transport(format!("could not parse response: {e}")))?;

        let errors = envelope.errors.unwrap_or_default();
        let Some(data) = envelope.data else {
            let hint = errors
                .first()
                .map(|e| format!(" (first error: {})", e.message))
                .unwrap_or_default();
            return Err(CoreError::transport(format!(
                "response carries no data{hint}"
            )));
        };

        if let Some(first) = errors.first() {
            return Err(CoreError::Api {
                message: first.message.clone(),
                count: errors.len(),
            });
        }

        let user: UserRecord = decode_key(&data, "user")?;

        let projects = (0..self.expected.projects)
            .map(|index| decode_key::<ProjectRecord>(&data, &project_alias(index)))
            .collect::<Result<Vec<_>>>()?;

        let contributions = (0..self.expected.contributions)
            .map(|index| decode_key::<ContributionRecord>(&data, &contribution_alias(index)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            user = %user.login,
            projects = projects.len(),
            contributions = contributions.len(),
            "decoded response"
        );

        Ok(Data {
            user,
            projects,
            contributions,
            creations: Vec::new(),
        })
    }
}

/// Decode the fragment stored under `key`.
fn decode_key<T: DeserializeOwned>(data: &Map<String, Value>, key: &str) -> Result<T> {
    let value = data
        .get(key)
        .ok_or_else(|| CoreError::decode(key, ".", "missing from response"))?;

    serde_path_to_error::deserialize(value)
        .map_err(|e| CoreError::decode(key, e.path().to_string(), e.inner().to_string()))
}

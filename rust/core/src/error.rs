// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model queries.

use crate::element::ElementId;

/// Result type alias for model query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a model host while answering queries.
///
/// The systems pipeline never recovers from these: a failed query aborts the
/// whole build and is handed back to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced element does not exist in the model.
    #[error("element not found: {0}")]
    UnknownElement(ElementId),

    /// The object tree has no root element.
    #[error("object tree has no root element")]
    MissingRoot,

    /// The host rejected or failed a search/property query.
    #[error("query failed: {0}")]
    Query(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

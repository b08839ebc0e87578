use hashbrown::HashMap;
use jiff::Timestamp;
use serde::Serialize;

use crate::err::DeserializationResult;

/// One structured log event produced by the deserializer.
///
/// A record starts out empty and is populated field-by-field as matching
/// attributes and child elements are encountered in document order. Fields
/// absent from the input keep their default value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LoggingRecord {
    pub logger_name: String,
    pub domain: String,
    pub user_name: String,
    pub thread_name: String,
    /// Vendor-defined severity vocabulary (e.g. `Info`, `Warn`), stored
    /// verbatim and not validated.
    pub level: String,
    pub timestamp: Option<Timestamp>,
    pub message: String,
    pub exception: Option<String>,
    /// Application-defined properties. `Some` whenever the input carried a
    /// properties block, even an empty one; `None` when it did not.
    pub properties: Option<HashMap<String, String>>,
    /// Derived from the well-known `log4japp` property after the
    /// properties block has been read. Empty when the property is absent.
    pub application_name: String,
}

impl LoggingRecord {
    /// Serializes the record as a JSON object string.
    pub fn to_json(&self) -> DeserializationResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

use std::num::ParseIntError;

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

pub type DeserializationResult<T> = std::result::Result<T, DeserializationError>;

#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("malformed XML near byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("malformed attribute syntax: {source}")]
    Attribute {
        #[from]
        source: AttrError,
    },

    #[error("`timestamp` attribute `{text}` is not a valid base-10 integer")]
    InvalidTimestamp {
        text: String,
        source: ParseIntError,
    },

    #[error("binary timestamp tick value {ticks} is outside the representable range")]
    TimestampOutOfRange { ticks: i64 },

    #[error("`exception` element must contain a single text node, found {found}")]
    MalformedExceptionBlock { found: &'static str },

    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("failed to serialize record to JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

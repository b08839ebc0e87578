//! A parser for NLog/log4j XML-encoded log event streams.
//!
//! The input is a string of zero or more sibling `<log4j:event>`-style
//! elements, each describing one log event through attributes (`logger`,
//! `level`, `timestamp`, ...) and optional child elements (`message`,
//! `properties`, `exception`). [`NLogDeserializer::deserialize`] produces
//! one [`LoggingRecord`] per element, in document order, ignoring unknown
//! fields and failing the whole call on malformed input.

pub mod deserializer;
mod dispatch;
pub mod err;
pub mod record;
pub mod timestamp;

pub use deserializer::NLogDeserializer;
pub use err::{DeserializationError, DeserializationResult};
pub use record::LoggingRecord;

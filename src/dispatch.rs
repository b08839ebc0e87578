//! The field dispatch table: a static, case-insensitive mapping from a
//! recognized attribute or child-element name to the handler that reads its
//! value into a [`LoggingRecord`].

use std::sync::LazyLock;

use hashbrown::HashMap;

use crate::err::{DeserializationError, DeserializationResult};
use crate::record::LoggingRecord;
use crate::timestamp;

/// How a recognized field name consumes the cursor.
pub(crate) enum Handler {
    /// The value is the text of an attribute on the event element.
    Attr(fn(&mut LoggingRecord, &str) -> DeserializationResult<()>),
    /// The value lives in a child element of the event element.
    Element(ElementKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    /// Element text content becomes the message.
    Message,
    /// A flat block of key/value child nodes.
    Properties,
    /// A single text payload.
    Exception,
}

static FIELD_HANDLERS: LazyLock<HashMap<&'static str, Handler>> = LazyLock::new(|| {
    HashMap::from([
        (
            "logger",
            Handler::Attr(|record, value| {
                record.logger_name = value.to_owned();
                Ok(())
            }),
        ),
        (
            "domain",
            Handler::Attr(|record, value| {
                record.domain = value.to_owned();
                Ok(())
            }),
        ),
        (
            "username",
            Handler::Attr(|record, value| {
                record.user_name = value.to_owned();
                Ok(())
            }),
        ),
        (
            "thread",
            Handler::Attr(|record, value| {
                record.thread_name = value.to_owned();
                Ok(())
            }),
        ),
        (
            "level",
            Handler::Attr(|record, value| {
                record.level = value.to_owned();
                Ok(())
            }),
        ),
        (
            "timestamp",
            Handler::Attr(|record, value| {
                let raw = value.parse::<i64>().map_err(|source| {
                    DeserializationError::InvalidTimestamp {
                        text: value.to_owned(),
                        source,
                    }
                })?;
                record.timestamp = Some(timestamp::from_binary(raw)?);
                Ok(())
            }),
        ),
        ("message", Handler::Element(ElementKind::Message)),
        ("properties", Handler::Element(ElementKind::Properties)),
        ("exception", Handler::Element(ElementKind::Exception)),
    ])
});

/// Case-insensitive lookup. A miss is the normal outcome for names the
/// format does not recognize.
pub(crate) fn find(name: &[u8]) -> Option<&'static Handler> {
    let name = std::str::from_utf8(name).ok()?;
    FIELD_HANDLERS.get(name.to_ascii_lowercase().as_str())
}

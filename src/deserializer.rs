//! The streaming NLog/log4j XML deserialization engine.
//!
//! A single forward-only [`quick_xml::Reader`] is the only cursor over the
//! input. Each top-level element becomes one [`LoggingRecord`]; unknown
//! attribute and element names are skipped, structural anomalies abort the
//! whole call.

use hashbrown::HashMap;
use log::{debug, trace};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::dispatch::{self, ElementKind, Handler};
use crate::err::{DeserializationError, DeserializationResult};
use crate::record::LoggingRecord;

/// Well-known property carrying the emitting application's name.
const APPLICATION_NAME_KEY: &str = "log4japp";

/// Deserializer for the NLog `Log4JXmlEventLayout` wire format, which is
/// also emitted by log4j/log4net network appenders.
///
/// Stateless; the only shared state is the process-wide dispatch table, so
/// concurrent calls need no synchronization.
pub struct NLogDeserializer;

impl NLogDeserializer {
    /// Format tag used by host-side format selection.
    pub const FORMAT_NAME: &'static str = "NLog";

    /// Deserializes a string of zero or more sibling log-event elements
    /// into records, in document order.
    ///
    /// The input may use the `log4j` (`urn:log4j`) and `nlog` (`urn:nlog`)
    /// namespace prefixes; dispatch happens on local names and the
    /// namespace is not otherwise interpreted.
    pub fn deserialize(log: &str) -> DeserializationResult<Vec<LoggingRecord>> {
        let mut reader = Reader::from_str(log);
        // Bare whitespace between sibling records is never content.
        reader.config_mut().trim_text(true);

        let mut records = Vec::new();

        loop {
            match read_event(&mut reader)? {
                Event::Start(start) => records.push(read_record(&mut reader, &start, false)?),
                Event::Empty(start) => records.push(read_record(&mut reader, &start, true)?),
                Event::Eof => break,
                // Comments, processing instructions and declarations
                // between records carry no event data.
                _ => continue,
            }
        }

        debug!("deserialized {} record(s)", records.len());

        Ok(records)
    }
}

fn read_event<'a>(reader: &mut Reader<&'a [u8]>) -> DeserializationResult<Event<'a>> {
    reader.read_event().map_err(|source| xml_err(reader, source))
}

fn xml_err(reader: &Reader<&[u8]>, source: quick_xml::Error) -> DeserializationError {
    DeserializationError::Xml {
        position: reader.error_position(),
        source,
    }
}

/// Reads one top-level log-event element into a record. The cursor has
/// already consumed the element's start tag; `is_empty` marks a
/// self-closing element with no content to iterate.
fn read_record(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    is_empty: bool,
) -> DeserializationResult<LoggingRecord> {
    let mut record = LoggingRecord::default();

    for attr in start.attributes() {
        let attr = attr?;
        // Names registered for child elements (and unknown names) are
        // ignored in attribute position.
        let Some(Handler::Attr(assign)) = dispatch::find(attr.key.local_name().as_ref()) else {
            continue;
        };
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|source| xml_err(reader, source.into()))?;
        trace!(
            "assigning attribute `{}`",
            String::from_utf8_lossy(attr.key.as_ref())
        );
        assign(&mut record, &value)?;
    }

    if !is_empty {
        loop {
            match read_event(reader)? {
                Event::Start(child) => match dispatch::find(child.name().local_name().as_ref()) {
                    Some(Handler::Element(kind)) => {
                        read_child_element(reader, &child, *kind, &mut record)?
                    }
                    _ => {
                        debug!(
                            "skipping unrecognized element `{}`",
                            String::from_utf8_lossy(child.name().as_ref())
                        );
                        reader
                            .read_to_end(child.name())
                            .map_err(|source| xml_err(reader, source))?;
                    }
                },
                Event::Empty(child) => {
                    if let Some(Handler::Element(kind)) =
                        dispatch::find(child.name().local_name().as_ref())
                    {
                        read_empty_child_element(*kind, &mut record)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(DeserializationError::UnexpectedEof {
                        context: "a log event element",
                    });
                }
                // Stray text or CDATA between recognized children carries
                // no field.
                _ => continue,
            }
        }
    }

    // The application name is derived once the properties block has been
    // fully read; a record without one keeps the empty default.
    if let Some(properties) = &record.properties {
        record.application_name = properties
            .get(APPLICATION_NAME_KEY)
            .cloned()
            .unwrap_or_default();
    }

    Ok(record)
}

fn read_child_element(
    reader: &mut Reader<&[u8]>,
    child: &BytesStart<'_>,
    kind: ElementKind,
    record: &mut LoggingRecord,
) -> DeserializationResult<()> {
    match kind {
        ElementKind::Message => {
            // Element content, not an attribute; nested markup is read as
            // plain content.
            let raw = reader
                .read_text(child.name())
                .map_err(|source| xml_err(reader, source))?;
            // Content that does not parse as entities stays verbatim.
            let unescaped = if raw.contains('<') {
                None
            } else {
                quick_xml::escape::unescape(&raw)
                    .map(|text| text.into_owned())
                    .ok()
            };
            record.message = unescaped.unwrap_or_else(|| raw.into_owned());
        }
        ElementKind::Properties => read_properties(reader, record)?,
        ElementKind::Exception => read_exception(reader, record)?,
    }
    Ok(())
}

fn read_empty_child_element(
    kind: ElementKind,
    record: &mut LoggingRecord,
) -> DeserializationResult<()> {
    match kind {
        ElementKind::Message => record.message.clear(),
        // An empty block still leaves the mapping present for the
        // `log4japp` lookup that follows.
        ElementKind::Properties => record.properties = Some(HashMap::new()),
        ElementKind::Exception => {
            return Err(DeserializationError::MalformedExceptionBlock {
                found: "an empty element",
            });
        }
    }
    Ok(())
}

/// Reads a `properties` block: each child node carrying at least two
/// attributes contributes (first value, second value) as a key/value pair;
/// nodes with fewer attributes are skipped without error.
fn read_properties(
    reader: &mut Reader<&[u8]>,
    record: &mut LoggingRecord,
) -> DeserializationResult<()> {
    let mut properties = HashMap::new();

    loop {
        match read_event(reader)? {
            Event::Start(entry) => {
                insert_property(reader, &entry, &mut properties)?;
                reader
                    .read_to_end(entry.name())
                    .map_err(|source| xml_err(reader, source))?;
            }
            Event::Empty(entry) => insert_property(reader, &entry, &mut properties)?,
            Event::End(_) => break,
            Event::Eof => {
                return Err(DeserializationError::UnexpectedEof {
                    context: "a `properties` block",
                });
            }
            _ => continue,
        }
    }

    record.properties = Some(properties);

    Ok(())
}

fn insert_property(
    reader: &Reader<&[u8]>,
    entry: &BytesStart<'_>,
    properties: &mut HashMap<String, String>,
) -> DeserializationResult<()> {
    let mut attrs = entry.attributes();
    let (Some(key), Some(value)) = (attrs.next(), attrs.next()) else {
        trace!("skipping property node without a key/value attribute pair");
        return Ok(());
    };

    let key = key?
        .decode_and_unescape_value(reader.decoder())
        .map_err(|source| xml_err(reader, source.into()))?;
    let value = value?
        .decode_and_unescape_value(reader.decoder())
        .map_err(|source| xml_err(reader, source.into()))?;

    // Last write wins on duplicate keys.
    properties.insert(key.into_owned(), value.into_owned());

    Ok(())
}

/// Reads an `exception` block, which must contain exactly one text node.
fn read_exception(
    reader: &mut Reader<&[u8]>,
    record: &mut LoggingRecord,
) -> DeserializationResult<()> {
    let text = match read_event(reader)? {
        Event::Text(text) => text
            .unescape()
            .map_err(|source| xml_err(reader, source.into()))?
            .into_owned(),
        Event::Eof => {
            return Err(DeserializationError::UnexpectedEof {
                context: "an `exception` block",
            });
        }
        other => {
            return Err(DeserializationError::MalformedExceptionBlock {
                found: node_kind(&other),
            });
        }
    };

    match read_event(reader)? {
        Event::End(_) => {}
        Event::Eof => {
            return Err(DeserializationError::UnexpectedEof {
                context: "an `exception` block",
            });
        }
        other => {
            return Err(DeserializationError::MalformedExceptionBlock {
                found: node_kind(&other),
            });
        }
    }

    record.exception = Some(text);

    Ok(())
}

fn node_kind(event: &Event<'_>) -> &'static str {
    match event {
        Event::Start(_) | Event::Empty(_) => "a child element",
        Event::Text(_) => "an extra text node",
        Event::CData(_) => "a CDATA section",
        Event::End(_) => "an immediate end tag",
        _ => "an unsupported node",
    }
}

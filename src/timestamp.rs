//! Decoding of the .NET `DateTime.ToBinary` value carried by the
//! `timestamp` attribute.
//!
//! The wire value is a signed 64-bit integer transmitted as base-10 text.
//! Bits 0-61 hold the tick count (100ns units) since 0001-01-01T00:00:00,
//! bits 62-63 hold the `DateTimeKind` flag. The kind flag is masked off and
//! not otherwise interpreted.

use jiff::Timestamp;

use crate::err::{DeserializationError, DeserializationResult};

const TICKS_MASK: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// `DateTimeKind.Utc` flag (bit 62), applied when re-encoding.
const KIND_UTC: i64 = 0x4000_0000_0000_0000;

/// Tick count of 1970-01-01T00:00:00 relative to the .NET epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;

/// Decodes a `DateTime.ToBinary` value into an absolute timestamp.
pub fn from_binary(value: i64) -> DeserializationResult<Timestamp> {
    let ticks = value & TICKS_MASK;
    let relative = ticks - UNIX_EPOCH_TICKS;

    let secs = relative.div_euclid(TICKS_PER_SECOND);
    let nanos = (relative.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK) as i32;

    Timestamp::new(secs, nanos).map_err(|_| DeserializationError::TimestampOutOfRange { ticks })
}

/// Encodes a timestamp back into the wire value, with the UTC kind flag
/// set. Exact inverse of [`from_binary`] up to the kind bits.
pub fn to_binary(timestamp: Timestamp) -> i64 {
    let ticks = (timestamp.as_nanosecond() / i128::from(NANOS_PER_TICK)) as i64 + UNIX_EPOCH_TICKS;
    ticks | KIND_UTC
}

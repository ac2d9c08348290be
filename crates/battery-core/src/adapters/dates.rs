//! Date adapters for `chrono::DateTime<Utc>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::TypeAdapter;
use crate::exception::{Error, Result};

const ISO_DATE_TIME_WITH_FRACTION: &str = "%Y-%m-%dT%H:%M:%S%.6f%z";
const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%z";
const ISO_DATE: &str = "%Y-%m-%d";
const RFC1123: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC1123_WITH_MILLIS: &str = "%a, %d %b %Y %H:%M:%S%.3f GMT";

fn date_error(wire: &str, format: &str) -> Error {
	Error::adapter("DateTime<Utc>", format!("'{wire}' is not a valid {format} date"))
}

/// ISO-8601 dates, with or without a time part.
///
/// Decoding accepts RFC 3339 timestamps, `+hhmm` offsets with or without
/// fractional seconds, and bare dates (read as midnight UTC). Encoding emits
/// a bare date when the time is exactly midnight, and microsecond precision
/// otherwise.
///
/// # Examples
///
/// ```
/// use battery_core::adapters::{Iso8601DateAdapter, TypeAdapter};
///
/// let adapter = Iso8601DateAdapter;
/// let date = adapter.decode("2024-03-01T12:30:00+09:00").unwrap();
/// assert_eq!(adapter.encode(&date).unwrap(), "2024-03-01T03:30:00.000000+0000");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso8601DateAdapter;

impl TypeAdapter for Iso8601DateAdapter {
	type Target = DateTime<Utc>;

	fn decode(&self, wire: &str) -> Result<DateTime<Utc>> {
		if let Ok(parsed) = DateTime::parse_from_rfc3339(wire) {
			return Ok(parsed.with_timezone(&Utc));
		}
		for format in [ISO_DATE_TIME_WITH_FRACTION, ISO_DATE_TIME] {
			if let Ok(parsed) = DateTime::parse_from_str(wire, format) {
				return Ok(parsed.with_timezone(&Utc));
			}
		}
		NaiveDate::parse_from_str(wire, ISO_DATE)
			.map(|date| date.and_time(NaiveTime::MIN).and_utc())
			.map_err(|_| date_error(wire, "ISO-8601"))
	}

	fn encode(&self, value: &DateTime<Utc>) -> Result<String> {
		if value.time() == NaiveTime::MIN {
			Ok(value.format(ISO_DATE).to_string())
		} else {
			Ok(value.format(ISO_DATE_TIME_WITH_FRACTION).to_string())
		}
	}
}

/// RFC 1123 (HTTP) dates, always rendered in GMT.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc1123DateAdapter;

impl TypeAdapter for Rfc1123DateAdapter {
	type Target = DateTime<Utc>;

	fn decode(&self, wire: &str) -> Result<DateTime<Utc>> {
		if let Ok(parsed) = DateTime::parse_from_rfc2822(wire) {
			return Ok(parsed.with_timezone(&Utc));
		}
		NaiveDateTime::parse_from_str(wire, RFC1123_WITH_MILLIS)
			.map(|naive| naive.and_utc())
			.map_err(|_| date_error(wire, "RFC 1123"))
	}

	fn encode(&self, value: &DateTime<Utc>) -> Result<String> {
		Ok(value.format(RFC1123).to_string())
	}
}

/// UNIX timestamps in seconds or milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct TimestampDateAdapter {
	millis: bool,
}

impl TimestampDateAdapter {
	pub fn seconds() -> Self {
		Self { millis: false }
	}

	pub fn milliseconds() -> Self {
		Self { millis: true }
	}
}

impl Default for TimestampDateAdapter {
	fn default() -> Self {
		Self::seconds()
	}
}

impl TypeAdapter for TimestampDateAdapter {
	type Target = DateTime<Utc>;

	fn decode(&self, wire: &str) -> Result<DateTime<Utc>> {
		let raw = wire
			.trim()
			.parse::<i64>()
			.map_err(|_| date_error(wire, "timestamp"))?;
		let parsed = if self.millis {
			DateTime::from_timestamp_millis(raw)
		} else {
			DateTime::from_timestamp(raw, 0)
		};
		parsed.ok_or_else(|| date_error(wire, "timestamp"))
	}

	fn encode(&self, value: &DateTime<Utc>) -> Result<String> {
		let raw = if self.millis {
			value.timestamp_millis()
		} else {
			value.timestamp()
		};
		Ok(raw.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use rstest::rstest;

	fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
	}

	#[rstest]
	#[case("2024-03-01T12:30:00Z", utc(2024, 3, 1, 12, 30, 0))]
	#[case("2024-03-01T12:30:00+0900", utc(2024, 3, 1, 3, 30, 0))]
	#[case("2024-03-01T12:30:00.000000+0000", utc(2024, 3, 1, 12, 30, 0))]
	#[case("2024-03-01", utc(2024, 3, 1, 0, 0, 0))]
	fn test_iso_decode(#[case] wire: &str, #[case] expected: DateTime<Utc>) {
		assert_eq!(Iso8601DateAdapter.decode(wire).unwrap(), expected);
	}

	#[rstest]
	fn test_iso_decode_rejects_garbage() {
		let error = Iso8601DateAdapter.decode("yesterday").unwrap_err();
		assert!(matches!(error, Error::Adapter { .. }));
	}

	#[rstest]
	#[case(utc(2024, 3, 1, 0, 0, 0), "2024-03-01")]
	#[case(utc(2024, 3, 1, 8, 5, 9), "2024-03-01T08:05:09.000000+0000")]
	fn test_iso_encode(#[case] value: DateTime<Utc>, #[case] expected: &str) {
		assert_eq!(Iso8601DateAdapter.encode(&value).unwrap(), expected);
	}

	#[rstest]
	fn test_rfc1123_round_trip() {
		let value = utc(1994, 11, 6, 8, 49, 37);
		let wire = Rfc1123DateAdapter.encode(&value).unwrap();
		assert_eq!(wire, "Sun, 06 Nov 1994 08:49:37 GMT");
		assert_eq!(Rfc1123DateAdapter.decode(&wire).unwrap(), value);
	}

	#[rstest]
	fn test_rfc1123_fractional_fallback() {
		let decoded = Rfc1123DateAdapter
			.decode("Sun, 06 Nov 1994 08:49:37.250 GMT")
			.unwrap();
		assert_eq!(decoded.timestamp_millis(), utc(1994, 11, 6, 8, 49, 37).timestamp_millis() + 250);
	}

	#[rstest]
	#[case(TimestampDateAdapter::seconds(), "1700000000")]
	#[case(TimestampDateAdapter::milliseconds(), "1700000000000")]
	fn test_timestamp_round_trip(#[case] adapter: TimestampDateAdapter, #[case] wire: &str) {
		let decoded = adapter.decode(wire).unwrap();
		assert_eq!(decoded.timestamp(), 1_700_000_000);
		assert_eq!(adapter.encode(&decoded).unwrap(), wire);
	}
}

//! Serde adapters for the platform's timestamp wire format.
//!
//! Timestamps arrive as ISO-8601-like strings with millisecond precision and a numeric UTC
//! offset (`2018-10-09T13:47:02.000+0000`). The same shape covers both the legacy and the
//! current server encodings, so one format description handles every field. Apply with
//! `#[serde(with = "salesforce_connect::datetime")]` (or the [`option`] submodule for optional
//! fields).

// crates.io
use serde::{
	Deserializer, Serializer,
	de::Error as DeError,
	ser::Error as SerError,
};
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::_prelude::*;

const FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory][offset_minute]"
);

/// Formats a timestamp in the platform wire format.
pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = datetime.format(FORMAT).map_err(S::Error::custom)?;

	serializer.serialize_str(&formatted)
}

/// Parses a timestamp from the platform wire format.
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	OffsetDateTime::parse(&raw, FORMAT).map_err(D::Error::custom)
}

/// Adapters for `Option<OffsetDateTime>` fields in the same wire format.
pub mod option {
	// self
	use super::*;

	/// Formats an optional timestamp, emitting `null` when absent.
	pub fn serialize<S>(
		datetime: &Option<OffsetDateTime>,
		serializer: S,
	) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match datetime {
			Some(value) => super::serialize(value, serializer),
			None => serializer.serialize_none(),
		}
	}

	/// Parses an optional timestamp, accepting `null` or a missing value.
	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw: Option<String> = Option::deserialize(deserializer)?;

		raw.map(|value| OffsetDateTime::parse(&value, FORMAT).map_err(D::Error::custom))
			.transpose()
	}
}

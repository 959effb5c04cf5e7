//! Wire format for leave dates: `YYYY-MM-DDTHH:MM:SS`, no offset, no fraction.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer, de::Error};

pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, FORMAT)
}

pub fn format(value: &NaiveDateTime) -> String {
    value.format(FORMAT).to_string()
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(D::Error::custom)
}

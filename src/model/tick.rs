use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted tick time layout: ISO-8601 with microseconds and a literal `Z`.
pub const TICK_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const TICK_TIME_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Identity of one background simulation tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub id: String,
    #[serde(with = "tick_time")]
    pub time: DateTime<Utc>,
}

impl Tick {
    pub fn new(id: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            time,
        }
    }
}

impl Default for Tick {
    /// Placeholder used before the first tick has been fetched.
    fn default() -> Self {
        Self::new("zero", DateTime::<Utc>::UNIX_EPOCH)
    }
}

pub fn format_tick_time(time: &DateTime<Utc>) -> String {
    time.format(TICK_TIME_FORMAT).to_string()
}

pub fn parse_tick_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TICK_TIME_PARSE_FORMAT).map(|naive| naive.and_utc())
}

/// `#[serde(with = "tick_time")]` adapter for [`TICK_TIME_FORMAT`].
pub mod tick_time {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_tick_time(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_tick_time(&raw).map_err(D::Error::custom)
    }
}

// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::DateTime;
use chrono::Duration;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// A point in time, in UTC. Serialized as an RFC 3339 string with
/// millisecond precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn parse(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ErrorReport::new(format!("invalid timestamp '{s}': {e}")))?;
        Ok(Self(ts.with_timezone(&Utc)))
    }

    /// Saturates at the latest representable time.
    pub fn plus(self, duration: Duration) -> Self {
        Self(
            self.0
                .checked_add_signed(duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Saturates at the earliest representable time.
    pub fn minus(self, duration: Duration) -> Self {
        Self(
            self.0
                .checked_sub_signed(duration)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }

    pub fn timestamp_millis(self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Timestamp::parse(&string).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_serialize_uses_millis_and_z() -> Fallible<()> {
        let ts = Timestamp::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());
        let json = serde_json::to_string(&ts)?;
        assert_eq!(json, "\"2025-03-01T12:30:00.000Z\"");
        Ok(())
    }

    #[test]
    fn test_parse_with_offset() -> Fallible<()> {
        let ts = Timestamp::parse("2025-03-01T21:30:00+09:00")?;
        assert_eq!(ts.to_rfc3339(), "2025-03-01T12:30:00.000Z");
        Ok(())
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_ordering_and_arithmetic() {
        let now = Timestamp::new(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        let later = now.plus(Duration::minutes(5));
        assert!(now < later);
        assert_eq!(later.minus(Duration::minutes(5)), now);
        assert_eq!(later.timestamp_millis() - now.timestamp_millis(), 300_000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let now = Timestamp::now();
        let far = now.plus(Duration::MAX);
        assert_eq!(far, Timestamp::new(DateTime::<Utc>::MAX_UTC));
        assert_eq!(far.plus(Duration::days(1)), far);
        assert_eq!(now.minus(Duration::MAX), Timestamp::new(DateTime::<Utc>::MIN_UTC));
    }
}

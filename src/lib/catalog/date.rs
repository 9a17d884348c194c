use crate::error::FieldError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_IN_DAY: i64 = 86400;

/// Unix timestamp in seconds, Magento keeps entity dates in UTC
#[derive(PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn now() -> Self {
        let seconds = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs() as i64,
            Err(error) => -(error.duration().as_secs() as i64),
        };

        Self(seconds)
    }

    pub fn parse(value: &str) -> Result<Self, FieldError> {
        let value = value.trim();

        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
            return Ok(Self(datetime.and_utc().timestamp()));
        }

        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self(datetime.and_utc().timestamp()));
        }

        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(datetime.timestamp()));
        }

        match NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            Some(datetime) => Ok(Self(datetime.and_utc().timestamp())),
            None => Err(FieldError::InvalidCreatedAt(value.to_owned())),
        }
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }

    /// Whole days elapsed since `self`, rounded towards negative infinity
    pub fn days_until(&self, now: Timestamp) -> i64 {
        (now.0 - self.0).div_euclid(SECONDS_IN_DAY)
    }
}

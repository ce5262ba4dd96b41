//! Contest deadline gate.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Optional cut-off instant after which submissions are closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<DateTime<Utc>>);

impl Deadline {
    /// No deadline: always open.
    pub const fn none() -> Self {
        Self(None)
    }

    pub const fn at(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    /// Parse an RFC 3339 instant such as `2026-03-10T23:59:59+05:30`.
    /// An empty string or `none` disables the gate.
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
            return Ok(Self::none());
        }
        let instant = DateTime::parse_from_rfc3339(raw)?;
        Ok(Self::at(instant.with_timezone(&Utc)))
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.0.map_or(true, |deadline| now < deadline)
    }

    pub fn is_open(&self) -> bool {
        self.is_open_at(Utc::now())
    }

    /// Time left at `now`. `None` without a deadline, zero once closed.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        let deadline = self.0?;
        Some((deadline - now).to_std().unwrap_or(Duration::ZERO))
    }
}

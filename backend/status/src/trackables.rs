use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::StatusError;

pub const GOOD: &str = "good";
pub const BAD: &str = "bad";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackableType {
    Good,
    Bad,
}

impl TrackableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackableType::Good => GOOD,
            TrackableType::Bad => BAD,
        }
    }
}

impl FromStr for TrackableType {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GOOD => Ok(TrackableType::Good),
            BAD => Ok(TrackableType::Bad),
            other => Err(StatusError::UnknownTrackableType(other.to_string())),
        }
    }
}

impl fmt::Display for TrackableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLabel {
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "To do")]
    ToDo,
    #[serde(rename = "Slip-up")]
    SlipUp,
    #[serde(rename = "No slip-up")]
    NoSlipUp,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Completed => "Completed",
            StatusLabel::ToDo => "To do",
            StatusLabel::SlipUp => "Slip-up",
            StatusLabel::NoSlipUp => "No slip-up",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub success: bool,
    pub label: StatusLabel,
}

/// A `bad` trackable succeeds when nothing was recorded, a `good` one when anything was.
pub fn is_success(kind: TrackableType, count: u32) -> bool {
    match kind {
        TrackableType::Good => count > 0,
        TrackableType::Bad => count == 0,
    }
}

pub fn binary_status_label(kind: TrackableType, count: u32) -> StatusLabel {
    match (kind, count > 0) {
        (TrackableType::Good, true) => StatusLabel::Completed,
        (TrackableType::Good, false) => StatusLabel::ToDo,
        (TrackableType::Bad, true) => StatusLabel::SlipUp,
        (TrackableType::Bad, false) => StatusLabel::NoSlipUp,
    }
}

pub fn evaluate(kind: TrackableType, count: u32) -> Verdict {
    Verdict {
        success: is_success(kind, count),
        label: binary_status_label(kind, count),
    }
}

/// Counts below zero are treated as nothing recorded. Counts past `u32::MAX` saturate.
pub fn clamp_count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Parses a count from its decimal text. Any integer is accepted and clamped the same way as
/// [`clamp_count`], including integers too long for `i64`.
pub fn parse_count(raw: &str) -> Result<u32, StatusError> {
    let trimmed = raw.trim();

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(clamp_count(value));
    }

    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StatusError::MalformedCount(raw.to_string()));
    }

    Ok(if negative { 0 } else { u32::MAX })
}

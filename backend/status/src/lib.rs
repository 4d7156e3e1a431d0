//! # Status
//!
//! Evaluation rules shared by every surface that shows a trackable.
//!
//! A trackable is either a habit we want more of (`good`) or a behavior we want to avoid (`bad`).
//! The verdict is never stored, it is recomputed from the type and the observation count each time
//! it is displayed.
//!
//! | type | count > 0 | success | label        |
//! |------|-----------|---------|--------------|
//! | good | yes       | yes     | Completed    |
//! | good | no        | no      | To do        |
//! | bad  | yes       | no      | Slip-up      |
//! | bad  | no        | yes     | No slip-up   |
use thiserror::Error;

pub mod trackables;

pub use trackables::{
    StatusLabel, TrackableType, Verdict, binary_status_label, clamp_count, evaluate, is_success,
    parse_count,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("Unknown trackable type: {0}")]
    UnknownTrackableType(String),

    #[error("Count is not an integer: {0}")]
    MalformedCount(String),
}

use chrono::NaiveDateTime;
use std::fmt;

use super::Extra;
use crate::helpers::datetime_to_str;

/// One close approach of a NEO to Earth.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    /// Designation of the approaching body; resolved to a NEO when linked
    pub designation: String,
    /// Time of closest approach, UTC
    pub time: NaiveDateTime,
    /// Nominal approach distance (au)
    pub distance: f64,
    /// Velocity relative to Earth (km/s)
    pub velocity: f64,
    pub extra: Extra,
    /// Index of the owning NEO, set by the database link step
    pub neo: Option<usize>,
}

impl CloseApproach {
    pub fn new(
        designation: impl Into<String>,
        time: NaiveDateTime,
        distance: f64,
        velocity: f64,
        extra: Extra,
    ) -> Self {
        Self {
            designation: designation.into(),
            time,
            distance,
            velocity,
            extra,
            neo: None,
        }
    }

    pub fn time_str(&self) -> String {
        datetime_to_str(&self.time)
    }
}

impl fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "On {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.time_str(),
            self.designation,
            self.distance,
            self.velocity
        )
    }
}

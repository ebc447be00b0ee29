//! Weekday sets using the backend's Monday-first numbering.

use std::collections::BTreeSet;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Non-empty set of weekdays, 1=Monday .. 7=Sunday.
///
/// Serialized as a sorted JSON array (`dayOfWeek` on the wire). Decoding
/// rejects out-of-range values and empty arrays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DaysOfWeek(BTreeSet<u8>);

impl DaysOfWeek {
    pub const MONDAY: u8 = 1;
    pub const SUNDAY: u8 = 7;

    /// Build from Monday-first day numbers. Duplicates collapse.
    pub fn new<I: IntoIterator<Item = u8>>(days: I) -> Result<Self, ValidationError> {
        let set: BTreeSet<u8> = days.into_iter().collect();
        if set.is_empty() {
            return Err(ValidationError::NoDays);
        }
        if let Some(&bad) = set
            .iter()
            .find(|&&d| !(Self::MONDAY..=Self::SUNDAY).contains(&d))
        {
            return Err(ValidationError::DayOutOfRange(bad));
        }
        Ok(Self(set))
    }

    /// Every day of the week.
    pub fn every_day() -> Self {
        Self((Self::MONDAY..=Self::SUNDAY).collect())
    }

    /// Build from the 0-indexed form used by day pickers (0=Monday .. 6=Sunday).
    pub fn from_zero_indexed<I: IntoIterator<Item = u8>>(
        days: I,
    ) -> Result<Self, ValidationError> {
        Self::new(days.into_iter().map(|d| d.saturating_add(1)))
    }

    /// The 0-indexed form used by day pickers.
    pub fn to_zero_indexed(&self) -> Vec<u8> {
        self.0.iter().map(|d| d - 1).collect()
    }

    pub fn contains(&self, day: u8) -> bool {
        self.0.contains(&day)
    }

    pub fn contains_weekday(&self, weekday: Weekday) -> bool {
        self.contains(weekday.number_from_monday() as u8)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u8>> for DaysOfWeek {
    type Error = ValidationError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<DaysOfWeek> for Vec<u8> {
    fn from(days: DaysOfWeek) -> Self {
        days.0.into_iter().collect()
    }
}

impl fmt::Display for DaysOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        let names: Vec<&str> = self.iter().map(|d| NAMES[(d - 1) as usize]).collect();
        write!(f, "{}", names.join(","))
    }
}

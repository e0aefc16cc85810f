//! Canonical structured representation of Heurist compound (fuzzy) dates.
//!
//! Heurist lets users enter a date as a range with uncertainty bounds plus a
//! qualitative probability profile and a determination of how the date was
//! established. Both qualifiers are exported as single-digit codes.
//!
//! ```text
//! profile:        0 flat | 1 central | 2 slowStart | 3 slowFinish
//! determination:  0 unknown | 1 attested | 2 conjecture | 3 measurement
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability distribution of a fuzzy date across its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Profile {
    Flat,
    Central,
    SlowStart,
    SlowFinish,
}

impl Profile {
    /// Decode a Heurist profile code; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Profile::Flat),
            "1" => Some(Profile::Central),
            "2" => Some(Profile::SlowStart),
            "3" => Some(Profile::SlowFinish),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Flat => "flat",
            Profile::Central => "central",
            Profile::SlowStart => "slowStart",
            Profile::SlowFinish => "slowFinish",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a date was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Determination {
    Unknown,
    Attested,
    Conjecture,
    Measurement,
}

impl Determination {
    /// Decode a Heurist determination code; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Determination::Unknown),
            "1" => Some(Determination::Attested),
            "2" => Some(Determination::Conjecture),
            "3" => Some(Determination::Measurement),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Determination::Unknown => "unknown",
            Determination::Attested => "attested",
            Determination::Conjecture => "conjecture",
            Determination::Measurement => "measurement",
        }
    }
}

impl fmt::Display for Determination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One end (start or end) of a fuzzy date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateLimit {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
    pub profile: Option<Profile>,
    pub determination: Option<Determination>,
}

/// Simple timestamp entry of a compound date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(rename = "in")]
    pub in_year: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub type_time: Option<String>,
    pub circa: Option<bool>,
}

/// Canonical structured date, produced only from compound raw values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalObject {
    pub start: Option<DateLimit>,
    pub end: Option<DateLimit>,
    pub est_determination: Option<Determination>,
    pub est_profile: Option<Profile>,
    pub est_min_date: Option<NaiveDate>,
    pub est_max_date: Option<NaiveDate>,
    pub timestamp: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_codes() {
        assert_eq!(Profile::from_code("0"), Some(Profile::Flat));
        assert_eq!(Profile::from_code("1"), Some(Profile::Central));
        assert_eq!(Profile::from_code("2"), Some(Profile::SlowStart));
        assert_eq!(Profile::from_code("3"), Some(Profile::SlowFinish));
        assert_eq!(Profile::from_code("9"), None);
        assert_eq!(Profile::from_code(""), None);
    }

    #[test]
    fn test_determination_codes() {
        assert_eq!(Determination::from_code("0"), Some(Determination::Unknown));
        assert_eq!(Determination::from_code("2"), Some(Determination::Conjecture));
        assert_eq!(Determination::from_code(" 3 "), Some(Determination::Measurement));
        assert_eq!(Determination::from_code("x"), None);
    }
}

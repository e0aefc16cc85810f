//! Mapping of raw compound dates onto [`TemporalObject`].

use heurist_model::{
    DateLimit, Determination, Profile, RawCompoundDate, RawDateLimit, RawTimestamp,
    TemporalObject, Timestamp,
};

use crate::datetime::parse_partial;

/// Build the canonical temporal object of a compound date.
///
/// Profile and determination codes are decoded through their lookup
/// tables; absent sub-keys and unknown codes become `None`. The overall
/// `estProfile` / `estDetermination` fall back to the start limit's codes
/// when the compound value carries none of its own.
pub fn build_temporal_object(compound: &RawCompoundDate) -> TemporalObject {
    let start = compound.start.as_ref();

    let profile = compound
        .profile
        .as_deref()
        .or_else(|| start.and_then(|limit| limit.profile.as_deref()));
    let determination = compound
        .determination
        .as_deref()
        .or_else(|| start.and_then(|limit| limit.determination.as_deref()));

    TemporalObject {
        start: start.map(date_limit),
        end: compound.end.as_ref().map(date_limit),
        est_determination: determination.and_then(Determination::from_code),
        est_profile: profile.and_then(Profile::from_code),
        est_min_date: compound.est_min_date.as_ref().and_then(parse_partial),
        est_max_date: compound.est_max_date.as_ref().and_then(parse_partial),
        timestamp: compound.timestamp.as_ref().map(timestamp),
    }
}

fn date_limit(limit: &RawDateLimit) -> DateLimit {
    DateLimit {
        earliest: limit.earliest.as_ref().and_then(parse_partial),
        latest: limit.latest.as_ref().and_then(parse_partial),
        profile: limit.profile.as_deref().and_then(Profile::from_code),
        determination: limit
            .determination
            .as_deref()
            .and_then(Determination::from_code),
    }
}

fn timestamp(raw: &RawTimestamp) -> Timestamp {
    Timestamp {
        in_year: raw.in_year.as_ref().and_then(parse_partial),
        type_time: raw.type_time.clone(),
        circa: raw.circa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use heurist_model::PartialDate;

    fn text(value: &str) -> Option<PartialDate> {
        Some(PartialDate::Text(value.to_string()))
    }

    #[test]
    fn fuzzy_date_decodes_codes() {
        let compound = RawCompoundDate {
            start: Some(RawDateLimit {
                earliest: text("1180"),
                latest: text("1231"),
                profile: Some("1".to_string()),
                determination: None,
            }),
            end: Some(RawDateLimit {
                earliest: text("1246"),
                latest: text("1250"),
                profile: Some("3".to_string()),
                determination: None,
            }),
            determination: Some("2".to_string()),
            est_min_date: Some(PartialDate::Integer(1180)),
            est_max_date: Some(PartialDate::Float(1250.1231)),
            ..Default::default()
        };
        let temporal = build_temporal_object(&compound);
        assert_eq!(temporal.est_profile, Some(Profile::Central));
        assert_eq!(temporal.est_determination, Some(Determination::Conjecture));
        assert_eq!(temporal.est_max_date, NaiveDate::from_ymd_opt(1250, 12, 31));
        let end = temporal.end.unwrap();
        assert_eq!(end.profile, Some(Profile::SlowFinish));
        assert_eq!(end.earliest, NaiveDate::from_ymd_opt(1246, 1, 1));
        assert!(temporal.timestamp.is_none());
    }

    #[test]
    fn own_profile_wins_over_start() {
        let compound = RawCompoundDate {
            start: Some(RawDateLimit {
                profile: Some("1".to_string()),
                ..Default::default()
            }),
            profile: Some("2".to_string()),
            ..Default::default()
        };
        let temporal = build_temporal_object(&compound);
        assert_eq!(temporal.est_profile, Some(Profile::SlowStart));
        assert_eq!(temporal.start.unwrap().profile, Some(Profile::Central));
    }

    #[test]
    fn timestamp_and_unknown_codes() {
        let compound = RawCompoundDate {
            timestamp: Some(RawTimestamp {
                in_year: Some(PartialDate::Integer(1454)),
                type_time: Some("s".to_string()),
                circa: Some(true),
            }),
            determination: Some("9".to_string()),
            ..Default::default()
        };
        let temporal = build_temporal_object(&compound);
        let stamp = temporal.timestamp.unwrap();
        assert_eq!(stamp.in_year, NaiveDate::from_ymd_opt(1454, 1, 1));
        assert_eq!(stamp.circa, Some(true));
        assert_eq!(temporal.est_determination, None);
        assert!(temporal.start.is_none());
    }
}

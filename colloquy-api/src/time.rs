use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub type Time = DateTime<Utc>;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp shapes producers are known to send
///
/// Naive date-times are taken as UTC, a string of digits as epoch
/// milliseconds. Returns `None` for anything else, which callers order as
/// the earliest possible time.
pub fn parse_time(s: &str) -> Option<Time> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&t));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| Utc.from_utc_datetime(&t));
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(from_millis);
    }
    None
}

pub fn from_millis(ms: i64) -> Option<Time> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Serde adapter for `Option<Time>` fields that must never fail to deserialize
pub mod lenient {
    use serde::{de::IgnoredAny, Deserialize, Deserializer, Serializer};

    use super::Time;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Millis(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    pub fn serialize<S: Serializer>(t: &Option<Time>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Time>, D::Error> {
        Ok(match Option::<RawTime>::deserialize(d)? {
            None | Some(RawTime::Other(_)) => None,
            Some(RawTime::Millis(ms)) => super::from_millis(ms),
            Some(RawTime::Float(ms)) if ms.is_finite() => super::from_millis(ms as i64),
            Some(RawTime::Float(_)) => None,
            Some(RawTime::Text(s)) => super::parse_time(&s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, serde::Serialize)]
    struct Holder {
        #[serde(default, with = "lenient")]
        at: Option<Time>,
    }

    fn at(json: &str) -> Option<Time> {
        serde_json::from_str::<Holder>(json).unwrap().at
    }

    #[test]
    fn accepted_shapes() {
        let expected = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap();
        assert_eq!(parse_time("2023-04-05T06:07:08Z"), Some(expected));
        assert_eq!(parse_time("2023-04-05T08:07:08+02:00"), Some(expected));
        assert_eq!(parse_time("2023-04-05 06:07:08"), Some(expected));
        assert_eq!(parse_time(" 2023-04-05T06:07:08.000 "), Some(expected));
        assert_eq!(
            parse_time("2023-04-05"),
            Some(Utc.with_ymd_and_hms(2023, 4, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_time(&expected.timestamp_millis().to_string()), Some(expected));
    }

    #[test]
    fn rejected_shapes() {
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("yesterday"), None);
        assert_eq!(parse_time("2023-13-45"), None);
        assert_eq!(parse_time("-12"), None);
    }

    #[test]
    fn lenient_deserialization() {
        let expected = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap();
        assert_eq!(at(r#"{"at":"2023-04-05T06:07:08Z"}"#), Some(expected));
        assert_eq!(at(&format!(r#"{{"at":{}}}"#, expected.timestamp_millis())), Some(expected));
        assert_eq!(at(r#"{"at":null}"#), None);
        assert_eq!(at(r#"{}"#), None);
        assert_eq!(at(r#"{"at":"garbage"}"#), None);
        assert_eq!(at(r#"{"at":{"nested":true}}"#), None);
        assert_eq!(at(r#"{"at":[1,2]}"#), None);
    }

    #[test]
    fn serializes_rfc3339() {
        let h = Holder {
            at: Some(Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap()),
        };
        assert_eq!(
            serde_json::to_string(&h).unwrap(),
            r#"{"at":"2023-04-05T06:07:08.000Z"}"#
        );
        assert_eq!(serde_json::to_string(&Holder { at: None }).unwrap(), r#"{"at":null}"#);
    }
}

//! JSON encoding shared by every backend
//!
//! Records are wrapped in a single top-level object rather than a bare
//! array so metadata fields can be added later without breaking readers:
//!
//! ```json
//! { "timers": [ { "key": "...", "startTimeUnix": 0, "endTimeUnix": 0,
//!                 "totalDuration": 0.0, "tierCount": 0, "currentTier": 0 } ] }
//! ```

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::error::PersistenceError;
use super::record::CountdownTimerRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedTimerSet {
    #[serde(default)]
    pub timers: Vec<CountdownTimerRecord>,
}

pub fn encode_timers(records: &[CountdownTimerRecord]) -> Result<String, PersistenceError> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        timers: &'a [CountdownTimerRecord],
    }

    serde_json::to_string_pretty(&Borrowed { timers: records }).map_err(PersistenceError::Encode)
}

/// Decode a payload. Blank input is an empty set.
///
/// Records that break an invariant, and repeats of a key already seen, are
/// dropped with a warning; the rest of the set is kept.
pub fn decode_timers(payload: &str) -> Result<Vec<CountdownTimerRecord>, PersistenceError> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }

    let set: PersistedTimerSet = serde_json::from_str(payload).map_err(PersistenceError::Decode)?;

    let mut seen = HashSet::with_capacity(set.timers.len());
    let mut records = Vec::with_capacity(set.timers.len());
    for record in set.timers {
        if let Err(reason) = record.validate() {
            tracing::warn!(key = %record.key, %reason, "dropping invalid timer record");
            continue;
        }
        if !seen.insert(record.key.clone()) {
            tracing::warn!(key = %record.key, "dropping duplicate timer record");
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, start: i64, end: i64) -> CountdownTimerRecord {
        CountdownTimerRecord {
            key: key.to_string(),
            start_time_unix: start,
            end_time_unix: end,
            total_duration: (end - start) as f64,
            tier_count: 3,
            current_tier: 1,
        }
    }

    #[test]
    fn encodes_wrapped_camel_case_document() {
        let json = encode_timers(&[record("boss_respawn", 10, 40)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let first = &value["timers"][0];
        assert_eq!(first["key"], "boss_respawn");
        assert_eq!(first["startTimeUnix"], 10);
        assert_eq!(first["endTimeUnix"], 40);
        assert_eq!(first["totalDuration"], 30.0);
        assert_eq!(first["tierCount"], 3);
        assert_eq!(first["currentTier"], 1);
    }

    #[test]
    fn blank_payload_is_empty_set() {
        assert!(decode_timers("").unwrap().is_empty());
        assert!(decode_timers("  \n").unwrap().is_empty());
        assert!(decode_timers("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(
            decode_timers("[1, 2"),
            Err(PersistenceError::Decode(_))
        ));
        // Bare arrays are not the envelope
        assert!(decode_timers("[]").is_err());
    }

    #[test]
    fn decode_drops_invalid_and_duplicate_records() {
        let json = encode_timers(&[
            record("a", 0, 10),
            record("b", 10, 5),
            record("a", 0, 99),
            record("c", 0, 1),
        ])
        .unwrap();

        let records = decode_timers(&json).unwrap();
        let keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(records[0].end_time_unix, 10);
    }

    #[test]
    fn missing_tier_fields_default_to_zero() {
        let json = r#"{"timers":[{"key":"k","startTimeUnix":1,"endTimeUnix":2,"totalDuration":1.0}]}"#;
        let records = decode_timers(json).unwrap();
        assert_eq!(records[0].tier_count, 0);
        assert_eq!(records[0].current_tier, 0);
    }

    #[test]
    fn unknown_metadata_fields_are_ignored() {
        let json = r#"{"version":2,"timers":[{"key":"k","startTimeUnix":1,"endTimeUnix":2,"totalDuration":1.0,"tierCount":0,"currentTier":0}]}"#;
        assert_eq!(decode_timers(json).unwrap().len(), 1);
    }
}

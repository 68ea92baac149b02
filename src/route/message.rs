//! Decoded log messages.
//!
//! Each log line is one event: an envelope (`logMonoTime`, `valid`, and an
//! optional `which` tag) plus exactly one union field named after the
//! service that produced it. The `valid` flag is not used for plotting and
//! is dropped.
//!
//! ```json
//! {"logMonoTime": 1690463000000, "valid": true, "carState": {"vEgo": 3.2}}
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

const MONO_TIME_FIELD: &str = "logMonoTime";
const VALID_FIELD: &str = "valid";
const WHICH_FIELD: &str = "which";

/// Why a log line could not be decoded.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("event is not a JSON object")]
    NotObject,

    #[error("missing or non-integer `logMonoTime`")]
    MonoTime,

    #[error("event has no payload field")]
    NoPayload,

    #[error("event has several payload fields: {0}")]
    AmbiguousPayload(String),

    #[error("payload field `{0}` named by `which` is missing")]
    MissingPayload(String),
}

/// One event from a segment log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogMessage {
    /// Monotonic log time in nanoseconds.
    pub log_mono_time: u64,
    /// Type tag: the name of the union field.
    pub which: String,
    pub payload: Value,
}

impl LogMessage {
    /// Decode one log line.
    pub fn parse(line: &str) -> Result<Self, MessageError> {
        let value: Value = serde_json::from_str(line)?;
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(MessageError::NotObject),
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Result<Self, MessageError> {
        let log_mono_time = map
            .remove(MONO_TIME_FIELD)
            .and_then(|v| v.as_u64())
            .ok_or(MessageError::MonoTime)?;
        map.remove(VALID_FIELD);

        let which = match map.remove(WHICH_FIELD) {
            Some(Value::String(which)) => which,
            _ => {
                let mut keys = map.keys();
                match (keys.next(), keys.next()) {
                    (Some(key), None) => key.clone(),
                    (None, _) => return Err(MessageError::NoPayload),
                    (Some(_), Some(_)) => {
                        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                        return Err(MessageError::AmbiguousPayload(keys.join(", ")));
                    }
                }
            }
        };

        let payload = map
            .remove(&which)
            .ok_or_else(|| MessageError::MissingPayload(which.clone()))?;

        Ok(Self {
            log_mono_time,
            which,
            payload,
        })
    }

    /// Log time as a signed timeline value, saturating past `i64::MAX`.
    pub fn time_nanos(&self) -> i64 {
        i64::try_from(self.log_mono_time).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_union_field() {
        let msg =
            LogMessage::parse(r#"{"logMonoTime": 100, "valid": false, "carState": {"vEgo": 1.5}}"#)
                .unwrap();
        assert_eq!(msg.log_mono_time, 100);
        assert_eq!(msg.which, "carState");
        assert_eq!(msg.payload, json!({ "vEgo": 1.5 }));
    }

    #[test]
    fn test_parse_with_which_tag() {
        let msg = LogMessage::parse(
            r#"{"logMonoTime": 5, "which": "thumbnail", "thumbnail": {"frameId": 2}, "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(msg.which, "thumbnail");
        assert_eq!(msg.payload, json!({ "frameId": 2 }));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            LogMessage::parse("not json"),
            Err(MessageError::Json(_))
        ));
        assert!(matches!(
            LogMessage::parse("[1, 2]"),
            Err(MessageError::NotObject)
        ));
        assert!(matches!(
            LogMessage::parse(r#"{"carState": {}}"#),
            Err(MessageError::MonoTime)
        ));
        assert!(matches!(
            LogMessage::parse(r#"{"logMonoTime": -1, "carState": {}}"#),
            Err(MessageError::MonoTime)
        ));
        assert!(matches!(
            LogMessage::parse(r#"{"logMonoTime": 1}"#),
            Err(MessageError::NoPayload)
        ));
        assert!(matches!(
            LogMessage::parse(r#"{"logMonoTime": 1, "a": 1, "b": 2}"#),
            Err(MessageError::AmbiguousPayload(_))
        ));
        assert!(matches!(
            LogMessage::parse(r#"{"logMonoTime": 1, "which": "a", "b": 2}"#),
            Err(MessageError::MissingPayload(ref w)) if w == "a"
        ));
    }

    #[test]
    fn test_time_nanos_saturates() {
        let msg = LogMessage {
            log_mono_time: u64::MAX,
            which: "clocks".to_string(),
            payload: Value::Null,
        };
        assert_eq!(msg.time_nanos(), i64::MAX);
    }
}

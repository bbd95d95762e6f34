//! Analysis status detection.
//!
//! The status is read from the response envelope before the payload is
//! deserialized, so responses that never finished (and may carry an error
//! object instead of a result) are recognised without touching the payload.

use crate::error::Result;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// Status of an analysis operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// Not yet started
    NotStarted,
    /// Still in progress
    Running,
    /// Finished with a usable result
    Succeeded,
    /// Finished without a result
    Failed,
    /// Canceled by the caller
    Canceled,
    /// Any status this crate does not know about
    Other(String),
    /// No status in the response, or a null one
    Missing,
}

impl AnalysisStatus {
    /// Parse a wire status value.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "notStarted" => AnalysisStatus::NotStarted,
            "running" => AnalysisStatus::Running,
            "succeeded" => AnalysisStatus::Succeeded,
            "failed" => AnalysisStatus::Failed,
            "canceled" => AnalysisStatus::Canceled,
            other => AnalysisStatus::Other(other.to_string()),
        }
    }

    /// Wire status value.
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisStatus::NotStarted => "notStarted",
            AnalysisStatus::Running => "running",
            AnalysisStatus::Succeeded => "succeeded",
            AnalysisStatus::Failed => "failed",
            AnalysisStatus::Canceled => "canceled",
            AnalysisStatus::Other(s) => s,
            AnalysisStatus::Missing => "missing",
        }
    }

    fn from_value(status: Option<Value>) -> Self {
        match status {
            Some(Value::String(s)) => AnalysisStatus::from_wire(&s),
            None | Some(Value::Null) => AnalysisStatus::Missing,
            Some(other) => AnalysisStatus::Other(other.to_string()),
        }
    }

    /// Whether the analysis has a usable result.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, AnalysisStatus::Succeeded)
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `status` member of the response envelope, if any.
///
/// Any JSON value is accepted; a non-object simply has no status. Other
/// members are skipped without being materialized.
struct StatusProbe {
    status: Option<Value>,
}

impl<'de> Deserialize<'de> for StatusProbe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(StatusProbeVisitor)
    }
}

struct StatusProbeVisitor;

impl StatusProbeVisitor {
    fn absent<E>(self) -> std::result::Result<StatusProbe, E> {
        Ok(StatusProbe { status: None })
    }
}

impl<'de> Visitor<'de> for StatusProbeVisitor {
    type Value = StatusProbe;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an analysis response")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<StatusProbe, A::Error> {
        let mut status = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "status" {
                status = Some(map.next_value::<serde_json::Value>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(StatusProbe { status })
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<StatusProbe, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        self.absent()
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<StatusProbe, E> {
        self.absent()
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<StatusProbe, E> {
        self.absent()
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<StatusProbe, E> {
        self.absent()
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<StatusProbe, E> {
        self.absent()
    }

    fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<StatusProbe, E> {
        self.absent()
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<StatusProbe, E> {
        self.absent()
    }
}

/// Detect the analysis status from a file path.
///
/// # Example
/// ```no_run
/// use ocrlayout::detect::detect_status_from_path;
///
/// let status = detect_status_from_path("analysis.json").unwrap();
/// println!("Status: {}", status);
/// ```
pub fn detect_status_from_path<P: AsRef<Path>>(path: P) -> Result<AnalysisStatus> {
    let data = fs::read(path)?;
    detect_status_from_bytes(&data)
}

/// Detect the analysis status from raw JSON bytes.
///
/// # Returns
/// * `Ok(AnalysisStatus)` for any JSON value; only a `"succeeded"` string
///   status counts as finished
/// * `Err(Error::Json)` if the data is not JSON
pub fn detect_status_from_bytes(data: &[u8]) -> Result<AnalysisStatus> {
    let probe: StatusProbe = serde_json::from_slice(data)?;
    Ok(AnalysisStatus::from_value(probe.status))
}

/// Detect the analysis status from a JSON string.
pub fn detect_status_from_str(json: &str) -> Result<AnalysisStatus> {
    detect_status_from_bytes(json.as_bytes())
}

/// Check if a file holds a finished analysis.
pub fn is_succeeded<P: AsRef<Path>>(path: P) -> bool {
    detect_status_from_path(path).is_ok_and(|s| s.is_succeeded())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_detect_succeeded() {
        let status = detect_status_from_str(r#"{"status": "succeeded", "analyzeResult": {}}"#).unwrap();
        assert_eq!(status, AnalysisStatus::Succeeded);
        assert!(status.is_succeeded());
    }

    #[test]
    fn test_detect_ignores_payload() {
        // A failed response carries an error object that is not a result
        let json = r#"{"status": "failed", "error": {"code": "InvalidRequest"}}"#;
        let status = detect_status_from_str(json).unwrap();
        assert_eq!(status, AnalysisStatus::Failed);
    }

    #[test]
    fn test_detect_unknown_status() {
        let status = detect_status_from_str(r#"{"status": "paused"}"#).unwrap();
        assert_eq!(status, AnalysisStatus::Other("paused".to_string()));
        assert_eq!(status.to_string(), "paused");
    }

    #[test]
    fn test_detect_invalid_json() {
        assert!(matches!(detect_status_from_str("not json"), Err(Error::Json(_))));
        assert!(matches!(detect_status_from_str(r#"{"status": "succeeded""#), Err(Error::Json(_))));
    }

    #[test]
    fn test_detect_missing_status() {
        assert_eq!(detect_status_from_str("{}").unwrap(), AnalysisStatus::Missing);
        assert_eq!(
            detect_status_from_str(r#"{"status": null}"#).unwrap(),
            AnalysisStatus::Missing
        );
        assert_eq!(detect_status_from_str("[]").unwrap(), AnalysisStatus::Missing);
        assert_eq!(detect_status_from_str("42").unwrap(), AnalysisStatus::Missing);
    }

    #[test]
    fn test_detect_non_string_status() {
        let status = detect_status_from_str(r#"{"status": true, "analyzeResult": {}}"#).unwrap();
        assert_eq!(status, AnalysisStatus::Other("true".to_string()));
        assert!(!status.is_succeeded());

        let status = detect_status_from_str(r#"{"status": ["succeeded"]}"#).unwrap();
        assert!(!status.is_succeeded());
    }

    #[test]
    fn test_is_succeeded_missing_file() {
        assert!(!is_succeeded("/nonexistent/analysis.json"));
    }
}

//! Job status model shared by the gate and the tracker.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Status of an ingestion job as reported by the external service.
///
/// The service speaks in literal strings; values outside the known four are
/// preserved verbatim in [`JobStatus::Other`] so callers can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Starting,
    InProgress,
    Complete,
    Failed,
    Other(String),
}

impl JobStatus {
    /// Parse a wire string into a status, never failing.
    pub fn parse(s: &str) -> Self {
        match s {
            "STARTING" => JobStatus::Starting,
            "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETE" => JobStatus::Complete,
            "FAILED" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Starting => "STARTING",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Complete => "COMPLETE",
            JobStatus::Failed => "FAILED",
            JobStatus::Other(s) => s,
        }
    }

    /// Terminal statuses: no further transitions will be observed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }

    /// Statuses that mean the service is still working on the job.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Starting | JobStatus::InProgress)
    }

    /// Whether the status is one of the four known values.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, JobStatus::Other(_))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        JobStatus::parse(s)
    }
}

impl Serialize for JobStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(JobStatus::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_statuses() {
        assert_eq!(JobStatus::parse("STARTING"), JobStatus::Starting);
        assert_eq!(JobStatus::parse("IN_PROGRESS"), JobStatus::InProgress);
        assert_eq!(JobStatus::parse("COMPLETE"), JobStatus::Complete);
        assert_eq!(JobStatus::parse("FAILED"), JobStatus::Failed);
    }

    #[test]
    fn parse_preserves_unknown_text() {
        let status = JobStatus::parse("STOPPING");
        assert_eq!(status, JobStatus::Other("STOPPING".to_string()));
        assert_eq!(status.as_str(), "STOPPING");
        assert!(!status.is_recognized());
    }

    #[test]
    fn terminal_and_active_sets_are_disjoint() {
        for s in ["STARTING", "IN_PROGRESS", "COMPLETE", "FAILED", "UNKNOWN"] {
            let status = JobStatus::parse(s);
            assert!(!(status.is_terminal() && status.is_active()), "{s}");
        }
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Starting.is_active());
        assert!(JobStatus::InProgress.is_active());
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&JobStatus::InProgress).unwrap();
        assert_eq!(json, r#""IN_PROGRESS""#);

        let status: JobStatus = serde_json::from_str(r#""COMPLETE""#).unwrap();
        assert_eq!(status, JobStatus::Complete);

        let status: JobStatus = serde_json::from_str(r#""WEIRD""#).unwrap();
        assert_eq!(status, JobStatus::Other("WEIRD".to_string()));
    }
}

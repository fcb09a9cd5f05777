//! Knowledge-base upload types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the upload history, as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadHistoryEntry {
    pub file_name: String,
    pub uploaded_by: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: DateTime<Utc>,
    pub inserted_count: u64,
    pub skipped_count: u64,
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.frac]` read as UTC (the
/// backend drops the offset when time zones are disabled).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

/// A file that passed local validation and is ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_from_server_json() {
        let json = r#"{
            "file_name": "faq.json",
            "uploaded_by": "admin",
            "uploaded_at": "2024-05-01T09:30:00.123456+05:45",
            "inserted_count": 12,
            "skipped_count": 3
        }"#;

        let entry: UploadHistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.file_name, "faq.json");
        assert_eq!(entry.uploaded_by, "admin");
        assert_eq!(entry.inserted_count, 12);
        assert_eq!(entry.skipped_count, 3);
        assert_eq!(entry.uploaded_at.to_rfc3339(), "2024-05-01T03:45:00.123456+00:00");
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let json = r#"{
            "file_name": "faq.json",
            "uploaded_by": "admin",
            "uploaded_at": "2024-05-01T09:30:00.123456",
            "inserted_count": 1,
            "skipped_count": 0
        }"#;

        let entry: UploadHistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.uploaded_at.to_rfc3339(), "2024-05-01T09:30:00.123456+00:00");
    }

    #[test]
    fn test_history_with_mixed_timestamps_keeps_every_row() {
        let json = r#"{"message": [
            {"file_name": "a.json", "uploaded_by": "admin", "uploaded_at": "2024-05-01T09:30:00Z",
             "inserted_count": 4, "skipped_count": 0},
            {"file_name": "b.json", "uploaded_by": "admin", "uploaded_at": "2024-05-01T09:30:00.123456",
             "inserted_count": 2, "skipped_count": 1}
        ]}"#;

        let response: crate::api::HistoryResponse = serde_json::from_str(json).unwrap();
        let entries = response.message.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].file_name, "b.json");
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        let json = r#"{"file_name": "a.json", "uploaded_by": "admin",
            "uploaded_at": "yesterday", "inserted_count": 0, "skipped_count": 0}"#;
        assert!(serde_json::from_str::<UploadHistoryEntry>(json).is_err());
    }
}

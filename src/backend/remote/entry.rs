//! Cloud Logging entry and write-request shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::backend::severity::{remote_severity, RemoteSeverity};
use crate::backend::{Payload, Record};
use crate::platform::MonitoredResource;

/// Full log name for a project / log id pair.
///
/// The log id is URL-encoded as required by the logging API, e.g.
/// `projects/p/logs/run.googleapis.com%2Frequest_log`.
pub fn log_name(project_id: &str, log_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(log_id.as_bytes()).collect();
    format!("projects/{}/logs/{}", project_id, encoded)
}

/// One entry as submitted to the logging API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub log_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_payload: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_payload: Option<Value>,

    pub severity: RemoteSeverity,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<MonitoredResource>,

    pub timestamp: DateTime<Utc>,

    pub insert_id: String,
}

impl LogEntry {
    pub fn from_record(
        record: &Record,
        log_name: &str,
        resource: Option<&MonitoredResource>,
    ) -> Self {
        // jsonPayload must be an object; anything else travels as text.
        let (text_payload, json_payload) = match &record.payload {
            Payload::Json(v @ Value::Object(_)) => (None, Some(v.clone())),
            other => (Some(other.to_string()), None),
        };

        Self {
            log_name: log_name.to_string(),
            text_payload,
            json_payload,
            severity: remote_severity(record.level),
            labels: record.fields.to_labels(),
            resource: resource.cloned(),
            timestamp: record.timestamp,
            insert_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// The payload rendered as a string, whichever variant it is.
    pub fn payload_text(&self) -> String {
        match (&self.text_payload, &self.json_payload) {
            (Some(text), _) => text.clone(),
            (None, Some(json)) => json.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Body of an `entries:write` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    pub entries: Vec<LogEntry>,
    pub partial_success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::logger::Level;

    #[test]
    fn test_log_name_encoding() {
        assert_eq!(
            log_name("my-proj", "appengine.googleapis.com/request_log"),
            "projects/my-proj/logs/appengine.googleapis.com%2Frequest_log"
        );
    }

    #[test]
    fn test_entry_serialization() {
        let record = Record::new(Level::Fatal, "boom".into(), fields! { "key2" => false });
        let resource = MonitoredResource::new("gae_app").with_label("module_id", "default");
        let entry = LogEntry::from_record(&record, "projects/p/logs/l", Some(&resource));

        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["logName"], "projects/p/logs/l");
        assert_eq!(v["textPayload"], "boom");
        assert_eq!(v["severity"], "CRITICAL");
        assert_eq!(v["labels"]["key2"], "false");
        assert_eq!(v["resource"]["type"], "gae_app");
        assert_eq!(v["resource"]["labels"]["module_id"], "default");
        assert!(v.get("jsonPayload").is_none());
        assert!(!entry.insert_id.is_empty());
    }

    #[test]
    fn test_non_object_json_payload_becomes_text() {
        let record = Record::new(Level::Info, serde_json::json!([1, 2]).into(), fields! {});
        let entry = LogEntry::from_record(&record, "l", None);
        assert_eq!(entry.text_payload.as_deref(), Some("[1,2]"));

        let record = Record::new(Level::Info, serde_json::json!({ "k": 1 }).into(), fields! {});
        let entry = LogEntry::from_record(&record, "l", None);
        assert_eq!(entry.json_payload, Some(serde_json::json!({ "k": 1 })));
        assert_eq!(entry.payload_text(), r#"{"k":1}"#);
    }
}

//! Activity feed entries and extensible metadata bags.
//!
//! Metadata arrives as free-form JSON objects. Known keys are lifted into
//! typed fields; everything else is kept verbatim in an `extra` side-map so
//! round-tripping never drops data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// A single value in a milestone's `customFields` bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomField {
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Other(Value),
}

impl CustomField {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CustomField::Text(text) => Some(text),
            _ => None,
        }
    }
}

pub type CustomFields = BTreeMap<String, CustomField>;

/// Known `details` keys for activity entries, plus the opaque remainder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub details: ActivityDetails,
}

/// Activity entries whose shape consumers know how to render.
#[derive(Debug, Clone, PartialEq)]
pub enum KnownActivity<'a> {
    TaskStatusChanged {
        task_id: &'a str,
        from: Option<&'a str>,
        to: &'a str,
    },
    MilestoneCompleted {
        milestone_id: &'a str,
    },
    FeedbackReceived {
        task_id: Option<&'a str>,
        rating: Option<u8>,
    },
    SessionJoined {
        session_id: &'a str,
    },
    Unknown {
        kind: &'a str,
        details: &'a BTreeMap<String, Value>,
    },
}

impl Activity {
    /// Classify into a known shape; entries missing required keys fall back
    /// to `Unknown` with the opaque side-map.
    pub fn classify(&self) -> KnownActivity<'_> {
        let d = &self.details;
        match self.kind.as_str() {
            "task-status-changed" => {
                if let (Some(task_id), Some(to)) = (d.task_id.as_deref(), d.new_status.as_deref()) {
                    return KnownActivity::TaskStatusChanged {
                        task_id,
                        from: d.previous_status.as_deref(),
                        to,
                    };
                }
            }
            "milestone-completed" => {
                if let Some(milestone_id) = d.milestone_id.as_deref() {
                    return KnownActivity::MilestoneCompleted { milestone_id };
                }
            }
            "feedback-received" => {
                return KnownActivity::FeedbackReceived {
                    task_id: d.task_id.as_deref(),
                    rating: d.rating,
                };
            }
            "session-joined" => {
                if let Some(session_id) = d.session_id.as_deref() {
                    return KnownActivity::SessionJoined { session_id };
                }
            }
            _ => {}
        }
        KnownActivity::Unknown {
            kind: &self.kind,
            details: &d.extra,
        }
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::projects::MentorRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentoringSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub mentor: MentorRef,
    pub status: SessionStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl MentoringSession {
    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.participant_ids.len() >= max as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreateRequest {
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    Upcoming,
    InProgress,
    Submitted,
    Completed,
    Blocked,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Upcoming => "upcoming",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Submitted => "submitted",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachment_urls: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFeedbackEntry {
    pub id: String,
    pub author_id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Dependency lists form a directed graph; cycles are not checked client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTask {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub blocked_by: Vec<String>,
    #[serde(default)]
    pub is_blocking: Vec<String>,
    #[serde(default)]
    pub submissions: Vec<TaskSubmission>,
    #[serde(default)]
    pub feedback_history: Vec<TaskFeedbackEntry>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateRequest {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_uses_kebab_case() {
        let status: TaskStatus = serde_json::from_str(r#""in-progress""#).expect("parse");
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(status.as_str(), "in-progress");
    }

    #[test]
    fn task_parses_dependency_lists() {
        let task: ProjectTask = serde_json::from_str(
            r#"{"id":"t2","title":"Lexer","status":"blocked","priority":"high","dependsOn":["t1"],"blockedBy":["t1"]}"#,
        )
        .expect("parse task");
        assert_eq!(task.depends_on, vec!["t1".to_string()]);
        assert!(task.is_blocking.is_empty());
        assert!(task.due_date.is_none());
    }
}

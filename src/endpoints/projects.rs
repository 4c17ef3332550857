//! `/projects` and its nested task, area and feedback collections.

use learnhub_api_types::{
    FeedbackCreateRequest, ProjectCreateRequest, ProjectStatus, ProjectUpdateRequest,
    TaskCreateRequest, TaskUpdateRequest,
};
use reqwest::Method;
use serde_json::Value;

use super::{ApiRequest, item_tags, require, to_body};
use crate::cache::{CacheTag, TagSet, TagType};
use crate::error::ClientError;

const ROOT: &str = "projects";

/// Server-side list filter. `None` fields are omitted from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectListFilter {
    pub status: Option<ProjectStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectQuery {
    List(ProjectListFilter),
    Get { project_id: String },
    Tasks { project_id: String },
    Task { project_id: String, task_id: String },
    Areas { project_id: String },
    Feedback { project_id: String },
}

impl ProjectQuery {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "projects.list",
            Self::Get { .. } => "projects.get",
            Self::Tasks { .. } => "projects.tasks",
            Self::Task { .. } => "projects.task",
            Self::Areas { .. } => "projects.areas",
            Self::Feedback { .. } => "projects.feedback",
        }
    }

    pub fn request(&self) -> ApiRequest {
        match self {
            Self::List(filter) => ApiRequest::get([ROOT])
                .with_opt_query("status", filter.status.map(ProjectStatus::as_str))
                .with_opt_query("search", filter.search.as_deref())
                .with_opt_query("page", filter.page)
                .with_opt_query("limit", filter.limit),
            Self::Get { project_id } => ApiRequest::get([ROOT, project_id.as_str()]),
            Self::Tasks { project_id } => ApiRequest::get([ROOT, project_id.as_str(), "tasks"]),
            Self::Task {
                project_id,
                task_id,
            } => ApiRequest::get([ROOT, project_id.as_str(), "tasks", task_id.as_str()]),
            Self::Areas { project_id } => ApiRequest::get([ROOT, project_id.as_str(), "areas"]),
            Self::Feedback { project_id } => {
                ApiRequest::get([ROOT, project_id.as_str(), "feedback"])
            }
        }
    }

    pub fn provides(&self, envelope: &Value) -> TagSet {
        let mut tags = TagSet::new();
        match self {
            Self::List(_) => {
                tags.insert(CacheTag::list(TagType::Project));
                tags.extend(item_tags(TagType::Project, envelope));
            }
            Self::Get { project_id } => {
                tags.insert(CacheTag::id(TagType::Project, project_id));
            }
            Self::Tasks { project_id } => {
                tags.insert(CacheTag::id(TagType::ProjectTask, project_id));
                tags.extend(item_tags(TagType::ProjectTask, envelope));
            }
            Self::Task { task_id, .. } => {
                tags.insert(CacheTag::id(TagType::ProjectTask, task_id));
            }
            Self::Areas { project_id } => {
                tags.insert(CacheTag::id(TagType::ProjectArea, project_id));
            }
            Self::Feedback { project_id } => {
                tags.insert(CacheTag::id(TagType::Feedback, project_id));
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectMutation {
    Create {
        body: ProjectCreateRequest,
    },
    Update {
        project_id: String,
        body: ProjectUpdateRequest,
    },
    Delete {
        project_id: String,
    },
    CreateTask {
        project_id: String,
        body: TaskCreateRequest,
    },
    UpdateTask {
        project_id: String,
        task_id: String,
        body: TaskUpdateRequest,
    },
    DeleteTask {
        project_id: String,
        task_id: String,
    },
    SubmitFeedback {
        project_id: String,
        body: FeedbackCreateRequest,
    },
}

impl ProjectMutation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "projects.create",
            Self::Update { .. } => "projects.update",
            Self::Delete { .. } => "projects.delete",
            Self::CreateTask { .. } => "projects.create_task",
            Self::UpdateTask { .. } => "projects.update_task",
            Self::DeleteTask { .. } => "projects.delete_task",
            Self::SubmitFeedback { .. } => "projects.submit_feedback",
        }
    }

    pub fn request(&self) -> Result<ApiRequest, ClientError> {
        let req = match self {
            Self::Create { body } => {
                require("title", &body.title)?;
                ApiRequest::new(Method::POST, [ROOT]).with_body(to_body(body)?)
            }
            Self::Update { project_id, body } => {
                ApiRequest::new(Method::PATCH, [ROOT, project_id.as_str()])
                    .with_body(to_body(body)?)
            }
            Self::Delete { project_id } => {
                ApiRequest::new(Method::DELETE, [ROOT, project_id.as_str()])
            }
            Self::CreateTask { project_id, body } => {
                require("title", &body.title)?;
                ApiRequest::new(Method::POST, [ROOT, project_id.as_str(), "tasks"])
                    .with_body(to_body(body)?)
            }
            Self::UpdateTask {
                project_id,
                task_id,
                body,
            } => ApiRequest::new(
                Method::PATCH,
                [ROOT, project_id.as_str(), "tasks", task_id.as_str()],
            )
            .with_body(to_body(body)?),
            Self::DeleteTask {
                project_id,
                task_id,
            } => ApiRequest::new(
                Method::DELETE,
                [ROOT, project_id.as_str(), "tasks", task_id.as_str()],
            ),
            Self::SubmitFeedback { project_id, body } => {
                if !(1..=5).contains(&body.rating) {
                    return Err(ClientError::invalid_input(format!(
                        "rating must be between 1 and 5, got {}",
                        body.rating
                    )));
                }
                ApiRequest::new(Method::POST, [ROOT, project_id.as_str(), "feedback"])
                    .with_body(to_body(body)?)
            }
        };
        Ok(req)
    }

    pub fn invalidates(&self) -> TagSet {
        use TagType::{Feedback, Project, ProjectDashboard, ProjectTask};

        let mut tags = TagSet::new();
        match self {
            Self::Create { .. } => {
                tags.insert(CacheTag::list(Project));
            }
            Self::Update { project_id, .. } => {
                tags.insert(CacheTag::id(Project, project_id));
                tags.insert(CacheTag::list(Project));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::Delete { project_id } => {
                tags.insert(CacheTag::id(Project, project_id));
                tags.insert(CacheTag::list(Project));
            }
            Self::CreateTask { project_id, .. } => {
                tags.insert(CacheTag::id(ProjectTask, project_id));
                tags.insert(CacheTag::id(Project, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::UpdateTask {
                project_id,
                task_id,
                ..
            }
            | Self::DeleteTask {
                project_id,
                task_id,
            } => {
                tags.insert(CacheTag::id(ProjectTask, task_id));
                tags.insert(CacheTag::id(ProjectTask, project_id));
                tags.insert(CacheTag::id(Project, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::SubmitFeedback { project_id, .. } => {
                tags.insert(CacheTag::id(Feedback, project_id));
                tags.insert(CacheTag::id(Project, project_id));
            }
        }
        tags
    }
}

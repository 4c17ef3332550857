//! `/learning-paths/{projectId}/...` and `/milestone-templates`.

use learnhub_api_types::{
    ExportFormat, MilestoneCreateRequest, MilestoneReorderRequest, MilestoneTemplateCreateRequest,
    MilestoneUpdateRequest, ProgressUpdateRequest, SkillBulkUpdateRequest, SkillCreateRequest,
    SkillUpdateRequest, TemplateApplyRequest,
};
use reqwest::Method;
use serde_json::Value;

use super::{ApiRequest, item_tags, require, to_body};
use crate::cache::{CacheTag, TagSet, TagType};
use crate::error::ClientError;

const ROOT: &str = "learning-paths";
const TEMPLATES: &str = "milestone-templates";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LearningPathQuery {
    Dashboard { project_id: String },
    Get { project_id: String },
    Progress { project_id: String },
    Milestones { project_id: String },
    Milestone { project_id: String, milestone_id: String },
    Skills { project_id: String },
    Analytics { project_id: String },
    Bottlenecks { project_id: String },
    Templates,
}

impl LearningPathQuery {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard { .. } => "learning_path.dashboard",
            Self::Get { .. } => "learning_path.get",
            Self::Progress { .. } => "learning_path.progress",
            Self::Milestones { .. } => "learning_path.milestones",
            Self::Milestone { .. } => "learning_path.milestone",
            Self::Skills { .. } => "learning_path.skills",
            Self::Analytics { .. } => "learning_path.analytics",
            Self::Bottlenecks { .. } => "learning_path.bottlenecks",
            Self::Templates => "milestone_templates.list",
        }
    }

    pub fn request(&self) -> ApiRequest {
        match self {
            Self::Dashboard { project_id } => {
                ApiRequest::get([ROOT, project_id.as_str(), "dashboard"])
            }
            Self::Get { project_id } => ApiRequest::get([ROOT, project_id.as_str()]),
            Self::Progress { project_id } => {
                ApiRequest::get([ROOT, project_id.as_str(), "progress"])
            }
            Self::Milestones { project_id } => {
                ApiRequest::get([ROOT, project_id.as_str(), "milestones"])
            }
            Self::Milestone {
                project_id,
                milestone_id,
            } => ApiRequest::get([
                ROOT,
                project_id.as_str(),
                "milestones",
                milestone_id.as_str(),
            ]),
            Self::Skills { project_id } => ApiRequest::get([ROOT, project_id.as_str(), "skills"]),
            Self::Analytics { project_id } => {
                ApiRequest::get([ROOT, project_id.as_str(), "analytics"])
            }
            Self::Bottlenecks { project_id } => {
                ApiRequest::get([ROOT, project_id.as_str(), "bottlenecks"])
            }
            Self::Templates => ApiRequest::get([TEMPLATES]),
        }
    }

    pub fn provides(&self, envelope: &Value) -> TagSet {
        let mut tags = TagSet::new();
        match self {
            Self::Dashboard { project_id } => {
                tags.insert(CacheTag::id(TagType::ProjectDashboard, project_id));
                tags.insert(CacheTag::id(TagType::ProjectLearningPath, project_id));
            }
            Self::Get { project_id } => {
                tags.insert(CacheTag::id(TagType::ProjectLearningPath, project_id));
            }
            Self::Progress { project_id } => {
                tags.insert(CacheTag::id(TagType::LearningProgress, project_id));
            }
            Self::Milestones { project_id } => {
                tags.insert(CacheTag::list(TagType::LearningMilestone));
                tags.insert(CacheTag::id(TagType::LearningMilestone, project_id));
                tags.extend(item_tags(TagType::LearningMilestone, envelope));
            }
            Self::Milestone { milestone_id, .. } => {
                tags.insert(CacheTag::id(TagType::LearningMilestone, milestone_id));
            }
            Self::Skills { project_id } => {
                tags.insert(CacheTag::id(TagType::ProjectSkill, project_id));
                tags.extend(item_tags(TagType::ProjectSkill, envelope));
            }
            Self::Analytics { project_id } | Self::Bottlenecks { project_id } => {
                tags.insert(CacheTag::id(TagType::LearningAnalytics, project_id));
            }
            Self::Templates => {
                tags.insert(CacheTag::list(TagType::MilestoneTemplate));
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LearningPathMutation {
    UpdateProgress {
        project_id: String,
        body: ProgressUpdateRequest,
    },
    CreateMilestone {
        project_id: String,
        body: MilestoneCreateRequest,
    },
    UpdateMilestone {
        project_id: String,
        milestone_id: String,
        body: MilestoneUpdateRequest,
    },
    DeleteMilestone {
        project_id: String,
        milestone_id: String,
    },
    ReorderMilestones {
        project_id: String,
        body: MilestoneReorderRequest,
    },
    ApplyTemplate {
        project_id: String,
        body: TemplateApplyRequest,
    },
    CreateSkill {
        project_id: String,
        body: SkillCreateRequest,
    },
    UpdateSkill {
        project_id: String,
        skill_id: String,
        body: SkillUpdateRequest,
    },
    DeleteSkill {
        project_id: String,
        skill_id: String,
    },
    BulkUpdateSkills {
        project_id: String,
        body: SkillBulkUpdateRequest,
    },
    CreateTemplate {
        body: MilestoneTemplateCreateRequest,
    },
}

impl LearningPathMutation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateProgress { .. } => "learning_path.update_progress",
            Self::CreateMilestone { .. } => "learning_path.create_milestone",
            Self::UpdateMilestone { .. } => "learning_path.update_milestone",
            Self::DeleteMilestone { .. } => "learning_path.delete_milestone",
            Self::ReorderMilestones { .. } => "learning_path.reorder_milestones",
            Self::ApplyTemplate { .. } => "learning_path.apply_template",
            Self::CreateSkill { .. } => "learning_path.create_skill",
            Self::UpdateSkill { .. } => "learning_path.update_skill",
            Self::DeleteSkill { .. } => "learning_path.delete_skill",
            Self::BulkUpdateSkills { .. } => "learning_path.bulk_update_skills",
            Self::CreateTemplate { .. } => "milestone_templates.create",
        }
    }

    pub fn request(&self) -> Result<ApiRequest, ClientError> {
        let req = match self {
            Self::UpdateProgress { project_id, body } => {
                ApiRequest::new(Method::PATCH, [ROOT, project_id.as_str(), "progress"])
                    .with_body(to_body(body)?)
            }
            Self::CreateMilestone { project_id, body } => {
                require("title", &body.title)?;
                ApiRequest::new(Method::POST, [ROOT, project_id.as_str(), "milestones"])
                    .with_body(to_body(body)?)
            }
            Self::UpdateMilestone {
                project_id,
                milestone_id,
                body,
            } => ApiRequest::new(
                Method::PATCH,
                [ROOT, project_id.as_str(), "milestones", milestone_id.as_str()],
            )
            .with_body(to_body(body)?),
            Self::DeleteMilestone {
                project_id,
                milestone_id,
            } => ApiRequest::new(
                Method::DELETE,
                [ROOT, project_id.as_str(), "milestones", milestone_id.as_str()],
            ),
            Self::ReorderMilestones { project_id, body } => {
                ApiRequest::new(Method::POST, [ROOT, project_id.as_str(), "milestones", "reorder"])
                    .with_body(to_body(body)?)
            }
            Self::ApplyTemplate { project_id, body } => {
                ApiRequest::new(
                    Method::POST,
                    [ROOT, project_id.as_str(), "milestones", "apply-template"],
                )
                .with_body(to_body(body)?)
            }
            Self::CreateSkill { project_id, body } => {
                require("name", &body.name)?;
                ApiRequest::new(Method::POST, [ROOT, project_id.as_str(), "skills"])
                    .with_body(to_body(body)?)
            }
            Self::UpdateSkill {
                project_id,
                skill_id,
                body,
            } => ApiRequest::new(
                Method::PATCH,
                [ROOT, project_id.as_str(), "skills", skill_id.as_str()],
            )
            .with_body(to_body(body)?),
            Self::DeleteSkill {
                project_id,
                skill_id,
            } => ApiRequest::new(
                Method::DELETE,
                [ROOT, project_id.as_str(), "skills", skill_id.as_str()],
            ),
            Self::BulkUpdateSkills { project_id, body } => {
                ApiRequest::new(Method::PUT, [ROOT, project_id.as_str(), "skills", "bulk"])
                    .with_body(to_body(body)?)
            }
            Self::CreateTemplate { body } => {
                require("name", &body.name)?;
                ApiRequest::new(Method::POST, [TEMPLATES]).with_body(to_body(body)?)
            }
        };
        Ok(req)
    }

    pub fn invalidates(&self) -> TagSet {
        use TagType::{
            LearningMilestone, LearningProgress, MilestoneTemplate, ProjectDashboard,
            ProjectLearningPath, ProjectSkill,
        };

        let mut tags = TagSet::new();
        match self {
            Self::UpdateProgress { project_id, .. } => {
                tags.insert(CacheTag::id(LearningProgress, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::CreateMilestone { project_id, .. } => {
                tags.insert(CacheTag::id(LearningMilestone, project_id));
                tags.insert(CacheTag::id(ProjectLearningPath, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::UpdateMilestone {
                project_id,
                milestone_id,
                ..
            }
            | Self::DeleteMilestone {
                project_id,
                milestone_id,
            } => {
                tags.insert(CacheTag::id(LearningMilestone, milestone_id));
                tags.insert(CacheTag::id(LearningMilestone, project_id));
                tags.insert(CacheTag::id(ProjectLearningPath, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::ReorderMilestones { project_id, .. } => {
                tags.insert(CacheTag::id(LearningMilestone, project_id));
                tags.insert(CacheTag::id(ProjectLearningPath, project_id));
            }
            Self::ApplyTemplate { project_id, .. } => {
                tags.insert(CacheTag::list(LearningMilestone));
                tags.insert(CacheTag::id(LearningMilestone, project_id));
                tags.insert(CacheTag::id(ProjectLearningPath, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::CreateSkill { project_id, .. } | Self::BulkUpdateSkills { project_id, .. } => {
                tags.insert(CacheTag::id(ProjectSkill, project_id));
                tags.insert(CacheTag::id(ProjectLearningPath, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::UpdateSkill {
                project_id,
                skill_id,
                ..
            } => {
                tags.insert(CacheTag::id(ProjectSkill, skill_id));
                tags.insert(CacheTag::id(ProjectSkill, project_id));
                tags.insert(CacheTag::id(ProjectLearningPath, project_id));
            }
            Self::DeleteSkill {
                project_id,
                skill_id,
            } => {
                tags.insert(CacheTag::id(ProjectSkill, skill_id));
                tags.insert(CacheTag::id(ProjectSkill, project_id));
                tags.insert(CacheTag::id(ProjectLearningPath, project_id));
                tags.insert(CacheTag::id(ProjectDashboard, project_id));
            }
            Self::CreateTemplate { .. } => {
                tags.insert(CacheTag::list(MilestoneTemplate));
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearningPathDownload {
    Export {
        project_id: String,
        format: ExportFormat,
    },
}

impl LearningPathDownload {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Export { .. } => "learning_path.export",
        }
    }

    pub fn request(&self) -> ApiRequest {
        match self {
            Self::Export { project_id, format } => {
                ApiRequest::get([ROOT, project_id.as_str(), "export"])
                    .with_query("format", format.as_str())
            }
        }
    }
}

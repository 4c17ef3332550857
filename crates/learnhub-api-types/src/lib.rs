//! Request and response shapes for the LearnHub REST API.
//!
//! Everything here is plain data: field names follow the wire format
//! (camelCase objects, kebab-case enumerations) and no invariants are
//! enforced client-side.

pub mod activity;
pub mod envelope;
pub mod feedback;
pub mod learning_paths;
pub mod projects;
pub mod sessions;
pub mod tasks;

pub use activity::{Activity, ActivityDetails, CustomField, CustomFields, KnownActivity};
pub use envelope::{ApiErrorBody, ApiResponse, CursorPage, OffsetPagination};
pub use feedback::{Feedback, FeedbackCreateRequest};
pub use learning_paths::{
    BottleneckReport, CompletionNode, ExportFormat, LearningAnalytics, LearningDashboard,
    LearningMilestone, MilestoneCreateRequest, MilestoneReorderRequest, MilestoneTemplate,
    MilestoneTemplateCreateRequest, MilestoneType, MilestoneUpdateRequest, NodeStatus,
    ProgressUpdateRequest, ProjectLearningPath, ProjectLearningProgress, ProjectSkill,
    SkillBulkUpdateRequest, SkillCreateRequest, SkillLevel, SkillUpdateRequest,
    TemplateApplyRequest,
};
pub use projects::{
    AreaStatus, GradingCriterion, GradingSchema, MentorRef, Project, ProjectArea,
    ProjectCreateRequest, ProjectStatus, ProjectUpdateRequest,
};
pub use sessions::{MentoringSession, SessionCreateRequest, SessionStatus};
pub use tasks::{
    ProjectTask, TaskCreateRequest, TaskFeedbackEntry, TaskPriority, TaskStatus, TaskSubmission,
    TaskUpdateRequest,
};

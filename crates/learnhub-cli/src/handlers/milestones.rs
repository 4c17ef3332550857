#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::sync::Arc;

use learnhub::MilestoneEditor;
use learnhub::endpoints::{LearningPathMutation, LearningPathQuery};
use learnhub_api_types::{
    CustomFields, MilestoneCreateRequest, MilestoneReorderRequest, MilestoneType,
    MilestoneUpdateRequest, NodeStatus, TemplateApplyRequest,
};
use tracing::debug;

use crate::args::{MilestoneTypeArg, MilestonesCmd, NodeStatusArg};
use crate::client::{CliError, Ctx};
use crate::io::{read_json_file, read_opt_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: MilestonesCmd) -> Result<(), CliError> {
    match cmd {
        MilestonesCmd::List { project } => {
            let res = ctx
                .client
                .query(LearningPathQuery::Milestones {
                    project_id: project,
                })
                .await?;
            print_json(res.as_ref())
        }
        MilestonesCmd::Get { project, milestone } => {
            let res = ctx
                .client
                .query(LearningPathQuery::Milestone {
                    project_id: project,
                    milestone_id: milestone,
                })
                .await?;
            print_json(res.as_ref())
        }
        MilestonesCmd::Create {
            project,
            title,
            description,
            description_file,
            milestone_type,
            required_tasks,
            skills_awarded,
            order,
        } => {
            let body = MilestoneCreateRequest {
                title,
                description: read_opt_value(description, description_file)?.unwrap_or_default(),
                milestone_type: milestone_type.into(),
                required_task_ids: required_tasks,
                required_area_ids: Vec::new(),
                required_skills: Vec::new(),
                skills_awarded,
                order,
                custom_fields: CustomFields::default(),
            };
            mutate(
                ctx,
                LearningPathMutation::CreateMilestone {
                    project_id: project,
                    body,
                },
            )
            .await
        }
        MilestonesCmd::Update {
            project,
            milestone,
            title,
            description,
            status,
        } => {
            let body = MilestoneUpdateRequest {
                title,
                description,
                status: status.map(Into::into),
                ..Default::default()
            };
            mutate(
                ctx,
                LearningPathMutation::UpdateMilestone {
                    project_id: project,
                    milestone_id: milestone,
                    body,
                },
            )
            .await
        }
        MilestonesCmd::Delete { project, milestone } => {
            mutate(
                ctx,
                LearningPathMutation::DeleteMilestone {
                    project_id: project,
                    milestone_id: milestone,
                },
            )
            .await
        }
        MilestonesCmd::Reorder {
            project,
            milestone_ids,
        } => {
            mutate(
                ctx,
                LearningPathMutation::ReorderMilestones {
                    project_id: project,
                    body: MilestoneReorderRequest { milestone_ids },
                },
            )
            .await
        }
        MilestonesCmd::ApplyTemplate { project, template } => {
            mutate(
                ctx,
                LearningPathMutation::ApplyTemplate {
                    project_id: project,
                    body: TemplateApplyRequest {
                        template_id: template,
                    },
                },
            )
            .await
        }
        MilestonesCmd::Draft {
            project,
            file,
            dry_run,
        } => draft(ctx, project, file, dry_run).await,
    }
}

async fn mutate(ctx: &Ctx, mutation: LearningPathMutation) -> Result<(), CliError> {
    let res = ctx.client.mutate(mutation).await?;
    print_json(res.as_ref())
}

/// Stage every milestone in `file` as a draft, then create them in order.
async fn draft(ctx: &Ctx, project: String, file: PathBuf, dry_run: bool) -> Result<(), CliError> {
    let bodies: Vec<MilestoneCreateRequest> = read_json_file(&file)?;
    let mut editor = MilestoneEditor::draft(Arc::clone(&ctx.client));
    for body in bodies {
        editor.add(body).await?;
    }
    debug!(project_id = %project, dry_run, "Staged draft milestones");

    if dry_run {
        return print_json(&editor.list().await?);
    }
    let created = editor.persist(project).await?;
    print_json(&created)
}

impl From<MilestoneTypeArg> for MilestoneType {
    fn from(value: MilestoneTypeArg) -> Self {
        match value {
            MilestoneTypeArg::ProjectStart => MilestoneType::ProjectStart,
            MilestoneTypeArg::AreaComplete => MilestoneType::AreaComplete,
            MilestoneTypeArg::SkillMastery => MilestoneType::SkillMastery,
            MilestoneTypeArg::ProjectComplete => MilestoneType::ProjectComplete,
            MilestoneTypeArg::Custom => MilestoneType::Custom,
        }
    }
}

impl From<NodeStatusArg> for NodeStatus {
    fn from(value: NodeStatusArg) -> Self {
        match value {
            NodeStatusArg::Locked => NodeStatus::Locked,
            NodeStatusArg::Available => NodeStatus::Available,
            NodeStatusArg::InProgress => NodeStatus::InProgress,
            NodeStatusArg::Completed => NodeStatus::Completed,
            NodeStatusArg::Failed => NodeStatus::Failed,
            NodeStatusArg::Skipped => NodeStatus::Skipped,
        }
    }
}

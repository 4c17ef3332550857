#![deny(clippy::all, clippy::pedantic)]

use learnhub::endpoints::{ProjectListFilter, ProjectMutation, ProjectQuery};
use learnhub::view::tasks_for_area;
use learnhub_api_types::{
    Project, ProjectArea, ProjectCreateRequest, ProjectStatus, ProjectTask, ProjectUpdateRequest,
};

use crate::args::{ProjectStatusArg, ProjectsCmd};
use crate::client::{CliError, Ctx};
use crate::io::{parse_time_opt, read_opt_value};
use crate::print::{print_json, print_lines};
use crate::render::project_lines;

pub async fn handle(ctx: &Ctx, cmd: ProjectsCmd) -> Result<(), CliError> {
    match cmd {
        ProjectsCmd::List {
            status,
            search,
            page,
            limit,
            human,
        } => {
            let filter = ProjectListFilter {
                status: status.map(Into::into),
                search,
                page,
                limit,
            };
            if human {
                list_human(ctx, filter).await
            } else {
                query(ctx, ProjectQuery::List(filter)).await
            }
        }
        ProjectsCmd::Get { project } => {
            query(ctx, ProjectQuery::Get { project_id: project }).await
        }
        ProjectsCmd::Create {
            title,
            description,
            description_file,
            members,
            start_date,
            end_date,
        } => {
            let body = ProjectCreateRequest {
                title,
                description: read_opt_value(description, description_file)?.unwrap_or_default(),
                member_ids: members,
                mentor_ids: Vec::new(),
                start_date: parse_time_opt(start_date)?,
                end_date: parse_time_opt(end_date)?,
            };
            mutate(ctx, ProjectMutation::Create { body }).await
        }
        ProjectsCmd::Update {
            project,
            title,
            description,
            status,
            progress,
        } => {
            let body = ProjectUpdateRequest {
                title,
                description,
                status: status.map(Into::into),
                progress,
            };
            mutate(
                ctx,
                ProjectMutation::Update {
                    project_id: project,
                    body,
                },
            )
            .await
        }
        ProjectsCmd::Delete { project } => {
            mutate(ctx, ProjectMutation::Delete { project_id: project }).await
        }
        ProjectsCmd::Areas { project } => {
            query(ctx, ProjectQuery::Areas { project_id: project }).await
        }
        ProjectsCmd::AreaTasks { project, area } => area_tasks(ctx, project, &area).await,
    }
}

async fn query(ctx: &Ctx, query: ProjectQuery) -> Result<(), CliError> {
    let res = ctx.client.query(query).await?;
    print_json(res.as_ref())
}

async fn list_human(ctx: &Ctx, filter: ProjectListFilter) -> Result<(), CliError> {
    let page = ctx
        .client
        .query_data::<Vec<Project>>(ProjectQuery::List(filter))
        .await?;
    print_lines(&project_lines(&page.data.unwrap_or_default()))
}

async fn mutate(ctx: &Ctx, mutation: ProjectMutation) -> Result<(), CliError> {
    let res = ctx.client.mutate(mutation).await?;
    print_json(res.as_ref())
}

async fn area_tasks(ctx: &Ctx, project_id: String, area_id: &str) -> Result<(), CliError> {
    let (areas, tasks) = tokio::try_join!(
        ctx.client.query_data::<Vec<ProjectArea>>(ProjectQuery::Areas {
            project_id: project_id.clone(),
        }),
        ctx.client.query_data::<Vec<ProjectTask>>(ProjectQuery::Tasks {
            project_id: project_id.clone(),
        }),
    )?;

    let areas = areas.data.unwrap_or_default();
    let tasks = tasks.data.unwrap_or_default();
    let area = areas.iter().find(|a| a.id == area_id).ok_or_else(|| {
        CliError::InvalidInput(format!("area `{area_id}` not found in project `{project_id}`"))
    })?;

    print_json(&tasks_for_area(area, &tasks))
}

impl From<ProjectStatusArg> for ProjectStatus {
    fn from(value: ProjectStatusArg) -> Self {
        match value {
            ProjectStatusArg::Active => ProjectStatus::Active,
            ProjectStatusArg::Completed => ProjectStatus::Completed,
            ProjectStatusArg::Archived => ProjectStatus::Archived,
            ProjectStatusArg::OnHold => ProjectStatus::OnHold,
        }
    }
}

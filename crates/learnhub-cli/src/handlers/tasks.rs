#![deny(clippy::all, clippy::pedantic)]

use learnhub::endpoints::{ProjectMutation, ProjectQuery};
use learnhub_api_types::{TaskCreateRequest, TaskPriority, TaskStatus, TaskUpdateRequest};

use crate::args::{TaskPriorityArg, TaskStatusArg, TasksCmd};
use crate::client::{CliError, Ctx};
use crate::io::parse_time_opt;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: TasksCmd) -> Result<(), CliError> {
    let mutation = match cmd {
        TasksCmd::List { project } => {
            return query(ctx, ProjectQuery::Tasks { project_id: project }).await;
        }
        TasksCmd::Get { project, task } => {
            return query(
                ctx,
                ProjectQuery::Task {
                    project_id: project,
                    task_id: task,
                },
            )
            .await;
        }
        TasksCmd::Create {
            project,
            title,
            description,
            priority,
            area,
            depends_on,
            due,
        } => ProjectMutation::CreateTask {
            project_id: project,
            body: TaskCreateRequest {
                title,
                description: description.unwrap_or_default(),
                priority: priority.into(),
                area_id: area,
                depends_on,
                due_date: parse_time_opt(due)?,
            },
        },
        TasksCmd::Update {
            project,
            task,
            title,
            description,
            status,
            priority,
        } => ProjectMutation::UpdateTask {
            project_id: project,
            task_id: task,
            body: TaskUpdateRequest {
                title,
                description,
                status: status.map(Into::into),
                priority: priority.map(Into::into),
            },
        },
        TasksCmd::Delete { project, task } => ProjectMutation::DeleteTask {
            project_id: project,
            task_id: task,
        },
    };

    let res = ctx.client.mutate(mutation).await?;
    print_json(res.as_ref())
}

async fn query(ctx: &Ctx, query: ProjectQuery) -> Result<(), CliError> {
    let res = ctx.client.query(query).await?;
    print_json(res.as_ref())
}

impl From<TaskStatusArg> for TaskStatus {
    fn from(value: TaskStatusArg) -> Self {
        match value {
            TaskStatusArg::Todo => TaskStatus::Todo,
            TaskStatusArg::Upcoming => TaskStatus::Upcoming,
            TaskStatusArg::InProgress => TaskStatus::InProgress,
            TaskStatusArg::Submitted => TaskStatus::Submitted,
            TaskStatusArg::Completed => TaskStatus::Completed,
            TaskStatusArg::Blocked => TaskStatus::Blocked,
            TaskStatusArg::Overdue => TaskStatus::Overdue,
        }
    }
}

impl From<TaskPriorityArg> for TaskPriority {
    fn from(value: TaskPriorityArg) -> Self {
        match value {
            TaskPriorityArg::Low => TaskPriority::Low,
            TaskPriorityArg::Medium => TaskPriority::Medium,
            TaskPriorityArg::High => TaskPriority::High,
            TaskPriorityArg::Urgent => TaskPriority::Urgent,
        }
    }
}

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use learnhub::endpoints::{LearningPathDownload, LearningPathMutation, LearningPathQuery};
use learnhub_api_types::{ExportFormat, ProgressUpdateRequest};

use crate::args::{ExportFormatArg, PathsCmd};
use crate::client::{CliError, Ctx};
use crate::io::write_output;
use crate::print::{print_bytes, print_json};

pub async fn handle(ctx: &Ctx, cmd: PathsCmd) -> Result<(), CliError> {
    match cmd {
        PathsCmd::Dashboard { project } => {
            query(ctx, LearningPathQuery::Dashboard { project_id: project }).await
        }
        PathsCmd::Get { project } => {
            query(ctx, LearningPathQuery::Get { project_id: project }).await
        }
        PathsCmd::Progress { project } => {
            query(ctx, LearningPathQuery::Progress { project_id: project }).await
        }
        PathsCmd::UpdateProgress {
            project,
            current_milestone,
            completed,
            minutes,
        } => {
            let body = ProgressUpdateRequest {
                current_milestone_id: current_milestone,
                completed_milestone_ids: completed,
                minutes_spent: minutes,
            };
            update_progress(ctx, project, body).await
        }
        PathsCmd::Analytics { project } => {
            query(ctx, LearningPathQuery::Analytics { project_id: project }).await
        }
        PathsCmd::Bottlenecks { project } => {
            query(ctx, LearningPathQuery::Bottlenecks { project_id: project }).await
        }
        PathsCmd::Export {
            project,
            format,
            output,
        } => export(ctx, project, format, output).await,
    }
}

async fn query(ctx: &Ctx, query: LearningPathQuery) -> Result<(), CliError> {
    let res = ctx.client.query(query).await?;
    print_json(res.as_ref())
}

async fn update_progress(
    ctx: &Ctx,
    project_id: String,
    body: ProgressUpdateRequest,
) -> Result<(), CliError> {
    let res = ctx
        .client
        .mutate(LearningPathMutation::UpdateProgress { project_id, body })
        .await?;
    print_json(res.as_ref())
}

async fn export(
    ctx: &Ctx,
    project_id: String,
    format: ExportFormatArg,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let bytes = ctx
        .client
        .download(LearningPathDownload::Export {
            project_id,
            format: format.into(),
        })
        .await?;
    match output {
        Some(path) => {
            write_output(&path, &bytes).await?;
            println!("wrote {} bytes to {}", bytes.len(), path.display());
            Ok(())
        }
        None => print_bytes(&bytes),
    }
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(value: ExportFormatArg) -> Self {
        match value {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

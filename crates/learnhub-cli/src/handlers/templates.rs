#![deny(clippy::all, clippy::pedantic)]

use learnhub::endpoints::{LearningPathMutation, LearningPathQuery};
use learnhub_api_types::{MilestoneCreateRequest, MilestoneTemplateCreateRequest};

use crate::args::TemplatesCmd;
use crate::client::{CliError, Ctx};
use crate::io::read_json_file;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: TemplatesCmd) -> Result<(), CliError> {
    match cmd {
        TemplatesCmd::List => {
            let res = ctx.client.query(LearningPathQuery::Templates).await?;
            print_json(res.as_ref())
        }
        TemplatesCmd::Create {
            name,
            description,
            milestones_file,
        } => {
            let milestones: Vec<MilestoneCreateRequest> = read_json_file(&milestones_file)?;
            let body = MilestoneTemplateCreateRequest {
                name,
                description: description.unwrap_or_default(),
                milestones,
            };
            let res = ctx
                .client
                .mutate(LearningPathMutation::CreateTemplate { body })
                .await?;
            print_json(res.as_ref())
        }
    }
}

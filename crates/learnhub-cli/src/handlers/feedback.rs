#![deny(clippy::all, clippy::pedantic)]

use learnhub::endpoints::{ProjectMutation, ProjectQuery};
use learnhub_api_types::FeedbackCreateRequest;

use crate::args::FeedbackCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: FeedbackCmd) -> Result<(), CliError> {
    let res = match cmd {
        FeedbackCmd::List { project } => {
            ctx.client
                .query(ProjectQuery::Feedback {
                    project_id: project,
                })
                .await?
        }
        FeedbackCmd::Submit {
            project,
            rating,
            comment,
            task,
        } => {
            ctx.client
                .mutate(ProjectMutation::SubmitFeedback {
                    project_id: project,
                    body: FeedbackCreateRequest {
                        task_id: task,
                        rating,
                        comment,
                    },
                })
                .await?
        }
    };
    print_json(res.as_ref())
}

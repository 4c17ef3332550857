#![deny(clippy::all, clippy::pedantic)]

use learnhub::endpoints::{LearningPathMutation, LearningPathQuery};
use learnhub_api_types::{
    ProjectSkill, SkillBulkUpdateRequest, SkillCreateRequest, SkillLevel, SkillUpdateRequest,
};

use crate::args::{SkillLevelArg, SkillsCmd};
use crate::client::{CliError, Ctx};
use crate::io::read_json_file;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: SkillsCmd) -> Result<(), CliError> {
    let mutation = match cmd {
        SkillsCmd::List { project } => {
            let res = ctx
                .client
                .query(LearningPathQuery::Skills {
                    project_id: project,
                })
                .await?;
            return print_json(res.as_ref());
        }
        SkillsCmd::Create {
            project,
            name,
            category,
            level,
        } => LearningPathMutation::CreateSkill {
            project_id: project,
            body: SkillCreateRequest {
                name,
                category,
                level: level.into(),
            },
        },
        SkillsCmd::Update {
            project,
            skill,
            name,
            category,
            level,
            progress,
        } => LearningPathMutation::UpdateSkill {
            project_id: project,
            skill_id: skill,
            body: SkillUpdateRequest {
                name,
                category,
                level: level.map(Into::into),
                progress,
            },
        },
        SkillsCmd::Delete { project, skill } => LearningPathMutation::DeleteSkill {
            project_id: project,
            skill_id: skill,
        },
        SkillsCmd::Bulk { project, file } => {
            let skills: Vec<ProjectSkill> = read_json_file(&file)?;
            LearningPathMutation::BulkUpdateSkills {
                project_id: project,
                body: SkillBulkUpdateRequest { skills },
            }
        }
    };

    let res = ctx.client.mutate(mutation).await?;
    print_json(res.as_ref())
}

impl From<SkillLevelArg> for SkillLevel {
    fn from(value: SkillLevelArg) -> Self {
        match value {
            SkillLevelArg::Beginner => SkillLevel::Beginner,
            SkillLevelArg::Intermediate => SkillLevel::Intermediate,
            SkillLevelArg::Advanced => SkillLevel::Advanced,
            SkillLevelArg::Expert => SkillLevel::Expert,
        }
    }
}

//! Milestone editor with an explicit draft/persisted split.
//!
//! Before a project exists its milestones live in memory under local
//! `draft-N` ids. [`MilestoneEditor::persist`] creates them on the server in
//! order; from then on every operation goes through the API and the cache
//! invalidation that comes with it.

use std::collections::HashSet;
use std::sync::Arc;

use learnhub_api_types::{
    LearningMilestone, MilestoneCreateRequest, MilestoneReorderRequest, MilestoneUpdateRequest,
    NodeStatus,
};
use tracing::{debug, info};

use crate::client::{LearnHubClient, require_data};
use crate::endpoints::{LearningPathMutation, LearningPathQuery, require};
use crate::error::ClientError;

const DRAFT_ID_PREFIX: &str = "draft-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode<'a> {
    Draft,
    Persisted { project_id: &'a str },
}

enum EditorState {
    Draft {
        milestones: Vec<LearningMilestone>,
        next_id: u64,
        /// Drafts already created by an interrupted `persist`; remaining
        /// drafts are ordered after them.
        created: u32,
    },
    Persisted {
        project_id: String,
    },
}

pub struct MilestoneEditor {
    client: Arc<LearnHubClient>,
    state: EditorState,
}

impl MilestoneEditor {
    /// Editor for a project that does not exist yet.
    pub fn draft(client: Arc<LearnHubClient>) -> Self {
        Self {
            client,
            state: EditorState::Draft {
                milestones: Vec::new(),
                next_id: 1,
                created: 0,
            },
        }
    }

    pub fn persisted(client: Arc<LearnHubClient>, project_id: impl Into<String>) -> Self {
        Self {
            client,
            state: EditorState::Persisted {
                project_id: project_id.into(),
            },
        }
    }

    pub fn mode(&self) -> EditorMode<'_> {
        match &self.state {
            EditorState::Draft { .. } => EditorMode::Draft,
            EditorState::Persisted { project_id } => EditorMode::Persisted { project_id },
        }
    }

    pub async fn add(
        &mut self,
        body: MilestoneCreateRequest,
    ) -> Result<LearningMilestone, ClientError> {
        match &mut self.state {
            EditorState::Draft {
                milestones,
                next_id,
                created,
            } => {
                require("title", &body.title)?;
                let id = format!("{DRAFT_ID_PREFIX}{next_id}");
                *next_id += 1;
                let order = position(*created, milestones.len());
                let milestone = draft_milestone(id, order, body);
                debug!(milestone_id = %milestone.id, "Added draft milestone");
                milestones.push(milestone.clone());
                Ok(milestone)
            }
            EditorState::Persisted { project_id } => {
                create_remote(&self.client, project_id, body).await
            }
        }
    }

    pub async fn update(
        &mut self,
        milestone_id: &str,
        body: MilestoneUpdateRequest,
    ) -> Result<LearningMilestone, ClientError> {
        match &mut self.state {
            EditorState::Draft { milestones, .. } => {
                if let Some(title) = &body.title {
                    require("title", title)?;
                }
                let milestone = milestones
                    .iter_mut()
                    .find(|m| m.id == milestone_id)
                    .ok_or_else(|| unknown_draft(milestone_id))?;
                apply_update(milestone, body);
                Ok(milestone.clone())
            }
            EditorState::Persisted { project_id } => {
                let response = self
                    .client
                    .mutate_data::<LearningMilestone>(LearningPathMutation::UpdateMilestone {
                        project_id: project_id.clone(),
                        milestone_id: milestone_id.to_string(),
                        body,
                    })
                    .await?;
                require_data(response, "milestone")
            }
        }
    }

    pub async fn remove(&mut self, milestone_id: &str) -> Result<(), ClientError> {
        match &mut self.state {
            EditorState::Draft {
                milestones,
                created,
                ..
            } => {
                let index = milestones
                    .iter()
                    .position(|m| m.id == milestone_id)
                    .ok_or_else(|| unknown_draft(milestone_id))?;
                milestones.remove(index);
                renumber(milestones, *created);
                Ok(())
            }
            EditorState::Persisted { project_id } => {
                self.client
                    .mutate(LearningPathMutation::DeleteMilestone {
                        project_id: project_id.clone(),
                        milestone_id: milestone_id.to_string(),
                    })
                    .await?;
                Ok(())
            }
        }
    }

    /// Reorder to match `milestone_ids`, which must name every milestone once.
    pub async fn reorder(&mut self, milestone_ids: Vec<String>) -> Result<(), ClientError> {
        match &mut self.state {
            EditorState::Draft {
                milestones,
                created,
                ..
            } => {
                let known: HashSet<&str> = milestones.iter().map(|m| m.id.as_str()).collect();
                let requested: HashSet<&str> = milestone_ids.iter().map(String::as_str).collect();
                if requested.len() != milestone_ids.len() || requested != known {
                    return Err(ClientError::invalid_input(
                        "reorder must list every draft milestone exactly once",
                    ));
                }

                let mut reordered = Vec::with_capacity(milestones.len());
                for id in &milestone_ids {
                    if let Some(index) = milestones.iter().position(|m| &m.id == id) {
                        reordered.push(milestones.swap_remove(index));
                    }
                }
                *milestones = reordered;
                renumber(milestones, *created);
                Ok(())
            }
            EditorState::Persisted { project_id } => {
                self.client
                    .mutate(LearningPathMutation::ReorderMilestones {
                        project_id: project_id.clone(),
                        body: MilestoneReorderRequest { milestone_ids },
                    })
                    .await?;
                Ok(())
            }
        }
    }

    /// Milestones sorted by `order`.
    pub async fn list(&self) -> Result<Vec<LearningMilestone>, ClientError> {
        match &self.state {
            EditorState::Draft { milestones, .. } => Ok(milestones.clone()),
            EditorState::Persisted { project_id } => {
                let response = self
                    .client
                    .query_data::<Vec<LearningMilestone>>(LearningPathQuery::Milestones {
                        project_id: project_id.clone(),
                    })
                    .await?;
                let mut milestones = response.data.unwrap_or_default();
                milestones.sort_by_key(|m| m.order);
                Ok(milestones)
            }
        }
    }

    /// Create every draft on the server, in order, then switch to persisted
    /// mode for `project_id`.
    ///
    /// Drafts created before a failure are dropped from the draft list; the
    /// rest stay in draft mode, ordered after the created ones, so the call
    /// can be repeated.
    pub async fn persist(
        &mut self,
        project_id: impl Into<String>,
    ) -> Result<Vec<LearningMilestone>, ClientError> {
        let project_id = project_id.into();
        require("project id", &project_id)?;

        let client = Arc::clone(&self.client);
        let (milestones, persisted) = match &mut self.state {
            EditorState::Draft {
                milestones,
                created,
                ..
            } => (milestones, created),
            EditorState::Persisted { project_id: current } => {
                return Err(ClientError::invalid_input(format!(
                    "milestones are already persisted for project `{current}`"
                )));
            }
        };

        let mut created = Vec::with_capacity(milestones.len());
        while let Some(draft) = milestones.first() {
            let body = create_request(draft);
            created.push(create_remote(&client, &project_id, body).await?);
            milestones.remove(0);
            *persisted += 1;
        }

        info!(
            project_id = %project_id,
            created = created.len(),
            "Persisted draft milestones"
        );
        self.state = EditorState::Persisted { project_id };
        Ok(created)
    }
}

async fn create_remote(
    client: &LearnHubClient,
    project_id: &str,
    body: MilestoneCreateRequest,
) -> Result<LearningMilestone, ClientError> {
    let response = client
        .mutate_data::<LearningMilestone>(LearningPathMutation::CreateMilestone {
            project_id: project_id.to_string(),
            body,
        })
        .await?;
    require_data(response, "milestone")
}

fn draft_milestone(id: String, order: u32, body: MilestoneCreateRequest) -> LearningMilestone {
    LearningMilestone {
        id,
        title: body.title,
        description: body.description,
        milestone_type: body.milestone_type,
        required_task_ids: body.required_task_ids,
        required_area_ids: body.required_area_ids,
        required_skills: body.required_skills,
        skills_awarded: body.skills_awarded,
        status: NodeStatus::Locked,
        order,
        custom_fields: body.custom_fields,
        completed_at: None,
    }
}

fn create_request(draft: &LearningMilestone) -> MilestoneCreateRequest {
    MilestoneCreateRequest {
        title: draft.title.clone(),
        description: draft.description.clone(),
        milestone_type: draft.milestone_type,
        required_task_ids: draft.required_task_ids.clone(),
        required_area_ids: draft.required_area_ids.clone(),
        required_skills: draft.required_skills.clone(),
        skills_awarded: draft.skills_awarded.clone(),
        order: Some(draft.order),
        custom_fields: draft.custom_fields.clone(),
    }
}

fn apply_update(milestone: &mut LearningMilestone, body: MilestoneUpdateRequest) {
    let MilestoneUpdateRequest {
        title,
        description,
        status,
        required_task_ids,
        skills_awarded,
    } = body;

    if let Some(title) = title {
        milestone.title = title;
    }
    if let Some(description) = description {
        milestone.description = description;
    }
    if let Some(status) = status {
        milestone.status = status;
    }
    if let Some(ids) = required_task_ids {
        milestone.required_task_ids = ids;
    }
    if let Some(skills) = skills_awarded {
        milestone.skills_awarded = skills;
    }
}

fn renumber(milestones: &mut [LearningMilestone], created: u32) {
    for (index, milestone) in milestones.iter_mut().enumerate() {
        milestone.order = position(created, index);
    }
}

/// Order of the draft at `index`, counted after the `created` milestones
/// already on the server.
fn position(created: u32, index: usize) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_add(created)
}

fn unknown_draft(milestone_id: &str) -> ClientError {
    ClientError::invalid_input(format!("unknown draft milestone `{milestone_id}`"))
}

//! Cache tag definitions.
//!
//! A tag is a `(type, id)` pair. Reads are indexed under the tags they
//! provide; writes name the tags they invalidate.

use std::collections::BTreeSet;
use std::fmt;

/// Resource families used for cache classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
    Project,
    ProjectTask,
    ProjectArea,
    ProjectDashboard,
    ProjectLearningPath,
    LearningMilestone,
    LearningProgress,
    ProjectSkill,
    LearningAnalytics,
    MilestoneTemplate,
    Feedback,
    Session,
}

impl TagType {
    pub fn as_str(self) -> &'static str {
        match self {
            TagType::Project => "Project",
            TagType::ProjectTask => "ProjectTask",
            TagType::ProjectArea => "ProjectArea",
            TagType::ProjectDashboard => "ProjectDashboard",
            TagType::ProjectLearningPath => "ProjectLearningPath",
            TagType::LearningMilestone => "LearningMilestone",
            TagType::LearningProgress => "LearningProgress",
            TagType::ProjectSkill => "ProjectSkill",
            TagType::LearningAnalytics => "LearningAnalytics",
            TagType::MilestoneTemplate => "MilestoneTemplate",
            TagType::Feedback => "Feedback",
            TagType::Session => "Session",
        }
    }
}

/// Either the whole collection (`LIST`) or one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagId {
    List,
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheTag {
    pub kind: TagType,
    pub id: TagId,
}

impl CacheTag {
    /// The "all items of this type" tag.
    pub fn list(kind: TagType) -> Self {
        Self {
            kind,
            id: TagId::List,
        }
    }

    pub fn id(kind: TagType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: TagId::Id(id.into()),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.id, TagId::List)
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            TagId::List => write!(f, "{}:LIST", self.kind.as_str()),
            TagId::Id(id) => write!(f, "{}:{}", self.kind.as_str(), id),
        }
    }
}

/// Ordered so logs and test assertions are stable.
pub type TagSet = BTreeSet<CacheTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_and_detail_tags_are_distinct() {
        let list = CacheTag::list(TagType::LearningMilestone);
        let detail = CacheTag::id(TagType::LearningMilestone, "m1");
        assert_ne!(list, detail);
        assert!(list.is_list());
        assert!(!detail.is_list());
    }

    #[test]
    fn same_id_different_type_is_distinct() {
        assert_ne!(
            CacheTag::id(TagType::ProjectDashboard, "p1"),
            CacheTag::id(TagType::ProjectLearningPath, "p1")
        );
    }

    #[test]
    fn display_matches_type_colon_id() {
        assert_eq!(
            CacheTag::id(TagType::ProjectDashboard, "p1").to_string(),
            "ProjectDashboard:p1"
        );
        assert_eq!(CacheTag::list(TagType::Session).to_string(), "Session:LIST");
    }

    #[test]
    fn tag_set_union_is_idempotent() {
        let mut set = TagSet::new();
        set.insert(CacheTag::id(TagType::Project, "p1"));
        set.insert(CacheTag::id(TagType::Project, "p1"));
        assert_eq!(set.len(), 1);
    }
}

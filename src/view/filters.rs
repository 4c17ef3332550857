//! Session list filtering and task/area association.

use std::collections::HashSet;

use clap::ValueEnum;
use learnhub_api_types::{MentoringSession, ProjectArea, ProjectTask, SessionStatus};
use time::{Duration, OffsetDateTime, Time};

/// Time window a session's start must fall in, relative to a supplied "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Timeframe {
    #[default]
    All,
    Upcoming,
    Past,
    Today,
    ThisWeek,
}

impl Timeframe {
    /// Days are calendar days in `now`'s offset; weeks start on Monday.
    pub fn contains(self, start: OffsetDateTime, now: OffsetDateTime) -> bool {
        let start = start.to_offset(now.offset());
        match self {
            Timeframe::All => true,
            Timeframe::Upcoming => start >= now,
            Timeframe::Past => start < now,
            Timeframe::Today => start.date() == now.date(),
            Timeframe::ThisWeek => {
                let days_since_monday = i64::from(now.weekday().number_days_from_monday());
                let week_start =
                    now.replace_time(Time::MIDNIGHT) - Duration::days(days_since_monday);
                start >= week_start && start < week_start + Duration::days(7)
            }
        }
    }
}

/// Sessions page filter. Every criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// Case-insensitive; blank matches everything.
    pub search: Option<String>,
    pub status: Option<SessionStatus>,
    pub timeframe: Timeframe,
}

impl SessionFilter {
    pub fn matches(&self, session: &MentoringSession, now: OffsetDateTime) -> bool {
        if self.status.is_some_and(|status| status != session.status) {
            return false;
        }
        if !self.timeframe.contains(session.start_time, now) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => matches_search(session, &term.to_lowercase()),
        }
    }

    pub fn apply<'a>(
        &self,
        sessions: &'a [MentoringSession],
        now: OffsetDateTime,
    ) -> Vec<&'a MentoringSession> {
        sessions
            .iter()
            .filter(|session| self.matches(session, now))
            .collect()
    }
}

fn matches_search(session: &MentoringSession, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(session.title.as_str())
        || contains(session.description.as_str())
        || session.mentor.name.as_deref().is_some_and(contains)
        || session.topics.iter().any(|topic| contains(topic.as_str()))
}

/// Tasks listed in `area.task_ids`, in the order `tasks` gives them.
pub fn tasks_for_area<'a>(area: &ProjectArea, tasks: &'a [ProjectTask]) -> Vec<&'a ProjectTask> {
    let ids: HashSet<&str> = area.task_ids.iter().map(String::as_str).collect();
    tasks
        .iter()
        .filter(|task| ids.contains(task.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use learnhub_api_types::{AreaStatus, MentorRef, TaskPriority, TaskStatus};
    use time::macros::datetime;

    use super::*;

    // Wednesday.
    const NOW: OffsetDateTime = datetime!(2025-03-05 12:00 UTC);

    fn session(id: &str, title: &str, start: OffsetDateTime) -> MentoringSession {
        MentoringSession {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            mentor: MentorRef {
                id: "u1".to_string(),
                name: Some("Ana Lima".to_string()),
                email: None,
            },
            status: SessionStatus::Scheduled,
            start_time: start,
            duration_minutes: 60,
            participant_ids: Vec::new(),
            max_participants: None,
            topics: vec!["Rust".to_string()],
        }
    }

    fn task(id: &str) -> ProjectTask {
        ProjectTask {
            id: id.to_string(),
            project_id: Some("p1".to_string()),
            title: id.to_uppercase(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            depends_on: Vec::new(),
            blocked_by: Vec::new(),
            is_blocking: Vec::new(),
            submissions: Vec::new(),
            feedback_history: Vec::new(),
            due_date: None,
        }
    }

    fn ids(sessions: Vec<&MentoringSession>) -> Vec<&str> {
        sessions.into_iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn search_covers_title_mentor_and_topics() {
        let mut tagged = session("s2", "Office hours", NOW);
        tagged.topics = vec!["Async IO".to_string()];
        let sessions = vec![session("s1", "Parser clinic", NOW), tagged];

        let by = |term: &str| SessionFilter {
            search: Some(term.to_string()),
            ..Default::default()
        };
        assert_eq!(ids(by("PARSER").apply(&sessions, NOW)), vec!["s1"]);
        assert_eq!(ids(by("lima").apply(&sessions, NOW)), vec!["s1", "s2"]);
        assert_eq!(ids(by("async").apply(&sessions, NOW)), vec!["s2"]);
        assert_eq!(ids(by("   ").apply(&sessions, NOW)), vec!["s1", "s2"]);
    }

    #[test]
    fn status_filter_is_exact() {
        let mut cancelled = session("s2", "B", NOW);
        cancelled.status = SessionStatus::Cancelled;
        let sessions = vec![session("s1", "A", NOW), cancelled];

        let filter = SessionFilter {
            status: Some(SessionStatus::Cancelled),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&sessions, NOW)), vec!["s2"]);
    }

    #[test]
    fn timeframes_are_relative_to_now() {
        let sessions = vec![
            session("yesterday", "A", datetime!(2025-03-04 10:00 UTC)),
            session("later-today", "B", datetime!(2025-03-05 18:00 UTC)),
            session("sunday", "C", datetime!(2025-03-09 23:00 UTC)),
            session("next-monday", "D", datetime!(2025-03-10 00:00 UTC)),
            session("last-sunday", "E", datetime!(2025-03-02 09:00 UTC)),
        ];
        let within = |timeframe| {
            ids(SessionFilter {
                timeframe,
                ..Default::default()
            }
            .apply(&sessions, NOW))
        };

        assert_eq!(within(Timeframe::All).len(), 5);
        assert_eq!(
            within(Timeframe::Upcoming),
            vec!["later-today", "sunday", "next-monday"]
        );
        assert_eq!(within(Timeframe::Past), vec!["yesterday", "last-sunday"]);
        assert_eq!(within(Timeframe::Today), vec!["later-today"]);
        assert_eq!(
            within(Timeframe::ThisWeek),
            vec!["yesterday", "later-today", "sunday"]
        );
    }

    #[test]
    fn today_uses_the_offset_of_now() {
        let now = datetime!(2025-03-05 23:30 +02:00);
        let start = datetime!(2025-03-05 22:00 UTC);
        assert!(!Timeframe::Today.contains(start, now));
        assert!(Timeframe::Today.contains(datetime!(2025-03-05 20:00 UTC), now));
    }

    #[test]
    fn area_tasks_follow_task_ids_only() {
        let area = ProjectArea {
            id: "a1".to_string(),
            name: "Frontend".to_string(),
            description: String::new(),
            progress: 0.0,
            task_ids: vec!["t3".to_string(), "t1".to_string()],
            status: AreaStatus::InProgress,
        };
        let tasks = vec![task("t1"), task("t2"), task("t3"), task("t10")];

        let found: Vec<&str> = tasks_for_area(&area, &tasks)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(found, vec!["t1", "t3"]);
    }
}

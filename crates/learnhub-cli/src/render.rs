#![deny(clippy::all, clippy::pedantic)]

use learnhub::view::{
    StatusTone, clamp_progress, format_date, format_datetime, format_duration, humanize, truncate,
};
use learnhub_api_types::{MentoringSession, Project};

const TITLE_WIDTH: usize = 40;

/// One line per session: start, length, status badge, title, mentor.
pub fn session_lines(sessions: &[&MentoringSession]) -> Vec<String> {
    sessions
        .iter()
        .map(|session| {
            format!(
                "{}  {:>7}  {:<22}  {}  (with {})",
                format_datetime(session.start_time),
                format_duration(session.duration_minutes),
                badge(session.status.as_str(), &session.status),
                truncate(&session.title, TITLE_WIDTH),
                session.mentor.name.as_deref().unwrap_or(&session.mentor.id),
            )
        })
        .collect()
}

/// One line per project: status badge, progress, title, end date if set.
pub fn project_lines(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .map(|project| {
            let mut line = format!(
                "{:<22}  {:>3}%  {}",
                badge(project.status.as_str(), &project.status),
                clamp_progress(project.progress),
                truncate(&project.title, TITLE_WIDTH),
            );
            if let Some(end) = project.end_date {
                line.push_str(&format!("  (due {})", format_date(end)));
            }
            line
        })
        .collect()
}

fn badge(status: &str, tone: &impl StatusTone) -> String {
    format!("[{}:{}]", humanize(status), tone.tone().as_str())
}

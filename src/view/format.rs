//! Display formatting for dates, durations, text and status badges.

use std::borrow::Cow;

use learnhub_api_types::{
    AreaStatus, NodeStatus, ProjectStatus, SessionStatus, TaskPriority, TaskStatus,
};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

pub const HUMAN_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
pub const HUMAN_DATETIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[month repr:short] [day padding:none], [year], [hour repr:12 padding:none]:[minute] [period]"
);

const ELLIPSIS: &str = "...";

/// `Mar 5, 2025`.
pub fn format_date(value: OffsetDateTime) -> String {
    value
        .format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| value.date().to_string())
}

/// `Mar 5, 2025, 3:07 PM`, in the value's own offset.
pub fn format_datetime(value: OffsetDateTime) -> String {
    value
        .format(HUMAN_DATETIME_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((byte_index, _)) => {
            let head = text[..byte_index].trim_end();
            Cow::Owned(format!("{head}{ELLIPSIS}"))
        }
    }
}

/// `1h 30m`, `45m`, `2h`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Round and clamp a percentage into `0..=100`. `NaN` counts as zero.
pub fn clamp_progress(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// `in-progress` → `In progress`.
pub fn humanize(slug: &str) -> String {
    let spaced = slug.replace(['-', '_'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeTone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

impl BadgeTone {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeTone::Neutral => "neutral",
            BadgeTone::Info => "info",
            BadgeTone::Success => "success",
            BadgeTone::Warning => "warning",
            BadgeTone::Danger => "danger",
        }
    }
}

/// Badge colour for a status value.
pub trait StatusTone {
    fn tone(&self) -> BadgeTone;
}

impl StatusTone for ProjectStatus {
    fn tone(&self) -> BadgeTone {
        match self {
            ProjectStatus::Active => BadgeTone::Info,
            ProjectStatus::Completed => BadgeTone::Success,
            ProjectStatus::Archived => BadgeTone::Neutral,
            ProjectStatus::OnHold => BadgeTone::Warning,
        }
    }
}

impl StatusTone for TaskStatus {
    fn tone(&self) -> BadgeTone {
        match self {
            TaskStatus::Todo | TaskStatus::Upcoming => BadgeTone::Neutral,
            TaskStatus::InProgress | TaskStatus::Submitted => BadgeTone::Info,
            TaskStatus::Completed => BadgeTone::Success,
            TaskStatus::Blocked => BadgeTone::Warning,
            TaskStatus::Overdue => BadgeTone::Danger,
        }
    }
}

impl StatusTone for TaskPriority {
    fn tone(&self) -> BadgeTone {
        match self {
            TaskPriority::Low => BadgeTone::Neutral,
            TaskPriority::Medium => BadgeTone::Info,
            TaskPriority::High => BadgeTone::Warning,
            TaskPriority::Urgent => BadgeTone::Danger,
        }
    }
}

impl StatusTone for AreaStatus {
    fn tone(&self) -> BadgeTone {
        match self {
            AreaStatus::Planned => BadgeTone::Neutral,
            AreaStatus::InProgress => BadgeTone::Info,
            AreaStatus::Completed => BadgeTone::Success,
            AreaStatus::Blocked => BadgeTone::Warning,
        }
    }
}

impl StatusTone for NodeStatus {
    fn tone(&self) -> BadgeTone {
        match self {
            NodeStatus::Locked | NodeStatus::Skipped => BadgeTone::Neutral,
            NodeStatus::Available | NodeStatus::InProgress => BadgeTone::Info,
            NodeStatus::Completed => BadgeTone::Success,
            NodeStatus::Failed => BadgeTone::Danger,
        }
    }
}

impl StatusTone for SessionStatus {
    fn tone(&self) -> BadgeTone {
        match self {
            SessionStatus::Scheduled => BadgeTone::Info,
            SessionStatus::InProgress => BadgeTone::Warning,
            SessionStatus::Completed => BadgeTone::Success,
            SessionStatus::Cancelled => BadgeTone::Danger,
        }
    }
}

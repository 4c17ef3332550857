//! Client-side filtering and formatting used by list and detail views.

mod filters;
mod format;

pub use filters::{SessionFilter, Timeframe, tasks_for_area};
pub use format::{
    BadgeTone, HUMAN_DATE_FORMAT, HUMAN_DATETIME_FORMAT, StatusTone, clamp_progress, format_date,
    format_datetime, format_duration, humanize, truncate,
};

#![deny(clippy::all, clippy::pedantic)]

pub mod feedback;
pub mod milestones;
pub mod paths;
pub mod projects;
pub mod sessions;
pub mod skills;
pub mod tasks;
pub mod templates;

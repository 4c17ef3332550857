//! Typed client for the LearnHub learner/mentor platform API.
//!
//! Reads are served through a tag-indexed [`cache::QueryCache`]; every write
//! declares the cache tags it invalidates, and watched reads are re-fetched
//! once the server confirms the write.

pub mod cache;
pub mod client;
pub mod config;
pub mod editor;
pub mod endpoints;
pub mod error;
pub mod telemetry;
pub mod view;

pub use client::{HttpTransport, LearnHubClient, Transport};
pub use editor::{EditorMode, MilestoneEditor};
pub use error::{ClientError, FetchFailure};

//! learnhub-cli: command-line client for the LearnHub API.
//! Every read goes through the library's query cache; every write invalidates
//! the cache tags it declares.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;
mod render;

use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, Ctx, load_settings};
use handlers::{feedback, milestones, paths, projects, sessions, skills, tasks, templates};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    learnhub::telemetry::init(&settings.logging)?;
    let ctx = Ctx::from_settings(&settings)?;

    match cli.command {
        Commands::Paths(cmd) => paths::handle(&ctx, cmd.action).await?,
        Commands::Milestones(cmd) => milestones::handle(&ctx, cmd.action).await?,
        Commands::Skills(cmd) => skills::handle(&ctx, cmd.action).await?,
        Commands::Templates(cmd) => templates::handle(&ctx, cmd.action).await?,
        Commands::Projects(cmd) => projects::handle(&ctx, cmd.action).await?,
        Commands::Tasks(cmd) => tasks::handle(&ctx, cmd.action).await?,
        Commands::Feedback(cmd) => feedback::handle(&ctx, cmd.action).await?,
        Commands::Sessions(cmd) => sessions::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}

//! Command-line surface for `learnhub-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use learnhub::config::ConfigOverrides;
use learnhub::view::Timeframe;

#[derive(Parser, Debug)]
#[command(name = "learnhub-cli", version, about = "LearnHub API CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigOverrides,

    /// Path to file containing the bearer token (takes precedence over env)
    #[arg(long, env = "LEARNHUB_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Extra configuration file layered over `config/default` and `learnhub.*`
    #[arg(long, env = "LEARNHUB_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Learning path dashboards, progress and exports
    Paths(PathsArgs),
    /// Learning path milestones
    Milestones(MilestonesArgs),
    /// Learning path skills
    Skills(SkillsArgs),
    /// Milestone templates
    Templates(TemplatesArgs),
    /// Projects and project areas
    Projects(ProjectsArgs),
    /// Project tasks
    Tasks(TasksArgs),
    /// Project feedback
    Feedback(FeedbackArgs),
    /// Mentoring sessions
    Sessions(SessionsArgs),
}

#[derive(Parser, Debug)]
pub struct PathsArgs {
    #[command(subcommand)]
    pub action: PathsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PathsCmd {
    /// Learning dashboard for a project
    Dashboard { project: String },
    /// Full learning path (milestones, skills, completion sequence)
    Get { project: String },
    /// Learner progress
    Progress { project: String },
    /// Patch learner progress
    UpdateProgress {
        project: String,
        #[arg(long)]
        current_milestone: Option<String>,
        /// Comma-separated milestone ids
        #[arg(long, value_delimiter = ',')]
        completed: Option<Vec<String>>,
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Learning analytics
    Analytics { project: String },
    /// Bottleneck report
    Bottlenecks { project: String },
    /// Export the learning path
    Export {
        project: String,
        #[arg(long, default_value_t = ExportFormatArg::Json)]
        format: ExportFormatArg,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
pub struct MilestonesArgs {
    #[command(subcommand)]
    pub action: MilestonesCmd,
}

#[derive(Subcommand, Debug)]
pub enum MilestonesCmd {
    /// List milestones of a project
    List { project: String },
    /// Get one milestone
    Get { project: String, milestone: String },
    /// Create a milestone
    Create {
        project: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        description_file: Option<PathBuf>,
        #[arg(long = "type", default_value_t = MilestoneTypeArg::Custom)]
        milestone_type: MilestoneTypeArg,
        /// Comma-separated task ids
        #[arg(long, value_delimiter = ',')]
        required_tasks: Vec<String>,
        /// Comma-separated skill names
        #[arg(long, value_delimiter = ',')]
        skills_awarded: Vec<String>,
        #[arg(long)]
        order: Option<u32>,
    },
    /// Update a milestone
    Update {
        project: String,
        milestone: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<NodeStatusArg>,
    },
    /// Delete a milestone
    Delete { project: String, milestone: String },
    /// Reorder milestones; list every milestone id in the new order
    Reorder {
        project: String,
        #[arg(required = true)]
        milestone_ids: Vec<String>,
    },
    /// Replace milestones with a template's
    ApplyTemplate {
        project: String,
        #[arg(long)]
        template: String,
    },
    /// Stage milestones from a JSON file and create them in order
    Draft {
        project: String,
        /// JSON array of milestone create requests
        #[arg(long)]
        file: PathBuf,
        /// Print the staged drafts without creating anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

#[derive(Parser, Debug)]
pub struct SkillsArgs {
    #[command(subcommand)]
    pub action: SkillsCmd,
}

#[derive(Subcommand, Debug)]
pub enum SkillsCmd {
    /// List skills of a project
    List { project: String },
    /// Create a skill
    Create {
        project: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = SkillLevelArg::Beginner)]
        level: SkillLevelArg,
    },
    /// Update a skill
    Update {
        project: String,
        skill: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        level: Option<SkillLevelArg>,
        #[arg(long)]
        progress: Option<f32>,
    },
    /// Delete a skill
    Delete { project: String, skill: String },
    /// Replace skills in bulk from a JSON array file
    Bulk {
        project: String,
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Parser, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub action: TemplatesCmd,
}

#[derive(Subcommand, Debug)]
pub enum TemplatesCmd {
    /// List milestone templates
    List,
    /// Create a template from a JSON array of milestones
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        milestones_file: PathBuf,
    },
}

#[derive(Parser, Debug)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub action: ProjectsCmd,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCmd {
    /// List projects with optional filters
    List {
        #[arg(long)]
        status: Option<ProjectStatusArg>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// One line per project instead of JSON
        #[arg(long, default_value_t = false)]
        human: bool,
    },
    /// Get a project
    Get { project: String },
    /// Create a project
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        description_file: Option<PathBuf>,
        /// Comma-separated user ids
        #[arg(long, value_delimiter = ',')]
        members: Vec<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Update a project
    Update {
        project: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<ProjectStatusArg>,
        #[arg(long)]
        progress: Option<f32>,
    },
    /// Delete a project
    Delete { project: String },
    /// List areas of a project
    Areas { project: String },
    /// Tasks belonging to one area
    AreaTasks { project: String, area: String },
}

#[derive(Parser, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub action: TasksCmd,
}

#[derive(Subcommand, Debug)]
pub enum TasksCmd {
    /// List tasks of a project
    List { project: String },
    /// Get a task
    Get { project: String, task: String },
    /// Create a task
    Create {
        project: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = TaskPriorityArg::Medium)]
        priority: TaskPriorityArg,
        #[arg(long)]
        area: Option<String>,
        /// Comma-separated task ids
        #[arg(long, value_delimiter = ',')]
        depends_on: Vec<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Update a task
    Update {
        project: String,
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatusArg>,
        #[arg(long)]
        priority: Option<TaskPriorityArg>,
    },
    /// Delete a task
    Delete { project: String, task: String },
}

#[derive(Parser, Debug)]
pub struct FeedbackArgs {
    #[command(subcommand)]
    pub action: FeedbackCmd,
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCmd {
    /// List feedback for a project
    List { project: String },
    /// Submit feedback (rating 1-5)
    Submit {
        project: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        task: Option<String>,
    },
}

#[derive(Parser, Debug)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub action: SessionsCmd,
}

#[derive(Subcommand, Debug)]
pub enum SessionsCmd {
    /// List sessions; search and timeframe are applied locally
    List {
        #[arg(long)]
        status: Option<SessionStatusArg>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = Timeframe::All)]
        timeframe: Timeframe,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        cursor: Option<String>,
        /// One line per session instead of JSON
        #[arg(long, default_value_t = false)]
        human: bool,
    },
    /// Sessions open for joining
    Open,
    /// Sessions created by the current user
    Created,
    /// Get a session
    Get { session: String },
    /// Schedule a session
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// RFC 3339 start time
        #[arg(long)]
        start: String,
        #[arg(long, default_value_t = 60)]
        duration: u32,
        #[arg(long)]
        max_participants: Option<u32>,
        /// Comma-separated topics
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,
    },
    /// Join a session
    Join { session: String },
    /// Cancel a session
    Cancel { session: String },
}

macro_rules! arg_enum_display {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormatArg {
    Json,
    Csv,
    Pdf,
}

arg_enum_display!(ExportFormatArg { Json => "json", Csv => "csv", Pdf => "pdf" });

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MilestoneTypeArg {
    ProjectStart,
    AreaComplete,
    SkillMastery,
    ProjectComplete,
    Custom,
}

arg_enum_display!(MilestoneTypeArg {
    ProjectStart => "project-start",
    AreaComplete => "area-complete",
    SkillMastery => "skill-mastery",
    ProjectComplete => "project-complete",
    Custom => "custom",
});

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum NodeStatusArg {
    Locked,
    Available,
    InProgress,
    Completed,
    Failed,
    Skipped,
}

arg_enum_display!(NodeStatusArg {
    Locked => "locked",
    Available => "available",
    InProgress => "in-progress",
    Completed => "completed",
    Failed => "failed",
    Skipped => "skipped",
});

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SkillLevelArg {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

arg_enum_display!(SkillLevelArg {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
    Expert => "expert",
});

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProjectStatusArg {
    Active,
    Completed,
    Archived,
    OnHold,
}

arg_enum_display!(ProjectStatusArg {
    Active => "active",
    Completed => "completed",
    Archived => "archived",
    OnHold => "on-hold",
});

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TaskStatusArg {
    Todo,
    Upcoming,
    InProgress,
    Submitted,
    Completed,
    Blocked,
    Overdue,
}

arg_enum_display!(TaskStatusArg {
    Todo => "todo",
    Upcoming => "upcoming",
    InProgress => "in-progress",
    Submitted => "submitted",
    Completed => "completed",
    Blocked => "blocked",
    Overdue => "overdue",
});

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TaskPriorityArg {
    Low,
    Medium,
    High,
    Urgent,
}

arg_enum_display!(TaskPriorityArg {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SessionStatusArg {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

arg_enum_display!(SessionStatusArg {
    Scheduled => "scheduled",
    InProgress => "in-progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

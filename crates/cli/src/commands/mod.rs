use clap::Subcommand;
use kata_core::Context;
use kata_model::Difficulty;

pub mod catalog;
pub mod lifecycle;
pub mod sync;

#[derive(Subcommand)]
pub enum Commands {
    /// List tracks
    Tracks {
        /// Glob pattern over the track slug
        slug: Option<String>,

        /// Only joined (true) or unjoined (false) tracks
        #[arg(long)]
        joined: Option<bool>,

        /// Only completed (true) or uncompleted (false) tracks
        #[arg(long)]
        completed: Option<bool>,

        /// Serve from the cache only, never touch the network
        #[arg(long)]
        offline: bool,
    },

    /// List a track's exercises
    Exercises {
        /// Track slug
        track: String,

        /// Glob pattern over the exercise slug
        slug: Option<String>,

        /// Only exercises of this difficulty (easy, medium, hard)
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Only unlocked (true) or locked (false) exercises
        #[arg(long)]
        unlocked: Option<bool>,

        /// Only started (true) or unstarted (false) exercises
        #[arg(long)]
        started: Option<bool>,

        /// Only exercises whose latest iteration passes (true) or not (false)
        #[arg(long)]
        passing: Option<bool>,

        /// Only completed (true) or uncompleted (false) exercises
        #[arg(long)]
        completed: Option<bool>,

        /// Serve from the cache only, never touch the network
        #[arg(long)]
        offline: bool,
    },

    /// Start an exercise and download its files
    Start { track: String, exercise: String },

    /// Download an exercise's files into the workspace
    Download {
        track: String,
        exercise: String,

        /// Overwrite differing local files without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Submit the local files as a new iteration
    Submit {
        track: String,
        exercise: String,

        /// Skip local checks and clear any stuck server-side submission
        #[arg(short, long)]
        force: bool,
    },

    /// Mark an exercise's solution complete
    Complete { track: String, exercise: String },

    /// Publish a completed solution
    Publish { track: String, exercise: String },

    /// Bring an out-of-date solution up to the latest exercise version
    Update { track: String, exercise: String },

    /// Compare local files against the latest iteration
    Diff {
        track: String,
        exercise: String,

        /// External tool to launch per differing file
        #[arg(long)]
        tool: Option<String>,
    },

    /// Refresh cached state for a track, or one exercise's solution
    Sync {
        track: String,
        exercise: Option<String>,
    },

    /// Validate the token and show the signed-in user
    Whoami,
}

impl Commands {
    pub async fn execute(self, ctx: Context) -> eyre::Result<()> {
        match self {
            Commands::Tracks {
                slug,
                joined,
                completed,
                offline,
            } => catalog::tracks(&ctx, slug, joined, completed, offline).await,
            Commands::Exercises {
                track,
                slug,
                difficulty,
                unlocked,
                started,
                passing,
                completed,
                offline,
            } => {
                let filter = kata_model::ExerciseFilter {
                    slug,
                    difficulty,
                    unlocked,
                    started,
                    passing,
                    completed,
                };
                catalog::exercises(&ctx, &track, filter, offline).await
            }
            Commands::Start { track, exercise } => lifecycle::start(&ctx, &track, &exercise).await,
            Commands::Download {
                track,
                exercise,
                force,
            } => lifecycle::download(&ctx, &track, &exercise, force).await,
            Commands::Submit {
                track,
                exercise,
                force,
            } => lifecycle::submit(&ctx, &track, &exercise, force).await,
            Commands::Complete { track, exercise } => {
                lifecycle::complete(&ctx, &track, &exercise).await
            }
            Commands::Publish { track, exercise } => {
                lifecycle::publish(&ctx, &track, &exercise).await
            }
            Commands::Update { track, exercise } => {
                lifecycle::update(&ctx, &track, &exercise).await
            }
            Commands::Diff {
                track,
                exercise,
                tool,
            } => lifecycle::diff(&ctx, &track, &exercise, tool.as_deref()).await,
            Commands::Sync { track, exercise } => {
                sync::sync(&ctx, &track, exercise.as_deref()).await
            }
            Commands::Whoami => catalog::whoami(&ctx).await,
        }
    }
}

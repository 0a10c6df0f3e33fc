//! studyprep CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "studyprep",
    version,
    about = "Assessment grading and exam readiness tracker"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and a sample question bank
    Init,

    /// Validate a question bank file
    Validate {
        /// Path to question bank JSON
        #[arg(long)]
        bank: PathBuf,
    },

    /// Build a question bank from a study plan
    BuildBank {
        /// Path to study plan JSON
        #[arg(long)]
        plan: PathBuf,

        /// Existing question bank to draw questions from
        #[arg(long)]
        bank_source: Option<PathBuf>,

        /// Output path (default: <data_dir>/question_bank.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Submit an answer to a question
    Submit {
        /// Week number
        #[arg(long)]
        week: u32,

        /// Question index within the week (0-based)
        #[arg(long)]
        index: usize,

        /// The answer text
        #[arg(long)]
        answer: String,

        /// Question bank (default: <data_dir>/question_bank.json)
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Show per-week scores and the overall score
    Status,

    /// Analyze readiness and write a performance report
    Analyze {
        /// Output format: text, json, html, all
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory (default: data_dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare two performance reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score change in points treated as no change (default: from config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Exit code 1 if any week regressed
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show or update study progress
    Progress {
        /// Week to update
        #[arg(long)]
        week: Option<u32>,

        /// Mark the week complete
        #[arg(long, requires = "week")]
        complete: bool,

        /// Mark a video as watched
        #[arg(long, requires = "week")]
        video: Option<String>,

        /// Mark a book as read
        #[arg(long, requires = "week")]
        book: Option<String>,

        /// Study plan (default: <data_dir>/study_plan.json)
        #[arg(long)]
        plan: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studyprep=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::BuildBank {
            plan,
            bank_source,
            output,
        } => commands::build_bank::execute(plan, bank_source, output, config).await,
        Commands::Submit {
            week,
            index,
            answer,
            bank,
        } => commands::submit::execute(week, index, answer, bank, config).await,
        Commands::Status => commands::status::execute(config),
        Commands::Analyze { format, output } => commands::analyze::execute(format, output, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
            config,
        ),
        Commands::Progress {
            week,
            complete,
            video,
            book,
            plan,
        } => commands::progress::execute(week, complete, video, book, plan, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finhealth::config::{API_URL_ENV, INDUSTRY_ENV, LOG_FILE_ENV, REPORT_DIR_ENV};
use finhealth::{render_text, ClientConfig, IndustrySegment, SessionState, UploadFile, DEFAULT_API_URL};

/// SME FinHealth - upload a financial statement and view the analysis dashboard
#[derive(Parser, Debug)]
#[command(name = "finhealth")]
#[command(version, about, long_about = None)]
struct Args {
    /// Analysis service base URL
    #[arg(long, default_value = DEFAULT_API_URL, env = API_URL_ENV, global = true)]
    api_url: String,

    /// Industry segment sent with the statement
    #[arg(long, default_value = "General", env = INDUSTRY_ENV, global = true)]
    industry: IndustrySegment,

    /// Directory where "download report" writes
    #[arg(long, default_value = ".", env = REPORT_DIR_ENV, global = true)]
    report_dir: PathBuf,

    /// Append logs to this file (interactive mode logs nowhere otherwise)
    #[arg(long, env = LOG_FILE_ENV, global = true)]
    log_file: Option<PathBuf>,

    /// Statement to preselect in interactive mode
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one statement and print the dashboard as text
    Analyze {
        /// Statement to upload (CSV, XLSX or PDF)
        file: PathBuf,

        /// Print the normalized result as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// List the industry segments
    Industries,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = args.command.is_none();
    init_tracing(args.log_file.as_deref(), interactive)?;

    let config = ClientConfig {
        api_url: args.api_url.clone(),
        industry: args.industry,
        report_dir: args.report_dir.clone(),
    };

    match args.command {
        Some(Command::Analyze { ref file, json }) => run_analyze(&config, file, json),
        Some(Command::Industries) => {
            for segment in IndustrySegment::ALL {
                println!("{:<14} {}", segment.as_str(), segment.label());
            }
            Ok(())
        }
        None => run_ui_mode(&config, args.file.as_deref()),
    }
}

fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("finhealth=info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // stderr would draw over the terminal UI
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

fn run_analyze(config: &ClientConfig, path: &Path, json: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut controller = config.controller()?;

    let file = UploadFile::from_path(path)
        .with_context(|| format!("Failed to read statement {}", path.display()))?;
    controller.select_file(Some(file));

    info!("Submitting {} as {}", path.display(), config.industry);
    let submission = controller
        .submit()?
        .context("An analysis is already in flight")?;
    let completion = runtime.block_on(submission.run());
    controller.complete(completion);

    if controller.state() != SessionState::Success {
        let message = controller
            .notice()
            .map(|n| n.message.clone())
            .unwrap_or_else(|| "Analysis failed".to_string());
        bail!(message);
    }

    if json {
        let result = controller.result().context("Analysis produced no result")?;
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        let view = controller.dashboard().context("Analysis produced no result")?;
        print!("{}", render_text(&view));
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &ClientConfig, preselect: Option<&Path>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let controller = config.controller()?;
    let sink = config.report_sink();

    let mut app = ui::App::new(controller, Box::new(sink), runtime.handle().clone());
    if let Some(path) = preselect {
        app.select_path(&path.to_string_lossy());
    }

    info!("Starting UI against {}", config.api_url);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &ClientConfig, _preselect: Option<&Path>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run headless: finhealth analyze <FILE>");
    std::process::exit(1);
}

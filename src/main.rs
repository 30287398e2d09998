//! Brickyard Scout - campus food-run companion
//!
//! A CLI that reads the live run list from the BrickyardBytes backend,
//! summarizes it, answers questions with a rule-based scout and shows
//! the current peak bonus window.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (configuration, authentication, backend failure, etc.)

mod analysis;
mod cli;
mod client;
mod config;
mod models;
mod render;
mod scout;

use analysis::{peak_banner, RunInsights};
use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use client::{ApiClient, ClientError, DescriptionRequest};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{parse_run_list, ChatReply, Run};
use scout::{FileTranscriptStore, MemoryTranscriptStore, ScoutSession, TranscriptStore};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Hint shown when the run list cannot be fetched.
const RUNS_UNAVAILABLE: &str = "Unable to fetch runs for now. Showing campus presets.";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Brickyard Scout v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .brickyard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  .brickyard.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .brickyard.toml")?;

    println!("✅ Created .brickyard.toml with default settings.");
    println!("   Add your API token under [api] or export BRICKYARD_TOKEN.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch the selected command.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = ApiClient::new(config.client_config()).context("Failed to create API client")?;
    let format = args.format;

    let Some(command) = args.command.clone() else {
        return Ok(());
    };

    match command {
        Command::Peak => {
            let forecast = with_spinner(&args, "Loading peak forecast...", client.peak_forecast())
                .await
                .context("Unable to load peak forecast")?;
            let banner = peak_banner(&forecast.peak_forecast);
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    render::render_json(&json!({ "banner": banner, "forecast": forecast }))?
                ),
                OutputFormat::Text => match banner {
                    Some(text) => println!("🔥 Peak bonus window\n{}", text),
                    None => println!("No peak bonus window right now."),
                },
            }
        }
        Command::Status => {
            let (runs, forecast) =
                futures::join!(load_runs(&args, &client), client.peak_forecast());
            let (runs, hint) = runs;
            let banner = match forecast {
                Ok(forecast) => peak_banner(&forecast.peak_forecast),
                Err(e) => {
                    warn!("Peak forecast unavailable: {}", e);
                    None
                }
            };
            let insights = RunInsights::from_runs(&runs);
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    render::render_json(&json!({
                        "banner": banner,
                        "insights": insights,
                        "hint": hint,
                    }))?
                ),
                OutputFormat::Text => {
                    if let Some(hint) = hint {
                        println!("ℹ️  {}\n", hint);
                    }
                    if let Some(text) = banner {
                        println!("🔥 {}\n", text);
                    }
                    print!("{}", render::render_reply(&insights.to_reply()));
                }
            }
        }
        Command::Load { run_id } => {
            let run = with_spinner(&args, "Fetching run...", client.get_run(run_id.trim()))
                .await
                .with_context(|| format!("Unable to load run {}", run_id))?;
            let estimate = with_spinner(&args, "Analyzing...", client.run_load_estimate(&run))
                .await
                .context("Unable to estimate run load")?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    render::render_json(&json!({ "run": run, "assessment": estimate.assessment }))?
                ),
                OutputFormat::Text => {
                    print!("{}", render::render_run_details(&run));
                    println!("\n📦 {}", estimate.assessment);
                }
            }
        }
        Command::Describe {
            restaurant,
            drop_point,
            eta,
        } => {
            let request = DescriptionRequest {
                restaurant,
                drop_point,
                eta,
            };
            let suggestion = with_spinner(
                &args,
                "Drafting description...",
                client.run_description_suggestion(&request),
            )
            .await
            .context("Unable to get a description suggestion")?;
            match format {
                OutputFormat::Json => println!("{}", render::render_json(&suggestion)?),
                OutputFormat::Text => println!("{}", suggestion.suggestion),
            }
        }
        chat_command => run_chat(&args, &config, &client, chat_command).await?,
    }

    Ok(())
}

/// Commands that go through the scout session and its transcript.
async fn run_chat(args: &Args, config: &Config, client: &ApiClient, command: Command) -> Result<()> {
    let (runs, hint) = if command.needs_runs() {
        load_runs(args, client).await
    } else {
        (Vec::new(), None)
    };

    let file_store;
    let memory_store;
    let store: &dyn TranscriptStore = if args.no_history {
        memory_store = MemoryTranscriptStore::new();
        &memory_store
    } else {
        file_store = FileTranscriptStore::new(config.chat.transcript_path());
        debug!("Transcript at {}", file_store.path().display());
        &file_store
    };
    let mut session = ScoutSession::open(store, runs, config.chat.history_limit);

    let reply = match &command {
        Command::History => {
            return print_history(args.format, session.messages());
        }
        Command::ClearHistory => {
            session.clear();
            println!("🧹 Transcript cleared.");
            return Ok(());
        }
        Command::Ask { text } => session.ask(&text.join(" ")),
        other => match other.quick_action() {
            Some(action) => session.quick_action(action),
            None => return Ok(()),
        },
    };

    print_reply(args.format, &reply, hint.as_deref(), session.runs().len())
}

fn print_history(format: OutputFormat, messages: &[scout::transcript::ChatMessage]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render::render_json(messages)?),
        OutputFormat::Text => print!("{}", render::render_transcript(messages)),
    }
    Ok(())
}

fn print_reply(format: OutputFormat, reply: &ChatReply, hint: Option<&str>, run_count: usize) -> Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            render::render_json(&json!({
                "reply": reply,
                "hint": hint,
                "live_runs": run_count,
            }))?
        ),
        OutputFormat::Text => {
            if let Some(hint) = hint {
                println!("ℹ️  {}\n", hint);
            }
            print!("{}", render::render_reply(reply));
        }
    }
    Ok(())
}

/// Load the run snapshot from `--runs-file` or the API.
///
/// Never fails: an unavailable list degrades to an empty snapshot plus a
/// hint explaining why.
async fn load_runs(args: &Args, client: &ApiClient) -> (Vec<Run>, Option<String>) {
    if let Some(ref path) = args.runs_file {
        return match read_runs_file(path) {
            Ok(runs) => {
                info!("Loaded {} runs from {}", runs.len(), path.display());
                (runs, None)
            }
            Err(e) => {
                warn!("{:#}", e);
                (Vec::new(), Some(RUNS_UNAVAILABLE.to_string()))
            }
        };
    }

    match with_spinner(args, "Fetching live runs...", client.list_available_runs()).await {
        Ok(runs) => {
            info!("Fetched {} available runs", runs.len());
            (runs, None)
        }
        Err(e) => {
            warn!("Run list unavailable: {}", e);
            let hint = match e {
                ClientError::Api { .. } | ClientError::NotAuthenticated => e.to_string(),
                _ => RUNS_UNAVAILABLE.to_string(),
            };
            (Vec::new(), Some(hint))
        }
    }
}

fn read_runs_file(path: &Path) -> Result<Vec<Run>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read runs file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse runs file: {}", path.display()))?;
    Ok(parse_run_list(value))
}

/// Await a backend call behind a spinner (suppressed in quiet and JSON modes).
async fn with_spinner<F, T>(args: &Args, message: &'static str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    if args.quiet || args.format == OutputFormat::Json {
        return future.await;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = future.await;
    spinner.finish_and_clear();
    result
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .brickyard.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

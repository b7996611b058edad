//! Headless driver for the landing page runtime.
//!
//! Reads the API key from `GEMINI_API_KEY` (or `API_KEY`).
//!
//! # Examples
//!
//! ```sh
//! # Ask for a diagnosis
//! landing diagnose --prompt "Procrastino tarefas importantes"
//!
//! # Pipe the challenge from stdin and print the clipboard summary
//! echo "Me falta foco" | landing diagnose --stdin --summary
//!
//! # Show the offer countdown, ticking once per second until it expires
//! landing countdown --watch
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use landing_rs::config::LandingConfig;
use landing_rs::countdown::{CountdownTick, init_countdown, now_ms};
use landing_rs::diagnosis::{DiagnosisFlow, DiagnosisResult, RequestState, submit};
use tracing_subscriber::EnvFilter;

/// Drive the landing page's diagnosis and countdown from a shell.
#[derive(Parser)]
#[command(name = "landing")]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Durable storage file
    #[arg(long, global = true, default_value = ".landing/storage.json")]
    storage: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request an AI performance diagnosis
    Diagnose {
        /// Challenge to analyse
        #[arg(long)]
        prompt: Option<String>,

        /// Read the challenge from stdin
        #[arg(long)]
        stdin: bool,

        /// Model to use
        #[arg(long, default_value = landing_rs::DEFAULT_MODEL)]
        model: String,

        /// API root (for proxies and local stubs)
        #[arg(long)]
        api_base: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Print the plain-text clipboard summary instead of the sections
        #[arg(long)]
        summary: bool,

        /// Print the result as JSON
        #[arg(long, conflicts_with = "summary")]
        json: bool,
    },

    /// Show the offer countdown
    Countdown {
        /// Keep printing once per second until the offer expires
        #[arg(long)]
        watch: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "warn,landing_rs=debug"
        } else {
            "warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// ── Helpers ────────────────────────────────────────────────────────

fn read_stdin_content() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    Ok(buf)
}

fn build_prompt(prompt: Option<&str>, stdin: bool) -> Result<String, String> {
    let piped = if stdin {
        Some(read_stdin_content()?)
    } else {
        None
    };
    match (prompt, piped) {
        (Some(p), Some(piped)) => Ok(format!("{p}\n\n{piped}")),
        (Some(p), None) => Ok(p.to_string()),
        (None, Some(piped)) => Ok(piped),
        (None, None) => Err("provide --prompt, --stdin, or both".to_string()),
    }
}

fn render_result(result: &DiagnosisResult) -> String {
    let mut out = String::new();
    for section in result.sections() {
        out.push_str(&format!(
            "{} {}\n{}\n\n",
            section.icon.glyph(),
            section.heading,
            section.body
        ));
    }
    out.push_str(&result.quote_block());
    out.push('\n');
    out
}

// ── Commands ───────────────────────────────────────────────────────

struct DiagnoseArgs<'a> {
    prompt: Option<&'a str>,
    stdin: bool,
    summary: bool,
    json: bool,
}

async fn diagnose(config: &LandingConfig, args: DiagnoseArgs<'_>) -> Result<String, String> {
    let prompt = build_prompt(args.prompt, args.stdin)?;
    let generator = config.build_generator().map_err(|e| e.to_string())?;
    if !generator.has_api_key() {
        tracing::warn!("No API key set; the request will fail");
    }

    let flow = Mutex::new(DiagnosisFlow::new());
    let state = submit(&flow, &generator, config, &prompt).await;
    tracing::debug!("Usage: {}", generator.usage().summary());

    match state {
        RequestState::Success(result) if args.json => serde_json::to_string_pretty(&result)
            .map(|s| s + "\n")
            .map_err(|e| format!("failed to encode result: {e}")),
        RequestState::Success(result) if args.summary => Ok(result.clipboard_summary() + "\n"),
        RequestState::Success(result) => Ok(render_result(&result)),
        RequestState::Error(message) => Err(message),
        RequestState::Idle => Err("prompt is empty".to_string()),
        RequestState::Loading => Err("request did not complete".to_string()),
    }
}

async fn countdown(config: &LandingConfig, watch: bool) -> Result<String, String> {
    let mut store = init_countdown(config.build_durable_store(), now_ms())
        .ok_or_else(|| "durable storage unavailable; countdown disabled".to_string())?;

    if !watch {
        return Ok(format!("{}\n", store.tick(now_ms()).fields()));
    }

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
        match store.tick(now_ms()) {
            CountdownTick::Running(fields) => println!("{fields}"),
            CountdownTick::Expired(fields) => return Ok(format!("{fields}\n")),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = LandingConfig {
        storage_path: Some(cli.storage.clone()),
        ..Default::default()
    };

    let outcome = match &cli.command {
        Command::Diagnose {
            prompt,
            stdin,
            model,
            api_base,
            timeout_secs,
            summary,
            json,
        } => {
            config.model = model.clone();
            if let Some(base) = api_base {
                config.api_base = base.clone();
            }
            config.request_timeout = Duration::from_secs(*timeout_secs);
            let args = DiagnoseArgs {
                prompt: prompt.as_deref(),
                stdin: *stdin,
                summary: *summary,
                json: *json,
            };
            diagnose(&config, args).await
        }
        Command::Countdown { watch } => countdown(&config, *watch).await,
    };

    match outcome {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

//! CLI entry point for hireline

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::error;

use hireline_analyzer::{analyze_documents, Analyzer, OpenAiAnalyzer};
use hireline_core::config::ConfigLoader;
use hireline_core::logging::init_logging;
use hireline_server::{run_server, AppState};

#[derive(Parser)]
#[command(name = "hireline")]
#[command(about = "Recruiting chat relay and resume review gateway")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay gateway
    Serve {
        /// Bind host override
        #[arg(long)]
        host: Option<String>,
        /// Bind port override
        #[arg(long)]
        port: Option<u16>,
    },
    /// One-shot review of a parsed resume against a parsed vacancy
    Analyze {
        /// Path to the parsed resume JSON
        #[arg(long)]
        resume: PathBuf,
        /// Path to the parsed vacancy JSON
        #[arg(long)]
        vacancy: PathBuf,
        /// Print the gaps and skip question generation
        #[arg(long)]
        gaps_only: bool,
    },
    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config_loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };

    match cli.command {
        Commands::Serve { host, port } => run_serve(&config_loader, host, port).await,
        Commands::Analyze {
            resume,
            vacancy,
            gaps_only,
        } => run_analyze(&config_loader, &resume, &vacancy, gaps_only).await,
        Commands::Status => run_status(&config_loader),
    }
}

async fn run_serve(
    loader: &ConfigLoader,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let config = loader.load()?;
    let _guard = init_logging(&config.logging);

    let analyzer = OpenAiAnalyzer::new(&config.analyzer);
    let configured = analyzer.is_configured();
    if !configured {
        println!(
            "{}",
            style("Warning: no analyzer API key configured; chat turns will fail.").yellow()
        );
    }

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("{}", style("Starting Hireline Gateway...").bold().cyan());
    println!("Model: {}", config.analyzer.model);

    let state = AppState::new(Arc::new(analyzer), config.relay.clone(), configured);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let mut server_handle =
        tokio::spawn(async move { run_server(state, &host, port, shutdown_rx).await });

    println!(
        "{}",
        style("Gateway is running. Press Ctrl+C to stop.").green()
    );

    tokio::select! {
        result = &mut server_handle => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n{}", style("Shutting down...").yellow());
            let _ = shutdown_tx.send(());
            match server_handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Server error during shutdown: {}", e),
                Err(e) => error!("Server task failed: {}", e),
            }
        }
    }

    println!("{}", style("Gateway stopped.").green());
    Ok(())
}

async fn run_analyze(
    loader: &ConfigLoader,
    resume_path: &Path,
    vacancy_path: &Path,
    gaps_only: bool,
) -> Result<()> {
    let config = loader.load()?;
    let resume = read_document(resume_path)?;
    let vacancy = read_document(vacancy_path)?;

    println!("{}", style("=== RESUME AND VACANCY REVIEW ===").bold());
    println!(
        "Vacancy: {}",
        vacancy.get("job_title").and_then(Value::as_str).unwrap_or("N/A")
    );
    println!(
        "Candidate: {}",
        resume.get("name").and_then(Value::as_str).unwrap_or("N/A")
    );
    println!();

    let gaps = analyze_documents(&resume, &vacancy);
    println!("{}", style("=== IDENTIFIED GAPS ===").bold());
    if gaps.is_empty() {
        println!("No significant differences found.");
    } else {
        for (i, gap) in gaps.iter().enumerate() {
            println!("{}. {}", i + 1, gap.description);
        }
    }

    if gaps_only {
        return Ok(());
    }

    let analyzer = OpenAiAnalyzer::new(&config.analyzer);
    if !analyzer.is_configured() && !gaps.is_empty() {
        anyhow::bail!(
            "no analyzer API key configured; set OPENAI_API_KEY or rerun with --gaps-only"
        );
    }

    println!();
    println!(
        "{}",
        style("=== RECOMMENDED INTERVIEW QUESTIONS ===").bold()
    );
    match analyzer.interview_questions(&resume, &vacancy, &gaps).await {
        Ok(questions) => println!("{}", questions),
        Err(e) => anyhow::bail!("question generation failed: {}", e),
    }

    Ok(())
}

fn run_status(loader: &ConfigLoader) -> Result<()> {
    let config = loader.load()?;

    println!("Config dir: {}", loader.config_dir().display());
    println!("Server: {}:{}", config.server.host, config.server.port);
    println!("Model: {}", config.analyzer.model);
    println!(
        "API key: {}",
        if config.analyzer.api_key.is_empty() {
            "not set"
        } else {
            "set"
        }
    );
    println!("History window: {}", config.analyzer.history_window);
    match config.relay.idle_timeout_secs {
        Some(secs) => println!("Idle timeout: {}s", secs),
        None => println!("Idle timeout: disabled"),
    }

    Ok(())
}

fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path.display(), e))
}

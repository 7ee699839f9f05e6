// LogLens CLI - upload a log file and read the AI report in the terminal

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use loglens_core::{AnalysisReport, AnomalyKind};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const MESSAGE_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "loglens")]
#[command(author = "LogLens Team")]
#[command(version = "0.1.0")]
#[command(about = "AI-Powered Log Analysis CLI", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(short, long, env = "LOGLENS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a log file for analysis
    Analyze {
        /// Path to log file
        file: PathBuf,

        /// Specific question about the log (optional)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Print the raw JSON report instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check that the API server is up
    Status,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
    message: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api_url = cli.api_url.trim_end_matches('/');

    match cli.command {
        Commands::Analyze { file, query, json } => {
            analyze_file(&client, api_url, &file, &query, json).await?;
        }
        Commands::Status => {
            check_status(&client, api_url).await?;
        }
    }

    Ok(())
}

async fn analyze_file(
    client: &reqwest::Client,
    api_url: &str,
    path: &Path,
    query: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.log".to_string());

    if !json {
        println!("\n{} {}", "📄 Analyzing:".cyan().bold(), filename);
        println!("{} {:.2} MB", "Size:".dimmed(), bytes.len() as f64 / 1024.0 / 1024.0);
        if !query.is_empty() {
            println!("{} {}", "Question:".dimmed(), query);
        }
        println!("{}", "─".repeat(60).dimmed());
    }

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(filename)
        .mime_str("text/plain")?;
    let form = reqwest::multipart::Form::new()
        .part("file", part)
        .text("query", query.to_string());

    let spinner = (!json).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]").unwrap_or_else(|_| ProgressStyle::default_spinner()));
        pb.set_message("Waiting for AI analysis...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let start = Instant::now();
    let response = client
        .post(format!("{}/api/analyze", api_url))
        .multipart(form)
        .send()
        .await;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let response = match response {
        Ok(resp) => resp,
        Err(e) => {
            println!("{} The server is not responding. Is the backend running? ({})", "Error:".red().bold(), e);
            return Ok(());
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await?;
        let detail = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.detail)
            .unwrap_or(text);
        println!("{} {} ({})", "Error:".red().bold(), detail, status);
        return Ok(());
    }

    let report: AnalysisReport = response.json().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    println!(
        "\n{} {}ms",
        "Response time:".dimmed(),
        start.elapsed().as_millis()
    );

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("\n{}", "📋 Summary".cyan().bold());
    println!("{}\n", report.summary);

    if report.anomalies.is_empty() {
        println!("  {} No anomalies reported", "✓".green());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Type", "Timestamp", "Message"]);

    for (i, anomaly) in report.anomalies.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            colored_kind(anomaly.kind),
            anomaly.timestamp.clone(),
            shorten(&anomaly.message, MESSAGE_WIDTH),
        ]);
    }

    println!("{table}");

    let counts = report.count_by_kind();
    println!(
        "\n{} {} errors, {} warnings, {} info",
        "Total:".dimmed(),
        counts.error.to_string().red(),
        counts.warning.to_string().yellow(),
        counts.info.to_string().blue()
    );
}

fn colored_kind(kind: AnomalyKind) -> String {
    match kind {
        AnomalyKind::Error => kind.as_str().to_uppercase().red().bold().to_string(),
        AnomalyKind::Warning => kind.as_str().to_uppercase().yellow().to_string(),
        AnomalyKind::Info => kind.as_str().to_uppercase().blue().to_string(),
    }
}

// cut on char boundaries, never inside a multi-byte char
fn shorten(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let cut: String = message.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}

async fn check_status(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "🔧 System Status".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    print!("  API Server ({})... ", api_url);
    io::stdout().flush()?;

    match client.get(format!("{}/", api_url)).send().await {
        Ok(resp) if resp.status().is_success() => match resp.json::<HealthResponse>().await {
            Ok(health) if health.status == "ok" => {
                println!("{} {}", "✓ Running".green(), health.message.dimmed());
            }
            _ => println!("{}", "✗ Unexpected health response".red()),
        },
        Ok(resp) => {
            println!("{} ({})", "✗ Error".red(), resp.status());
        }
        Err(e) => {
            println!("{} ({})", "✗ Down".red(), e);
        }
    }

    Ok(())
}

use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use env_logger::Env;
use log::info;

use statement_to_csv::config::{DEFAULT_MODEL, GEMINI_BASE_URL};
use statement_to_csv::server::{self, AppState};
use statement_to_csv::{
    aggregate, format_dashboard, format_table, BackendClient, ParseInput, RelayConfig,
    StatementExtractor, TransactionTable, DEFAULT_BACKEND_URL,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP backend that relays statements to the model
    Serve(ServeArgs),
    /// Send a statement to a running backend and show the result
    Parse(ParseArgs),
    /// Show an existing CSV result as a table or dashboard
    Summarize(SummarizeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Model API key; API_KEY is read as a fallback
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = GEMINI_BASE_URL)]
    base_url: String,

    /// Deadline for each model call
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,
}

#[derive(Args)]
struct ParseArgs {
    /// Statement image, PDF or text file
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// File with pasted statement text, or `-` for stdin
    #[arg(long)]
    text: Option<PathBuf>,

    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend: String,

    #[arg(long, value_enum, default_value_t = View::Csv)]
    view: View,

    /// Also write the CSV result here
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SummarizeArgs {
    /// CSV file, or `-` for stdin
    csv: PathBuf,

    #[arg(long, value_enum, default_value_t = View::Dashboard)]
    view: View,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Csv,
    Table,
    Dashboard,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Parse(args) => parse(args).await,
        Command::Summarize(args) => {
            let csv = read_source(&args.csv)?;
            println!("{}", render(&csv, args.view)?);
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let api_key = args
        .api_key
        .or_else(|| std::env::var("API_KEY").ok())
        .filter(|k| !k.is_empty())
        .context("GEMINI_API_KEY (or API_KEY) must be set")?;

    let config = RelayConfig::new(api_key)
        .with_model(args.model)
        .with_base_url(args.base_url)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    info!("Relay configuration: {:?}", config);

    let extractor = StatementExtractor::from_config(&config)?;
    server::serve(args.bind, Arc::new(AppState::new(extractor))).await?;
    Ok(())
}

async fn parse(args: ParseArgs) -> anyhow::Result<()> {
    let input = match (&args.file, &args.text) {
        (Some(path), _) => ParseInput::from_path(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        (None, Some(source)) => ParseInput::Text(read_source(source)?),
        (None, None) => ParseInput::Text(String::new()),
    };
    if matches!(&input, ParseInput::Text(text) if text.trim().is_empty()) {
        bail!("Please upload a file or paste your bank statement text.");
    }

    let csv = BackendClient::new(&args.backend)
        .parse(&input)
        .await
        .context("Failed to parse transactions")?;

    if let Some(path) = &args.output {
        std::fs::write(path, &csv)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote CSV to {}", path.display());
    }

    println!("{}", render(&csv, args.view)?);
    Ok(())
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn render(csv: &str, view: View) -> anyhow::Result<String> {
    let rendered = match view {
        View::Csv => csv.to_string(),
        View::Table => format_table(&TransactionTable::from_csv(csv)),
        View::Dashboard => match aggregate(csv) {
            Some(dashboard) => format_dashboard(&dashboard),
            None => "No transactions to summarize.".to_string(),
        },
        View::Json => {
            serde_json::to_string_pretty(&TransactionTable::from_csv(csv).transactions())?
        }
    };
    Ok(rendered)
}

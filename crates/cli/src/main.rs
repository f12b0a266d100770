//! Merge Invoker CLI - runs the external three-way merge executable once
//!
//! Exit code: the merge executable's own code when it ran to completion,
//! 2 on configuration errors, 124 on timeout, 1 on any other failure.

mod settings;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use merge_invoker_core::{InvocationResult, InvokeError, MergeExecutor};
use merge_invoker_infra_system::ProcessInvoker;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use settings::Overrides;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "merge_invoker=warn";

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIGURATION: u8 = 2;
const EXIT_TIMEOUT: u8 = 124;

#[derive(Parser)]
#[command(name = "merge-invoker")]
#[command(about = "Run the external three-way merge executable", long_about = None)]
#[command(version)]
struct Cli {
    /// File carrying the user's modifications
    #[arg(long)]
    current_file: PathBuf,

    /// Freshly generated file
    #[arg(long)]
    generated_file: PathBuf,

    /// File the merge result is written to
    #[arg(long)]
    output_file: PathBuf,

    /// Merge executable (default: ./dart-ast-merge)
    #[arg(short, long)]
    executable: Option<String>,

    /// Timeout in seconds (default: 30)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Resolve the three files against this directory
    #[arg(long)]
    root: Option<PathBuf>,

    /// Extra TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log format on stderr
    #[arg(long, env = "MERGE_INVOKER_LOG_FORMAT", value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cli: &Cli) -> Result<InvocationResult> {
    let overrides = Overrides {
        config_file: cli.config.clone(),
        executable: cli.executable.clone(),
        timeout_secs: cli.timeout,
    };
    let config = settings::load(settings::user_config_file().as_deref(), &overrides)?;

    info!(
        executable = %config.executable.display(),
        timeout_secs = config.timeout.as_secs(),
        "Merge invoker v{} configured",
        VERSION
    );

    let invoker = ProcessInvoker::new(config)?;

    let result = match &cli.root {
        Some(root) => {
            invoker
                .invoke_relative(root, &cli.current_file, &cli.generated_file, &cli.output_file)
                .await?
        }
        None => {
            invoker
                .invoke(&cli.current_file, &cli.generated_file, &cli.output_file)
                .await?
        }
    };

    Ok(result)
}

fn print_result(result: &InvocationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.success {
        println!("{}", "✓ Merge succeeded".green().bold());
    } else {
        println!(
            "{}",
            format!("✗ Merge failed (exit code {})", result.exit_code)
                .red()
                .bold()
        );
    }
    println!("  {} {}ms", "Elapsed:".bold(), result.elapsed_ms);

    if !result.output.is_empty() {
        println!();
        print!("{}", result.output);
    }

    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<InvokeError>() {
        Some(InvokeError::Configuration { .. }) => EXIT_CONFIGURATION,
        Some(InvokeError::Timeout(_)) => EXIT_TIMEOUT,
        Some(InvokeError::Io(_)) => EXIT_FAILURE,
        None if err.downcast_ref::<config::ConfigError>().is_some() => EXIT_CONFIGURATION,
        None => EXIT_FAILURE,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let outcome = match run(&cli).await {
        Ok(result) => print_result(&result, cli.json)
            .map(|()| u8::try_from(result.exit_code).unwrap_or(EXIT_FAILURE)),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

//! agllm - Autograder feedback generator
//!
//! Entry point: parse the repository name and overrides, set up logging,
//! run the feedback pipeline once, and map failures to a non-zero exit.

use agllm_core::{AppConfig, ConfigArgs, LlmConfig, OllamaClient, Pipeline};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agllm")]
#[command(about = "Generate question-based feedback for a student repository", long_about = None)]
#[command(version)]
struct Cli {
    /// Student repository name
    repo_name: String,

    #[command(flatten)]
    config: ConfigArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AGLLM_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Quiet the HTTP stack unless explicitly asked for
    let filter = EnvFilter::new(format!(
        "agllm={level},agllm_core={level},hyper=warn,reqwest=warn",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("agllm v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_args(cli.config);

    let client = match OllamaClient::new(LlmConfig::from_app_config(&config)) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    match Pipeline::new(&config, &client).run(&cli.repo_name).await {
        Ok(report) => {
            println!("📄  Feedback saved → {}", report.feedback_path.display());
            println!(
                "✅ Data inserted into {} (submission {}, {} file(s))",
                config.db_path.display(),
                report.submission_id,
                report.file_count
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed for {}: {}", cli.repo_name, e);
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

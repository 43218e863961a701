//! Command-line trigger for Jenkins notify-commit.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use jenkins_notify::config::ConfigLoader;
use jenkins_notify::logger::init_logger;
use jenkins_notify::{
    AppError, DefaultHttpClientFactory, Notifier, Repository, StaticSettingsService,
};

/// Send a notify-commit request to a Jenkins instance
#[derive(Parser, Debug)]
#[command(name = "jenkins-notify")]
#[command(about = "Send a notify-commit request to a Jenkins instance")]
#[command(version)]
struct Cli {
    /// Base URL of the Jenkins instance
    #[arg(long, value_name = "URL")]
    base_url: String,

    /// Clone URL of the repository Jenkins should match jobs against
    #[arg(long, value_name = "URL")]
    clone_url: String,

    /// Repository identity used in log output
    #[arg(long, value_name = "PROJECT/NAME", default_value = "cli/manual")]
    repository: String,

    /// Accept any TLS certificate when the Jenkins URL is https
    #[arg(long)]
    trust_all_certs: bool,

    /// Seconds to wait for Jenkins before giving up
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    wait_timeout: u64,

    /// Print the result as JSON instead of the plain message
    #[arg(long)]
    json: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_file(path),
        None => ConfigLoader::new(),
    };
    let mut settings = loader.load()?;
    if cli.verbose {
        settings.logger.level = "debug".to_string();
    }
    if cli.quiet {
        settings.logger.level = "error".to_string();
    }
    init_logger(&settings.logger)?;

    let repo = parse_repository(&cli.repository);
    let notifier = Notifier::new(
        Arc::new(StaticSettingsService::new()),
        Arc::new(DefaultHttpClientFactory::new(settings.http)),
    );

    let handle = notifier.notify_with(&repo, &cli.base_url, cli.trust_all_certs, &cli.clone_url)?;

    // The dispatcher applies no intrinsic timeout; the deadline is ours.
    let waited = tokio::time::timeout(Duration::from_secs(cli.wait_timeout), handle.wait()).await;

    Ok(match waited {
        Ok(Ok(result)) => {
            if cli.json {
                println!("{}", serde_json::to_string(&result)?);
            } else {
                println!("{}", result.message);
            }
            if result.successful {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Ok(Err(AppError::Cancelled)) => {
            eprintln!("notification cancelled");
            ExitCode::from(2)
        }
        Ok(Err(e)) => {
            eprintln!("notification failed: {}", e);
            ExitCode::from(2)
        }
        Err(_) => {
            eprintln!(
                "no response from Jenkins within {} seconds",
                cli.wait_timeout
            );
            ExitCode::from(2)
        }
    })
}

fn parse_repository(value: &str) -> Repository {
    match value.split_once('/') {
        Some((project, name)) => Repository::new(project, name),
        None => Repository::new("cli", value),
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use runtriage::api::ApiClient;
use runtriage::{config, retry, runs};

#[derive(Parser)]
#[command(
    name = "runtriage",
    about = "Inspect and retry scheduled task runs on an InfluxDB-compatible server",
    version,
    long_about = None
)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'c', long, global = true, default_value = "default")]
    active_config: String,

    /// Path to the config store (default: ~/.influxdbv2/configs)
    #[arg(long, global = true)]
    configs_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commands for working with tasks
    Tasks {
        #[command(subcommand)]
        action: TasksAction,
    },
}

#[derive(Subcommand)]
enum TasksAction {
    /// Show recent runs for a task, or one run with its log
    Runs {
        /// The id of the task to operate on
        #[arg(short = 'i', long)]
        task_id: String,

        /// Number of runs to display (server caps at 500)
        #[arg(short = 'l', long, default_value_t = runs::DEFAULT_LIMIT)]
        limit: u32,

        /// Only show runs scheduled at or after this time (2020-10-04T03:00:00Z)
        #[arg(short = 'a', long)]
        after: Option<String>,

        /// Show this single run and its full log
        #[arg(short = 'r', long)]
        run_id: Option<String>,
    },

    /// Retry failed runs for a task
    Retry {
        /// The id of the task to operate on
        #[arg(short = 'i', long)]
        task_id: String,

        /// Retry every run slot whose latest attempt failed
        #[arg(long)]
        all_failed: bool,
    },
}

fn default_configs_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .context("HOME is not set; pass --configs-path explicitly")?;
    Ok(PathBuf::from(home).join(".influxdbv2").join("configs"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let configs_path = match cli.configs_path {
        Some(path) => path,
        None => default_configs_path()?,
    };
    let profile = config::load_profile(&configs_path, &cli.active_config)?;
    let client = ApiClient::new(&profile)?;

    match cli.command {
        Commands::Tasks { action } => match action {
            TasksAction::Runs {
                task_id,
                limit,
                after,
                run_id,
            } => match run_id {
                Some(run_id) => {
                    tracing::debug!(%task_id, %run_id, "showing single run");
                    runs::show(&client, &task_id, &run_id).await?;
                }
                None => {
                    tracing::debug!(%task_id, %limit, "listing runs");
                    runs::list(&client, &task_id, limit, after.as_deref()).await?;
                }
            },
            TasksAction::Retry {
                task_id,
                all_failed,
            } => {
                tracing::debug!(%task_id, %all_failed, "retrying failed runs");
                retry::retry_all_failed(&client, &task_id, all_failed).await?;
            }
        },
    }

    Ok(())
}

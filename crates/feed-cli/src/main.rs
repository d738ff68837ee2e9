//! feedctl: command-line client for the feed document gateway
//!
//! Reads `feed.toml`, signs in (remotely with email/password, or as a
//! local user id against the in-memory store) and runs one command.

mod commands;

use clap::Parser;
use feed_sdk::{Backend, ExecutionContext, FeedConfig, Identity};
use tracing::info;

#[derive(Parser)]
#[command(name = "feedctl")]
#[command(about = "Read and write feed documents through the authenticated gateway")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "FEED_CONFIG", default_value = "feed.toml")]
    config: String,

    /// Execution environment (overrides config file)
    #[arg(long = "env", env = "FEED_ENV")]
    environment: Option<ExecutionContext>,

    /// Account email for remote sign-in
    #[arg(long, env = "FEED_EMAIL")]
    email: Option<String>,

    /// Account password for remote sign-in
    #[arg(long, env = "FEED_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Act as this user id without remote sign-in
    #[arg(long, conflicts_with = "email")]
    uid: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feed_sdk=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = FeedConfig::load(&cli.config)?;
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    info!("Environment: {}", config.environment);

    let backend = Backend::connect(config)?;

    match (cli.email, cli.password, cli.uid) {
        (Some(email), Some(password), _) => {
            let sign_in = backend
                .remote_sign_in()
                .ok_or_else(|| anyhow::anyhow!("remote sign-in needs an [auth] section"))?;
            sign_in.sign_in_with_password(&email, &password).await?;
        }
        (Some(_), None, _) => anyhow::bail!("--email requires --password"),
        (None, _, Some(uid)) => backend.session().sign_in(Identity::new(uid)),
        (None, _, None) => {}
    }

    let output = commands::execute(&backend, cli.command).await?;
    println!("{}", output);
    Ok(())
}

use clap::Parser;
use igpsport_client::config::Config;
use igpsport_client::http_client::ReqwestIgpsportClient;
use igpsport_sync::cli::Args;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the token may come from the real environment.
    let dotenv = dotenvy::dotenv();

    // Configure logging from env var `IGPSPORT_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("IGPSPORT_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Keep HTTP internals quiet by default
    let combined_filter = format!("{},hyper_util=warn,reqwest=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper_util=warn,reqwest=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!("igpsport-sync: log filter: {}", log_env);
    if let Err(e) = dotenv {
        tracing::debug!("igpsport-sync: no .env loaded: {}", e);
    }

    let args = Args::parse();
    let cfg = Config::from_env()?;
    let client = Arc::new(ReqwestIgpsportClient::new(cfg)?);

    let mut stdout = std::io::stdout();
    igpsport_sync::commands::run(args.command, client, &mut stdout).await
}

//! Subcommand handlers. Each one fetches the listing first; a listing
//! failure is the only error that makes a command fail.

use crate::cli::{Command, FilterArgs};
use crate::dump::{default_dump_path, write_activities};
use crate::stats::ActivityStats;
use anyhow::Context;
use igpsport_client::downloader::{DownloadEvent, DownloadOptions, Downloader};
use igpsport_client::{Activity, IgpsportClient};
use std::io::Write;
use std::sync::Arc;

pub async fn run<W: Write>(
    command: Command,
    client: Arc<dyn IgpsportClient>,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::List(filter) => {
            let activities = fetch(client.as_ref(), &filter).await?;
            for (i, a) in activities.iter().enumerate() {
                writeln!(
                    out,
                    "{}. {} - {} ({:.2} km) [ride {}]",
                    i + 1,
                    a.start_time,
                    a.title,
                    a.ride_distance / 1000.0,
                    a.ride_id
                )?;
            }
        }
        Command::Dump { filter, output } => {
            let activities = fetch(client.as_ref(), &filter).await?;
            let path = output.unwrap_or_else(|| default_dump_path(&chrono::Local::now()));
            write_activities(&path, &activities).await?;
            writeln!(out, "Saved {} activities to {}", activities.len(), path.display())?;
        }
        Command::Stats(filter) => {
            let activities = fetch(client.as_ref(), &filter).await?;
            writeln!(out, "=== Activity Statistics ===")?;
            writeln!(out, "{}", ActivityStats::from_activities(&activities))?;
        }
        Command::Download { filter, dir, dump } => {
            let activities = fetch(client.as_ref(), &filter).await?;
            if let Some(path) = dump {
                write_activities(&path, &activities).await?;
            }
            let options = DownloadOptions::default()
                .with_download_dir(dir)
                .with_request_delay(filter.delay());
            let downloader = Downloader::new(client, options);
            let report = downloader.run_with(&activities, log_progress).await;
            writeln!(
                out,
                "Downloaded {}/{} activities into {} ({} failed)",
                report.saved.len(),
                report.attempted,
                downloader.download_dir().display(),
                report.failed.len()
            )?;
            for err in &report.failed {
                writeln!(out, "  {err}")?;
            }
        }
    }
    Ok(())
}

async fn fetch(client: &dyn IgpsportClient, filter: &FilterArgs) -> anyhow::Result<Vec<Activity>> {
    tracing::info!("fetching activities");
    let activities = client
        .list_activities(&filter.to_filter())
        .await
        .context("failed to fetch activities")?;
    tracing::info!("found {} activities", activities.len());
    Ok(activities)
}

fn log_progress(event: &DownloadEvent<'_>) {
    if let DownloadEvent::Started {
        position,
        total,
        activity,
    } = event
    {
        tracing::info!(
            "[{position}/{total}] processing activity: {} (ride {})",
            activity.title,
            activity.ride_id
        );
    }
}

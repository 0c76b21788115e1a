//! JSON snapshot of an activity list.

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use igpsport_client::Activity;
use std::path::{Path, PathBuf};

/// `<YYYY-MM-DD_HHMMSS>-activities.json` in the working directory.
pub fn default_dump_path<Tz: TimeZone>(now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(format!("{}-activities.json", now.format("%Y-%m-%d_%H%M%S")))
}

pub async fn write_activities(path: &Path, activities: &[Activity]) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(activities).context("serializing activities")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), count = activities.len(), "activities saved");
    Ok(())
}

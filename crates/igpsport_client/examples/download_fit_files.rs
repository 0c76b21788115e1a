use futures_util::StreamExt;
use igpsport_client::{
    ActivityFilter, IgpsportClient,
    config::Config,
    downloader::{DownloadEvent, DownloadOptions, Downloader},
    http_client::ReqwestIgpsportClient,
};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    let client = Arc::new(ReqwestIgpsportClient::new(cfg)?);

    let begin = std::env::args()
        .nth(1)
        .map(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()?;
    let mut filter = ActivityFilter::default();
    if let Some(begin) = begin {
        filter = filter.with_begin(begin);
    }

    let activities = client.list_activities(&filter).await?;
    let dir = std::env::var("IGPSPORT_DOWNLOAD_DIR").unwrap_or_else(|_| "fit_files".into());
    let downloader = Downloader::new(client, DownloadOptions::default().with_download_dir(dir));

    let mut events = std::pin::pin!(downloader.download_all(&activities));
    while let Some(event) = events.next().await {
        match event {
            DownloadEvent::Started {
                position,
                total,
                activity,
            } => println!("[{position}/{total}] {} (ride {})", activity.title, activity.ride_id),
            DownloadEvent::Saved { file, .. } => println!("  saved {}", file.path.display()),
            DownloadEvent::Failed { error, .. } => eprintln!("  {error}"),
        }
    }
    Ok(())
}

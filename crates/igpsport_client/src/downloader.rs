//! Batch download of activity FIT files.
//!
//! [`Downloader::download_all`] walks a slice of activities one at a time and
//! yields a [`DownloadEvent`] stream: a `Started` event before each attempt,
//! then either `Saved` or `Failed`. A failed item never stops the batch.
//! Callers pick how to consume the stream; [`Downloader::run`] folds it into
//! a [`DownloadReport`].

use crate::filename::fit_filename;
use crate::pacer::{Pacer, TokioPacer};
use crate::{Activity, DEFAULT_REQUEST_DELAY, IgpsportClient, IgpsportError};
use futures_util::{Stream, StreamExt, future, stream};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DOWNLOAD_DIR: &str = "downloaded_fit_files";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadOptions {
    pub download_dir: PathBuf,
    /// Pause between two items; none after the last one.
    pub request_delay: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl DownloadOptions {
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

/// Step of a single download at which an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadStage {
    ResolveUrl,
    FetchFile,
    CreateDir,
    WriteFile,
}

impl fmt::Display for DownloadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadStage::ResolveUrl => "resolve download url",
            DownloadStage::FetchFile => "fetch file",
            DownloadStage::CreateDir => "create download directory",
            DownloadStage::WriteFile => "write file",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
#[error("ride {ride_id}: failed to {stage}: {source}")]
pub struct DownloadError {
    pub ride_id: i64,
    pub stage: DownloadStage,
    #[source]
    pub source: IgpsportError,
}

impl DownloadError {
    fn at(ride_id: i64, stage: DownloadStage) -> impl FnOnce(IgpsportError) -> Self {
        move |source| Self {
            ride_id,
            stage,
            source,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Per-item outcome of a batch, borrowing the activity it refers to.
#[derive(Debug)]
pub enum DownloadEvent<'a> {
    /// Emitted before the attempt. `position` is 1-based.
    Started {
        position: usize,
        total: usize,
        activity: &'a Activity,
    },
    Saved {
        activity: &'a Activity,
        file: SavedFile,
    },
    Failed {
        activity: &'a Activity,
        error: DownloadError,
    },
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub attempted: usize,
    pub saved: Vec<SavedFile>,
    pub failed: Vec<DownloadError>,
}

impl DownloadReport {
    /// Account for one event of a [`Downloader::download_all`] stream.
    pub fn record(&mut self, event: DownloadEvent<'_>) {
        match event {
            DownloadEvent::Started { .. } => self.attempted += 1,
            DownloadEvent::Saved { file, .. } => self.saved.push(file),
            DownloadEvent::Failed { error, .. } => self.failed.push(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Cursor {
    Announce(usize),
    Attempt(usize),
}

pub struct Downloader {
    client: Arc<dyn IgpsportClient>,
    options: DownloadOptions,
    pacer: Arc<dyn Pacer>,
}

impl Downloader {
    pub fn new(client: Arc<dyn IgpsportClient>, options: DownloadOptions) -> Self {
        Self {
            client,
            options,
            pacer: Arc::new(TokioPacer),
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.options.download_dir
    }

    /// Resolve, fetch and persist one activity's FIT file, overwriting any
    /// existing file of the same name.
    pub async fn download_one(&self, activity: &Activity) -> Result<SavedFile, DownloadError> {
        let ride_id = activity.ride_id;
        let url = self
            .client
            .get_download_url(ride_id)
            .await
            .map_err(DownloadError::at(ride_id, DownloadStage::ResolveUrl))?;
        let data = self
            .client
            .download_file(&url)
            .await
            .map_err(DownloadError::at(ride_id, DownloadStage::FetchFile))?;

        let dir = &self.options.download_dir;
        tokio::fs::create_dir_all(dir).await.map_err(|source| {
            DownloadError::at(ride_id, DownloadStage::CreateDir)(IgpsportError::Filesystem {
                path: dir.clone(),
                source,
            })
        })?;

        let path = dir.join(fit_filename(activity));
        tokio::fs::write(&path, &data).await.map_err(|source| {
            DownloadError::at(ride_id, DownloadStage::WriteFile)(IgpsportError::Filesystem {
                path: path.clone(),
                source,
            })
        })?;

        Ok(SavedFile {
            path,
            bytes: data.len(),
        })
    }

    /// Lazily download every activity in order.
    ///
    /// The inter-item pause happens while polling for the next `Started`
    /// event, so dropping the stream after an item's outcome never waits.
    pub fn download_all<'a>(
        &'a self,
        activities: &'a [Activity],
    ) -> impl Stream<Item = DownloadEvent<'a>> + 'a {
        let total = activities.len();
        stream::unfold(Cursor::Announce(0), move |cursor| async move {
            match cursor {
                Cursor::Announce(index) => {
                    let activity = activities.get(index)?;
                    if index > 0 {
                        self.pacer.pause(self.options.request_delay).await;
                    }
                    tracing::debug!(
                        position = index + 1,
                        total,
                        ride_id = activity.ride_id,
                        title = %activity.title,
                        "processing activity"
                    );
                    let event = DownloadEvent::Started {
                        position: index + 1,
                        total,
                        activity,
                    };
                    Some((event, Cursor::Attempt(index)))
                }
                Cursor::Attempt(index) => {
                    let activity = &activities[index];
                    let event = match self.download_one(activity).await {
                        Ok(file) => {
                            metrics::counter!("igpsport_downloads_total", "outcome" => "saved")
                                .increment(1);
                            DownloadEvent::Saved { activity, file }
                        }
                        Err(error) => {
                            metrics::counter!("igpsport_downloads_total", "outcome" => "failed")
                                .increment(1);
                            tracing::warn!(ride_id = activity.ride_id, "{error}");
                            DownloadEvent::Failed { activity, error }
                        }
                    };
                    Some((event, Cursor::Announce(index + 1)))
                }
            }
        })
    }

    /// Drive [`download_all`](Self::download_all) to completion.
    pub async fn run(&self, activities: &[Activity]) -> DownloadReport {
        self.run_with(activities, |_| {}).await
    }

    /// Like [`run`](Self::run), showing each event to `on_event` before it is
    /// recorded.
    pub async fn run_with<F>(&self, activities: &[Activity], mut on_event: F) -> DownloadReport
    where
        F: FnMut(&DownloadEvent<'_>),
    {
        self.download_all(activities)
            .fold(DownloadReport::default(), |mut report, event| {
                on_event(&event);
                report.record(event);
                future::ready(report)
            })
            .await
    }
}

//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};
use igpsport_client::downloader::DEFAULT_DOWNLOAD_DIR;
use igpsport_client::{ActivityFilter, DEFAULT_PAGE_SIZE};
use std::path::PathBuf;
use std::time::Duration;

/// Fetch iGPSport activity history and download the FIT file of every ride.
///
/// The auth token is read from `IGPSPORT_AUTH_TOKEN` (or `AUTHORIZATION`),
/// optionally via a `.env` file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "igpsport-sync")]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one line per activity
    List(FilterArgs),
    /// Write the activity list as pretty JSON
    Dump {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file (defaults to `<timestamp>-activities.json`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print aggregate distance, time and ascent statistics
    Stats(FilterArgs),
    /// Download the FIT file of every listed activity
    Download {
        #[command(flatten)]
        filter: FilterArgs,
        /// Target directory, created if missing
        #[arg(short, long, default_value = DEFAULT_DOWNLOAD_DIR)]
        dir: PathBuf,
        /// Also write the activity list as JSON to this file
        #[arg(long)]
        dump: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct FilterArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub begin: Option<chrono::NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<chrono::NaiveDate>,

    /// Rows requested per listing page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Result ordering mode understood by the service
    #[arg(long, default_value_t = 0)]
    pub sort: i32,

    /// Request-type discriminator understood by the service
    #[arg(long, default_value_t = 0)]
    pub req_type: i32,

    /// Delay between consecutive requests in milliseconds (max 60000)
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub delay_ms: u64,
}

impl FilterArgs {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn to_filter(&self) -> ActivityFilter {
        let mut filter = ActivityFilter::default()
            .with_page_size(self.page_size)
            .with_sort(self.sort)
            .with_req_type(self.req_type)
            .with_request_delay(self.delay());
        if let Some(begin) = self.begin {
            filter = filter.with_begin(begin);
        }
        if let Some(end) = self.end {
            filter = filter.with_end(end);
        }
        filter
    }
}

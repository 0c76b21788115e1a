//! `IgpsportClient` trait, the activity data model and a reqwest-based client
//! for the iGPSport web-analyze API.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub mod config;
pub mod downloader;
pub mod filename;
pub mod http_client;
pub mod pacer;
pub mod transport;

/// Failures of a single HTTP exchange, distinguished by cause.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode {encoding} body: {source}")]
    Decompress {
        encoding: &'static str,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum IgpsportError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("API error: {0}")]
    Api(String),
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for IgpsportError {
    fn from(err: reqwest::Error) -> Self {
        IgpsportError::Transport(TransportError::Network(err))
    }
}

/// One recorded exercise session as returned by the listing endpoint.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    pub id: String,
    pub ride_id: i64,
    pub exercise_type: i32,
    pub title: String,
    pub start_time: String,
    /// Meters.
    pub ride_distance: f64,
    /// Seconds.
    pub total_moving_time: f64,
    pub avg_speed: f64,
    pub data_status: i32,
    pub error_type: i32,
    pub analysis_status: i32,
    pub label: i32,
    pub is_open: i32,
    pub un_read: bool,
    pub icon: String,
    /// Meters.
    pub total_ascent: i64,
}

/// `{code, msg, data}` wrapper shared by every JSON endpoint of the service.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// [`IgpsportError::Api`] carrying the server message for non-zero codes.
    pub fn api_error(&self) -> Option<IgpsportError> {
        (self.code != 0).then(|| IgpsportError::Api(format!("{} (code {})", self.msg, self.code)))
    }
}

impl<T: Default> ApiEnvelope<T> {
    /// Missing `data` on success yields `T::default()`.
    pub fn into_result(self) -> Result<T, IgpsportError> {
        if let Some(err) = self.api_error() {
            return Err(err);
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// One page of the activity listing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityPage {
    pub page_no: u32,
    pub page_size: u32,
    pub total_page: u32,
    pub total_rows: u32,
    pub rows: Vec<Activity>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Query constraints for a listing run. Every field starts at its default;
/// an untouched filter retrieves the complete history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityFilter {
    pub begin_time: Option<chrono::NaiveDate>,
    pub end_time: Option<chrono::NaiveDate>,
    pub req_type: i32,
    pub sort: i32,
    pub page_size: u32,
    pub request_delay: Duration,
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self {
            begin_time: None,
            end_time: None,
            req_type: 0,
            sort: 0,
            page_size: DEFAULT_PAGE_SIZE,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl ActivityFilter {
    pub fn between(begin: chrono::NaiveDate, end: chrono::NaiveDate) -> Self {
        Self {
            begin_time: Some(begin),
            end_time: Some(end),
            ..Self::default()
        }
    }

    pub fn with_begin(mut self, begin: chrono::NaiveDate) -> Self {
        self.begin_time = Some(begin);
        self
    }

    pub fn with_end(mut self, end: chrono::NaiveDate) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn with_req_type(mut self, req_type: i32) -> Self {
        self.req_type = req_type;
        self
    }

    pub fn with_sort(mut self, sort: i32) -> Self {
        self.sort = sort;
        self
    }

    /// Zero falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Page size actually requested; zero means [`DEFAULT_PAGE_SIZE`].
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Query string for page `page_no`; date bounds are only sent when set.
    pub fn query_pairs(&self, page_no: u32) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("pageNo", page_no.to_string()),
            ("pageSize", self.effective_page_size().to_string()),
            ("reqType", self.req_type.to_string()),
            ("sort", self.sort.to_string()),
        ];
        if let Some(begin) = self.begin_time {
            pairs.push(("beginTime", begin.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_time {
            pairs.push(("endTime", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[async_trait]
pub trait IgpsportClient: Send + Sync + 'static {
    /// Fetch every page matching `filter`, in server order. Any failure on any
    /// page aborts the whole call.
    async fn list_activities(&self, filter: &ActivityFilter)
    -> Result<Vec<Activity>, IgpsportError>;

    async fn list_all_activities(&self) -> Result<Vec<Activity>, IgpsportError> {
        self.list_activities(&ActivityFilter::default()).await
    }

    /// Resolve the one-time FIT file URL for a ride.
    async fn get_download_url(&self, ride_id: i64) -> Result<String, IgpsportError>;

    /// Fetch a pre-authorized file URL with a plain GET.
    async fn download_file(&self, url: &str) -> Result<Bytes, IgpsportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn activity_deserializes_service_shape() {
        let payload = json!({
            "id": "65a1", "rideId": 4242, "exerciseType": 1, "title": "Morning Ride",
            "startTime": "2024-05-01 07:30:00", "rideDistance": 25300.5,
            "totalMovingTime": 3600.0, "avgSpeed": 25.3, "dataStatus": 1,
            "errorType": 0, "analysisStatus": 2, "label": 0, "isOpen": 1,
            "unRead": true, "icon": "ride.png", "totalAscent": 180
        });
        let a: Activity = serde_json::from_value(payload).expect("activity");
        assert_eq!(a.ride_id, 4242);
        assert_eq!(a.start_time, "2024-05-01 07:30:00");
        assert!(a.un_read);
        assert_eq!(a.total_ascent, 180);
    }

    #[test]
    fn activity_tolerates_missing_fields() {
        let a: Activity = serde_json::from_value(json!({"rideId": 7})).expect("activity");
        assert_eq!(a.ride_id, 7);
        assert!(a.title.is_empty());
    }

    #[test]
    fn activity_serializes_camel_case() {
        let a = Activity {
            ride_id: 9,
            ..Activity::default()
        };
        let v = serde_json::to_value(&a).expect("serialize");
        assert_eq!(v["rideId"], 9);
        assert!(v.get("ride_id").is_none());
    }

    #[test]
    fn envelope_nonzero_code_is_api_error() {
        let env: ApiEnvelope<String> =
            serde_json::from_value(json!({"code": 1, "msg": "token expired", "data": null}))
                .expect("envelope");
        match env.into_result() {
            Err(IgpsportError::Api(msg)) => assert!(msg.contains("token expired")),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn envelope_missing_data_defaults() {
        let env: ApiEnvelope<ActivityPage> =
            serde_json::from_value(json!({"code": 0, "msg": "ok"})).expect("envelope");
        let page = env.into_result().expect("page");
        assert_eq!(page.total_page, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn filter_defaults_and_query() {
        let filter = ActivityFilter::default();
        assert_eq!(filter.page_size, 20);
        assert_eq!(filter.request_delay, Duration::from_millis(500));
        let pairs = filter.query_pairs(3);
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], ("pageNo", "3".to_string()));
    }

    #[test]
    fn zero_page_size_uses_default() {
        let filter = ActivityFilter::default().with_page_size(0);
        assert_eq!(filter.effective_page_size(), DEFAULT_PAGE_SIZE);

        let raw = ActivityFilter {
            page_size: 0,
            ..ActivityFilter::default()
        };
        assert!(raw.query_pairs(1).contains(&("pageSize", "20".to_string())));
    }

    #[test]
    fn filter_bounds_render_as_dates() {
        let begin = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let pairs = ActivityFilter::between(begin, end)
            .with_page_size(0)
            .query_pairs(1);
        assert!(pairs.contains(&("pageSize", "20".to_string())));
        assert!(pairs.contains(&("beginTime", "2024-01-01".to_string())));
        assert!(pairs.contains(&("endTime", "2024-12-31".to_string())));
    }
}

//! HTTP client implementation for the iGPSport API.
//!
//! This module provides a reqwest-based implementation of the
//! [`IgpsportClient`](crate::IgpsportClient) trait.

use crate::config::Config;
use crate::pacer::{Pacer, TokioPacer};
use crate::transport;
use crate::{Activity, ActivityFilter, ActivityPage, ApiEnvelope, IgpsportClient, IgpsportError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// Client for the iGPSport API using reqwest.
#[derive(Clone)]
pub struct ReqwestIgpsportClient {
    base_url: String,
    headers: HeaderMap,
    client: reqwest::Client,
    pacer: Arc<dyn Pacer>,
}

impl std::fmt::Debug for ReqwestIgpsportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestIgpsportClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ReqwestIgpsportClient {
    /// Create a new client instance.
    ///
    /// Fails when the token cannot be sent as a header value or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, IgpsportError> {
        let headers = transport::service_headers(&config.auth_token)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IgpsportError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
            client,
            pacer: Arc::new(TokioPacer),
        })
    }

    /// Replace the pacer used between listing pages.
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an authenticated GET request carrying the service header set.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).headers(self.headers.clone())
    }

    /// Execute a request and return the decoded body.
    async fn execute_decoded(&self, request: reqwest::RequestBuilder) -> Result<Bytes, IgpsportError> {
        let resp = request.send().await?;
        Ok(transport::read_body(resp).await?)
    }

    /// Execute a request and unwrap the `{code, msg, data}` envelope.
    ///
    /// A non-2xx response whose body is an envelope with a non-zero code is
    /// reported as [`IgpsportError::Api`]; any other non-2xx response is a
    /// [`TransportError::Status`](crate::TransportError::Status).
    async fn execute_envelope<T>(&self, request: reqwest::RequestBuilder) -> Result<T, IgpsportError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let resp = request.send().await?;
        let (status, body) = transport::read_response(resp).await?;
        if !status.is_success() {
            let api_error = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.api_error());
            return Err(match api_error {
                Some(err) => err,
                None => transport::status_error(status, &body).into(),
            });
        }
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)?;
        envelope.into_result()
    }
}

#[async_trait]
impl IgpsportClient for ReqwestIgpsportClient {
    async fn list_activities(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<Activity>, IgpsportError> {
        let url = format!("{}/queryMyActivity", self.base_url);
        let mut activities = Vec::new();
        let mut page_no: u32 = 1;

        loop {
            let request = self.get_request(&url).query(&filter.query_pairs(page_no));
            let page: ActivityPage = self.execute_envelope(request).await?;
            metrics::counter!("igpsport_pages_fetched_total").increment(1);
            tracing::debug!(
                page_no,
                total_page = page.total_page,
                total_rows = page.total_rows,
                rows = page.rows.len(),
                "fetched activity page"
            );

            activities.extend(page.rows);

            if page_no >= page.total_page {
                break;
            }
            page_no += 1;
            self.pacer.pause(filter.request_delay).await;
        }

        tracing::info!(
            count = activities.len(),
            pages = page_no,
            "activity listing complete"
        );
        Ok(activities)
    }

    async fn get_download_url(&self, ride_id: i64) -> Result<String, IgpsportError> {
        let url = format!("{}/getDownloadUrl/{}", self.base_url, ride_id);
        let download_url: String = self.execute_envelope(self.get_request(&url)).await?;
        if download_url.trim().is_empty() {
            return Err(IgpsportError::Api(format!(
                "empty download url for ride {ride_id}"
            )));
        }
        tracing::debug!(ride_id, "resolved download url");
        Ok(download_url)
    }

    async fn download_file(&self, url: &str) -> Result<Bytes, IgpsportError> {
        // The resolved URL is pre-authorized; no service headers.
        self.execute_decoded(self.client.get(url)).await
    }
}

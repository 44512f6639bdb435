//! Prayer timings service client.
//!
//! Fetches a day's adhan times from an Aladhan-compatible HTTP API and turns
//! them into an [`EventTimeTable`] the engine can work with.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use qibla_core::{ClockTime, Coordinate, EventName, EventTimeTable};
use serde::Deserialize;
use thiserror::Error;

/// Public Aladhan endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.aladhan.com";

/// Muslim World League calculation method.
pub const DEFAULT_METHOD: u8 = 3;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Service timing keys and the event names they map to.
const TIMING_KEYS: [(&str, &str); 6] = [
    ("Fajr", "fajr"),
    ("Sunrise", "sunrise"),
    ("Dhuhr", "dhuhr"),
    ("Asr", "asr"),
    ("Maghrib", "maghrib"),
    ("Isha", "isha"),
];

/// Timings client errors.
#[derive(Debug, Error)]
pub enum TimesError {
    /// The configured base URL cannot be used.
    #[error("invalid base URL: {reason}")]
    InvalidBaseUrl { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service returned an error response.
    #[error("timings service error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Timings service client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TimesError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(TimesError::InvalidBaseUrl {
                reason: "base URL cannot be empty",
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TimesError::InvalidBaseUrl {
                reason: "base URL must start with http:// or https://",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(TimesError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    /// URL of the timings resource for `date`.
    pub fn timings_url(&self, date: NaiveDate) -> String {
        format!("{}/v1/timings/{}", self.base_url, date.format("%d-%m-%Y"))
    }

    /// Fetches the adhan times for `date` at `location`.
    pub async fn fetch_day(
        &self,
        date: NaiveDate,
        location: Coordinate,
        method: u8,
    ) -> Result<EventTimeTable, TimesError> {
        let url = self.timings_url(date);
        tracing::debug!(%url, %location, method, "fetching prayer timings");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", location.latitude().to_string()),
                ("longitude", location.longitude().to_string()),
                ("method", method.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| TimesError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let table = parse_timings(&body)?;
        tracing::debug!(events = table.len(), "parsed prayer timings");
        Ok(table)
    }
}

#[derive(Debug, Deserialize)]
struct TimingsResponse {
    data: TimingsData,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: HashMap<String, String>,
}

/// Parses a timings response body into a table of the six daily events.
///
/// Extra keys (`Sunset`, `Imsak`, `Midnight`, ...) are ignored. Zone suffixes
/// such as `05:12 (NZDT)` are stripped.
pub fn parse_timings(body: &str) -> Result<EventTimeTable, TimesError> {
    let payload: TimingsResponse =
        serde_json::from_str(body).map_err(|err| TimesError::InvalidResponse(err.to_string()))?;

    let mut table = EventTimeTable::new();
    for (key, name) in TIMING_KEYS {
        let raw = payload
            .data
            .timings
            .get(key)
            .ok_or_else(|| TimesError::InvalidResponse(format!("missing {key} timing")))?;
        let time: ClockTime = raw
            .parse()
            .map_err(|err| TimesError::InvalidResponse(format!("{key}: {err}")))?;
        let name =
            EventName::new(name).map_err(|err| TimesError::InvalidResponse(err.to_string()))?;
        table
            .try_insert(name, time)
            .map_err(|err| TimesError::InvalidResponse(err.to_string()))?;
    }
    Ok(table)
}

fn parse_api_error(body: &str) -> Option<TimesError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        data: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| TimesError::Api {
            message: payload.data,
        })
}

//! HTML meteorological dashboard source.
//!
//! Two page variants are consumed: a general weather page and a wind
//! page. Parse trees are built and dropped inside synchronous scopes —
//! [`scraper::Html`] never crosses an await point.

mod extract;
mod report;

pub use report::{RainReading, RangeReading, WeatherReport, WindChillReading};

use std::time::Duration;

use chrono::Utc;
use scraper::Html;
use serde::Serialize;

use vientos_core::StationRecord;

use crate::error::SourceError;

use extract::{cell_number, cell_text, section_table, VALUES_TABLE};

/// HTTP client for the dashboard pages. Returns raw page text; parsing
/// is left to the extraction functions.
pub struct DashboardClient {
    client: reqwest::Client,
}

impl DashboardClient {
    /// Creates a `DashboardClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one dashboard page and returns its raw HTML.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] — network failure or timeout.
    /// - [`SourceError::UnexpectedStatus`] — any non-2xx status.
    pub async fn fetch_page(&self, url: &str) -> Result<String, SourceError> {
        // Configured URLs have been seen with stray whitespace.
        let url = url.trim();
        tracing::debug!(url, "fetching dashboard page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches both pages concurrently and assembles the full weather report.
    ///
    /// # Errors
    ///
    /// Propagates the first page fetch error; the report needs both pages.
    pub async fn fetch_report(
        &self,
        weather_url: &str,
        wind_url: &str,
    ) -> Result<WeatherReport, SourceError> {
        let (weather, wind) = tokio::join!(self.fetch_page(weather_url), self.fetch_page(wind_url));
        let weather_html = weather?;
        let wind_html = wind?;
        Ok(report::build_report(&weather_html, &wind_html))
    }
}

/// Current wind triple as extracted from the wind page; any field may be
/// absent when the markup shifts.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WindReading {
    pub speed: Option<f64>,
    pub gust: Option<f64>,
    pub direction: Option<String>,
}

/// Extracts the current wind reading from the wind page.
///
/// The "Viento" block's values table holds the current speed at (0,1),
/// the direction at (1,1), and the maximum gust at (3,1). A missing
/// block or cell resolves to `None`.
#[must_use]
pub fn extract_wind(html: &str) -> WindReading {
    let doc = Html::parse_document(html);
    let Some(table) = section_table(&doc, "Viento", VALUES_TABLE) else {
        tracing::warn!("wind values table not found in dashboard page");
        return WindReading::default();
    };

    WindReading {
        speed: cell_number(&table, 0, 1),
        gust: cell_number(&table, 3, 1),
        direction: cell_text(&table, 1, 1),
    }
}

/// Maps a dashboard wind reading into the unified record shape.
///
/// The page exposes no per-reading timestamp for wind, so `measured_at`
/// is the current wall clock — a fetch-time approximation, not the true
/// sample time. Values are forwarded unchanged, nulls included.
#[must_use]
pub fn adapt_wind_reading(reading: WindReading, station_name: &str) -> StationRecord {
    StationRecord {
        station_name: station_name.to_owned(),
        external_id: None,
        measured_at: Utc::now().to_rfc3339(),
        wind_speed: reading.speed,
        wind_gust: reading.gust,
        wind_direction: reading.direction,
    }
}

//! Full weather report assembled from both dashboard pages.
//!
//! Everything except wind is a display-string pass-through: the page
//! already renders values with their units, and consumers of this
//! report want them as shown. Wind is parsed numerically because it
//! feeds the unified station record as well.

use scraper::{Html, Selector};
use serde::Serialize;

use super::extract::{
    cell_text, element_text, scoped_text, section_table, SUMMARY_TABLE,
};
use super::{extract_wind, WindReading};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Observation date as shown on the page (`FECHA:` cell).
    pub date: Option<String>,
    /// Observation time as shown on the page (`HORA:` cell).
    pub time: Option<String>,
    pub temperature: RangeReading,
    pub humidity: RangeReading,
    pub dew_point: Option<String>,
    pub wind_chill: WindChillReading,
    pub pressure: Option<String>,
    pub rain: RainReading,
    pub wind: WindReading,
}

/// Current value plus daily extremes and the times they occurred at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RangeReading {
    pub current: Option<String>,
    pub daily_min: Option<String>,
    pub daily_max: Option<String>,
    pub min_at: Option<String>,
    pub max_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WindChillReading {
    pub by_wind: Option<String>,
    pub by_humidity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RainReading {
    pub daily: Option<String>,
    pub intensity: Option<String>,
}

/// Builds the full report from the raw HTML of both pages.
#[must_use]
pub fn build_report(weather_html: &str, wind_html: &str) -> WeatherReport {
    let doc = Html::parse_document(weather_html);
    let (date, time) = observation_timestamp(&doc);

    WeatherReport {
        date,
        time,
        temperature: range_reading(&doc, "Temperatura"),
        humidity: range_reading(&doc, "Humedad"),
        dew_point: current_value(&doc, "Punto de rocío"),
        wind_chill: wind_chill(&doc),
        pressure: current_value(&doc, "Presión barométrica"),
        rain: rain(&doc),
        wind: extract_wind(wind_html),
    }
}

/// Scans the variable-table cells for the `FECHA:` / `HORA:` prefixes.
/// These live in an unlabeled header block, so this is a cell scan
/// rather than a section lookup.
fn observation_timestamp(doc: &Html) -> (Option<String>, Option<String>) {
    let cell_sel = Selector::parse("div.variable table tr td").expect("valid css selector");

    let mut date = None;
    let mut time = None;
    for cell in doc.select(&cell_sel) {
        let text = element_text(&cell);
        if let Some(rest) = text.strip_prefix("FECHA:") {
            let value = rest.trim();
            if date.is_none() && !value.is_empty() {
                date = Some(value.to_string());
            }
        } else if let Some(rest) = text.strip_prefix("HORA:") {
            let value = rest.trim();
            if time.is_none() && !value.is_empty() {
                time = Some(value.to_string());
            }
        }
    }

    (date, time)
}

fn range_reading(doc: &Html, label: &str) -> RangeReading {
    let Some(table) = section_table(doc, label, SUMMARY_TABLE) else {
        tracing::warn!(label, "weather section not found in dashboard page");
        return RangeReading::default();
    };

    RangeReading {
        current: scoped_text(&table, ".actual"),
        daily_min: cell_text(&table, 3, 1),
        daily_max: cell_text(&table, 3, 2),
        min_at: cell_text(&table, 4, 1),
        max_at: cell_text(&table, 4, 2),
    }
}

fn current_value(doc: &Html, label: &str) -> Option<String> {
    let table = section_table(doc, label, SUMMARY_TABLE)?;
    scoped_text(&table, ".actual")
}

fn wind_chill(doc: &Html) -> WindChillReading {
    let Some(table) = section_table(doc, "Sensación térmica", SUMMARY_TABLE) else {
        tracing::warn!("wind chill section not found in dashboard page");
        return WindChillReading::default();
    };

    WindChillReading {
        by_wind: cell_text(&table, 0, 2),
        by_humidity: cell_text(&table, 2, 2),
    }
}

fn rain(doc: &Html) -> RainReading {
    let Some(table) = section_table(doc, "Lluvia", SUMMARY_TABLE) else {
        tracing::warn!("rain section not found in dashboard page");
        return RainReading::default();
    };

    RainReading {
        daily: cell_text(&table, 0, 1),
        intensity: cell_text(&table, 1, 1),
    }
}

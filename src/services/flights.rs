//! Flight lookup — records and flight-number search.
//!
//! Matching is a case-insensitive substring test on the flight number.
//! Queries are trimmed and lowercased here before reaching a source, so
//! sources only ever see a normalized, non-empty needle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ErrorCode;
use crate::sources::{FlightSource, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightStatus {
    OnTime,
    Delayed,
    Other(String),
}

impl From<String> for FlightStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "On Time" => Self::OnTime,
            "Delayed" => Self::Delayed,
            _ => Self::Other(raw),
        }
    }
}

impl From<FlightStatus> for String {
    fn from(status: FlightStatus) -> Self {
        match status {
            FlightStatus::OnTime => "On Time".to_owned(),
            FlightStatus::Delayed => "Delayed".to_owned(),
            FlightStatus::Other(raw) => raw,
        }
    }
}

impl Serialize for FlightStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::OnTime => serializer.serialize_str("On Time"),
            Self::Delayed => serializer.serialize_str("Delayed"),
            Self::Other(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for FlightStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// One flight as served by the flight backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: u64,
    pub flight_number: String,
    pub airline: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_location: String,
    pub arrival_location: String,
    /// Display label such as `EST (UTC-5)`.
    pub departure_timezone: String,
    pub arrival_timezone: String,
    pub status: FlightStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum FlightError {
    #[error("flight number must not be empty")]
    EmptyQuery,
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ErrorCode for FlightError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "E_EMPTY_QUERY",
            Self::Source(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Source(e) if e.retryable())
    }
}

/// Trim and lowercase a raw query. `None` when nothing is left.
#[must_use]
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_lowercase()) }
}

/// Case-insensitive containment of an already-lowercased needle.
#[must_use]
pub fn flight_number_matches(flight: &Flight, needle: &str) -> bool {
    flight.flight_number.to_lowercase().contains(needle)
}

/// Search flights by a flight-number fragment.
///
/// # Errors
///
/// Returns [`FlightError::EmptyQuery`] for a blank query, or the source error.
pub async fn search(source: &dyn FlightSource, raw_query: &str) -> Result<Vec<Flight>, FlightError> {
    let Some(needle) = normalize_query(raw_query) else {
        debug!("flight search rejected: empty query");
        return Err(FlightError::EmptyQuery);
    };
    let flights = source.search(&needle).await?;
    debug!(query = %needle, hits = flights.len(), "flight search");
    Ok(flights)
}

/// Every flight the source knows about.
///
/// # Errors
///
/// Returns the source error.
pub async fn list_all(source: &dyn FlightSource) -> Result<Vec<Flight>, FlightError> {
    Ok(source.all_flights().await?)
}

#[cfg(test)]
#[path = "flights_test.rs"]
mod tests;

//! Rating extraction from OMDb-shaped payloads
//!
//! The raw payload is parsed once here, at the boundary, into typed
//! [`RatingSignals`]. Everything downstream works on the typed values and
//! never touches the stringly-typed payload again.
//!
//! All parsing is total: `"N/A"`, empty strings, and garbage all degrade
//! to an absent signal instead of an error.

use crate::models::RatingSignals;
use serde::{Deserialize, Serialize};

/// OMDb's not-available sentinel
const NOT_AVAILABLE: &str = "N/A";

const ROTTEN_TOMATOES: &str = "Rotten Tomatoes";
const METACRITIC: &str = "Metacritic";

/// One entry of the payload's `Ratings` list
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RatingEntry {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

/// Typed view of an external rating payload.
///
/// All numeric fields arrive as strings (`"7.4"`, `"1,234"`, `"85%"`,
/// `"N/A"`); extraction handles them defensively. A `Default` payload
/// represents "no data", whatever the upstream cause.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RatingPayload {
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes", default, skip_serializing_if = "Option::is_none")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "Ratings", default, skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<RatingEntry>,
    #[serde(rename = "Metascore", default, skip_serializing_if = "Option::is_none")]
    pub metascore: Option<String>,
    #[serde(rename = "imdbID", default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl RatingPayload {
    /// True when the payload carries nothing useful. Upstream fetch
    /// failures and genuinely unrated titles both land here.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.imdb_rating.is_none()
            && self.imdb_votes.is_none()
            && self.ratings.is_empty()
            && self.metascore.is_none()
    }

    fn rating_entry(&self, source: &str) -> Option<&str> {
        self.ratings
            .iter()
            .find(|r| r.source == source)
            .map(|r| r.value.as_str())
    }
}

/// Parse a payload into normalized rating signals. Pure and total.
pub fn extract(payload: &RatingPayload) -> RatingSignals {
    let rt_score = payload
        .rating_entry(ROTTEN_TOMATOES)
        .and_then(parse_percent)
        .filter(|v| *v <= 100);

    // Metascore first, the Ratings-list Metacritic entry ("NN/100") second.
    let metacritic = payload
        .metascore
        .as_deref()
        .and_then(parse_int)
        .or_else(|| {
            payload
                .rating_entry(METACRITIC)
                .and_then(parse_fraction_of_100)
        })
        .filter(|v| *v <= 100);

    RatingSignals {
        imdb_rating: payload.imdb_rating.as_deref().and_then(parse_float),
        imdb_votes: payload.imdb_votes.as_deref().and_then(parse_votes),
        rt_score,
        metacritic,
    }
}

/// Parse an optional float field, treating "N/A" and junk as absent.
pub fn parse_float(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a comma-grouped vote count ("1,234,567").
pub fn parse_votes(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    raw.replace(',', "").parse::<u64>().ok()
}

/// Parse a plain integer field with the usual sentinel handling.
pub fn parse_int(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    raw.parse::<u32>().ok()
}

/// Parse an "85%" style score.
pub fn parse_percent(raw: &str) -> Option<u32> {
    parse_int(raw.trim().trim_end_matches('%'))
}

/// Parse a "74/100" style score.
fn parse_fraction_of_100(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    match raw.split_once('/') {
        Some((num, denom)) if denom.trim() == "100" => parse_int(num),
        _ => None,
    }
}

/// Pull the leading four-digit year out of an OMDb `Year` value.
///
/// Handles plain years ("2001") and series ranges ("2001–2003"); anything
/// without a leading four-digit run is absent.
pub fn parse_lead_year(raw: &str) -> Option<i32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse::<i32>().ok()
    } else {
        None
    }
}

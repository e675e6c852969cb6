//! Core data models for cinecull
//!
//! These models are used throughout the codebase for representing
//! movie inputs, rating signals, decisions, and analyzed rows.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Where a movie record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Plex,
    Dlna,
    #[default]
    Local,
    Other,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Plex => write!(f, "plex"),
            Source::Dlna => write!(f, "dlna"),
            Source::Local => write!(f, "local"),
            Source::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = std::convert::Infallible;

    // Unrecognized labels map to Other so inventory imports never fail on this field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "plex" => Source::Plex,
            "dlna" => Source::Dlna,
            "local" => Source::Local,
            _ => Source::Other,
        })
    }
}

/// Terminal classification for a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Keep,
    Delete,
    Maybe,
    #[default]
    Unknown,
}

impl Decision {
    /// Sort rank: deletion candidates surface first, unknowns last.
    pub fn rank(self) -> u8 {
        match self {
            Decision::Delete => 0,
            Decision::Maybe => 1,
            Decision::Keep => 2,
            Decision::Unknown => 3,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Keep => write!(f, "KEEP"),
            Decision::Delete => write!(f, "DELETE"),
            Decision::Maybe => write!(f, "MAYBE"),
            Decision::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = std::convert::Infallible;

    // Anything unrecognized is UNKNOWN, keeping comparisons total downstream.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "KEEP" => Decision::Keep,
            "DELETE" => Decision::Delete,
            "MAYBE" => Decision::Maybe,
            _ => Decision::Unknown,
        })
    }
}

/// Normalized numeric rating signals for one title.
///
/// Every field is optional: absence means the external source had no
/// usable value, which is distinct from an actual zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingSignals {
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<u64>,
    pub rt_score: Option<u32>,
    pub metacritic: Option<u32>,
}

impl RatingSignals {
    pub fn is_empty(&self) -> bool {
        self.imdb_rating.is_none()
            && self.imdb_votes.is_none()
            && self.rt_score.is_none()
            && self.metacritic.is_none()
    }
}

/// A normalized movie record produced by an enumeration source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MovieInput {
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub library: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
    #[serde(default)]
    pub imdb_id_hint: Option<String>,
}

/// Output of the decision engine for one title.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResult {
    pub decision: Decision,
    pub reason: String,
    pub rule_id: &'static str,
    pub signals: RatingSignals,
    pub year: Option<i32>,
}

/// One fully analyzed title, ready for reporting.
///
/// The field set and names are a compatibility surface consumed by the
/// CSV writer and the HTML report; do not rename silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedRow {
    pub source: Source,
    pub library: String,
    pub title: String,
    pub year: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<u64>,
    pub rt_score: Option<u32>,
    pub metacritic: Option<u32>,
    pub decision: Decision,
    pub reason: String,
    pub rule_id: String,
    pub misidentified_hint: String,
    pub file: Option<String>,
    pub file_size_bytes: Option<u64>,
    pub imdb_id: Option<String>,
    pub external_title: Option<String>,
    pub external_year: Option<String>,
}

impl AnalyzedRow {
    fn sort_key(&self) -> (u8, Reverse<u64>, Reverse<u64>, Reverse<u64>) {
        // Ratings compare as millirating integers so the key is totally ordered
        // even for NaN-free-but-missing values (missing counts as 0).
        let rating_milli = self
            .imdb_rating
            .map(|r| (r.max(0.0) * 1000.0) as u64)
            .unwrap_or(0);
        (
            self.decision.rank(),
            Reverse(self.imdb_votes.unwrap_or(0)),
            Reverse(rating_milli),
            Reverse(self.file_size_bytes.unwrap_or(0)),
        )
    }
}

/// Sort rows in place: deletion candidates first, then by evidentiary
/// strength (votes, rating, file size descending). Stable and total.
pub fn sort_rows(rows: &mut [AnalyzedRow]) {
    rows.sort_by_key(|r| r.sort_key());
}

/// The "candidates" view: rows the user should actually look at.
pub fn candidate_rows(rows: &[AnalyzedRow]) -> Vec<AnalyzedRow> {
    rows.iter()
        .filter(|r| matches!(r.decision, Decision::Delete | Decision::Maybe))
        .cloned()
        .collect()
}

/// Summary of decisions across a library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub keep: usize,
    pub delete: usize,
    pub maybe: usize,
    pub unknown: usize,
    pub total: usize,
    /// Bytes held by DELETE-flagged files
    pub reclaimable_bytes: u64,
    /// Rows carrying a non-empty misidentification hint
    pub suspect_matches: usize,
}

impl DecisionSummary {
    pub fn from_rows(rows: &[AnalyzedRow]) -> Self {
        let mut summary = Self::default();
        for r in rows {
            match r.decision {
                Decision::Keep => summary.keep += 1,
                Decision::Delete => {
                    summary.delete += 1;
                    summary.reclaimable_bytes += r.file_size_bytes.unwrap_or(0);
                }
                Decision::Maybe => summary.maybe += 1,
                Decision::Unknown => summary.unknown += 1,
            }
            if !r.misidentified_hint.is_empty() {
                summary.suspect_matches += 1;
            }
            summary.total += 1;
        }
        summary
    }
}

/// Full analysis output handed to the reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub scanned_path: String,
    pub summary: DecisionSummary,
    pub rows: Vec<AnalyzedRow>,
}

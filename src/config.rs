//! Analysis configuration
//!
//! Loads per-library configuration from a `cinecull.toml` file in the
//! scanned root, then applies environment variable overrides:
//!
//! ```toml
//! # cinecull.toml
//! omdb_api_key = "xxxx"
//!
//! [analysis]
//! imdb_keep_min_rating = 7.0
//! imdb_delete_max_rating = 5.5
//! year_votes_table = "1950:200,1980:500,2000:2000,2015:5000"
//! bayes_enabled = true
//! auto_thresholds_enabled = false
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Top-level configuration file shape
#[derive(Debug, Default, Deserialize)]
pub struct CinecullConfig {
    /// OMDb API key (or set CINECULL_OMDB_API_KEY / OMDB_API_KEY)
    #[serde(default)]
    pub omdb_api_key: Option<String>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Thresholds and toggles consumed by the decision engine and the
/// adaptive threshold provider. Constructed once per run, read-only after.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// KEEP when IMDb rating reaches this and votes clear the year table
    pub imdb_keep_min_rating: f64,
    /// Relaxed IMDb floor when a good RT score backs it up
    pub imdb_keep_min_rating_with_rt: f64,
    /// RT score needed for the RT+IMDb keep rule
    pub rt_keep_min_score: u32,
    /// DELETE when IMDb rating is at or below this
    pub imdb_delete_max_rating: f64,
    /// Vote ceiling for the plain low-IMDb delete rule
    pub imdb_delete_max_votes: u64,
    /// Vote ceiling for the no-RT delete rule
    pub imdb_delete_max_votes_no_rt: u64,

    /// `year:votes` pairs, ascending by year. The votes value is the
    /// minimum IMDb vote count for a title of that era to count as
    /// well known. Years past the last breakpoint use the last entry.
    pub year_votes_table: String,

    /// Bayesian shrinkage delete rule
    pub bayes_enabled: bool,
    /// DELETE when the shrunk score is at or below this
    pub bayes_delete_max_score: f64,
    /// Global mean used when the corpus is too small to compute one
    pub bayes_default_mean: f64,

    /// Derive keep/delete rating thresholds from the corpus distribution
    pub auto_thresholds_enabled: bool,
    /// Percentile for the auto KEEP threshold, in [0,1]
    pub auto_keep_percentile: f64,
    /// Percentile for the auto DELETE threshold, in [0,1]
    pub auto_delete_percentile: f64,
    /// Minimum sample count before any auto statistic is trusted
    pub auto_min_samples: usize,

    /// Ratings below this plus lots of votes suggest a wrong match
    pub hint_low_rating_max: f64,
    /// RT scores below this plus lots of votes suggest a wrong match
    pub hint_low_rt_max: u32,
    /// Vote count above which a title counts as widely known
    pub hint_well_known_votes: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            imdb_keep_min_rating: 7.0,
            imdb_keep_min_rating_with_rt: 6.5,
            rt_keep_min_score: 75,
            imdb_delete_max_rating: 5.5,
            imdb_delete_max_votes: 1000,
            imdb_delete_max_votes_no_rt: 3000,
            year_votes_table: "1950:200,1980:500,2000:2000,2015:5000".to_string(),
            bayes_enabled: true,
            bayes_delete_max_score: 5.8,
            bayes_default_mean: 6.5,
            auto_thresholds_enabled: false,
            auto_keep_percentile: 0.5,
            auto_delete_percentile: 0.1,
            auto_min_samples: 50,
            hint_low_rating_max: 4.5,
            hint_low_rt_max: 30,
            hint_well_known_votes: 50_000,
        }
    }
}

impl AnalysisConfig {
    /// Parse the `year:votes` table into sorted breakpoints.
    ///
    /// Malformed entries are dropped individually with a warning; the
    /// rest of the table stays usable. An empty or fully malformed
    /// table yields the built-in default table.
    pub fn year_votes_breakpoints(&self) -> Vec<(i32, u64)> {
        let mut table = parse_year_votes_table(&self.year_votes_table);
        if table.is_empty() {
            table = parse_year_votes_table(&AnalysisConfig::default().year_votes_table);
        }
        table
    }

    /// Clamp percentiles and repair inconsistent keep/delete thresholds.
    pub fn validated(mut self) -> Self {
        if self.imdb_keep_min_rating <= self.imdb_delete_max_rating {
            warn!(
                keep = self.imdb_keep_min_rating,
                delete = self.imdb_delete_max_rating,
                "imdb_keep_min_rating must exceed imdb_delete_max_rating; using defaults for both"
            );
            let defaults = AnalysisConfig::default();
            self.imdb_keep_min_rating = defaults.imdb_keep_min_rating;
            self.imdb_delete_max_rating = defaults.imdb_delete_max_rating;
        }
        self.auto_keep_percentile = self.auto_keep_percentile.clamp(0.0, 1.0);
        self.auto_delete_percentile = self.auto_delete_percentile.clamp(0.0, 1.0);
        self
    }
}

fn parse_year_votes_table(raw: &str) -> Vec<(i32, u64)> {
    let mut table: Vec<(i32, u64)> = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((year, votes)) = entry.split_once(':') else {
            warn!("skipping malformed year:votes entry '{}'", entry);
            continue;
        };
        match (year.trim().parse::<i32>(), votes.trim().parse::<u64>()) {
            (Ok(y), Ok(v)) => table.push((y, v)),
            _ => warn!("skipping malformed year:votes entry '{}'", entry),
        }
    }
    table.sort_by_key(|(y, _)| *y);
    table
}

impl CinecullConfig {
    /// Load config for a scanned root, with priority:
    /// 1. Environment variables (highest)
    /// 2. `cinecull.toml` in the scanned root
    /// 3. Built-in defaults
    pub fn load(root: &Path) -> Self {
        let mut config = CinecullConfig::default();

        let path = root.join("cinecull.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<CinecullConfig>(&content) {
                    Ok(loaded) => {
                        debug!("loaded config from {}", path.display());
                        config = loaded;
                    }
                    Err(e) => warn!("ignoring unparsable {}: {}", path.display(), e),
                },
                Err(e) => warn!("could not read {}: {}", path.display(), e),
            }
        }

        if let Ok(key) = std::env::var("CINECULL_OMDB_API_KEY") {
            config.omdb_api_key = Some(key);
        } else if let Ok(key) = std::env::var("OMDB_API_KEY") {
            config.omdb_api_key = Some(key);
        }
        if let Ok(table) = std::env::var("CINECULL_YEAR_VOTES_TABLE") {
            config.analysis.year_votes_table = table;
        }

        config.analysis = config.analysis.validated();
        config
    }
}

//! Adaptive threshold provider
//!
//! Turns the observed rating distribution of a catalog into the
//! thresholds the decision engine consults: a global mean IMDb rating
//! (for Bayesian shrinkage) and percentile-based keep/delete cutoffs,
//! with separate variants for titles that have no Rotten Tomatoes score.
//!
//! Every derived value carries its provenance: whether it was computed
//! from the corpus, reused from the global auto value, or fell back to
//! the static config default. Small corpora fall back silently; this
//! module never fails.
//!
//! The snapshot is computed once per process and cached behind a
//! `OnceLock`; the engine only ever sees the immutable snapshot, passed
//! by reference.

use crate::config::AnalysisConfig;
use crate::models::RatingSignals;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// Where a threshold value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdSource {
    /// Static config default, corpus too small or auto mode off
    Default,
    /// Computed from the corpus distribution
    Computed,
    /// NO-RT subset too small; reused the global auto value
    GlobalAuto,
}

impl std::fmt::Display for ThresholdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdSource::Default => write!(f, "default"),
            ThresholdSource::Computed => write!(f, "computed"),
            ThresholdSource::GlobalAuto => write!(f, "global-auto"),
        }
    }
}

/// A threshold plus the sample size and provenance behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdValue {
    pub value: f64,
    pub source: ThresholdSource,
    pub samples: usize,
}

impl ThresholdValue {
    fn default_value(value: f64) -> Self {
        Self {
            value,
            source: ThresholdSource::Default,
            samples: 0,
        }
    }
}

/// Immutable snapshot of all derived thresholds for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSnapshot {
    /// Mean IMDb rating across the corpus, for Bayesian shrinkage
    pub global_mean: ThresholdValue,
    /// KEEP rating cutoff
    pub keep_min: ThresholdValue,
    /// DELETE rating cutoff
    pub delete_max: ThresholdValue,
    /// KEEP cutoff over titles without an RT score
    pub keep_min_no_rt: ThresholdValue,
    /// DELETE cutoff over titles without an RT score
    pub delete_max_no_rt: ThresholdValue,
}

impl ThresholdSnapshot {
    /// Snapshot using only static config values (empty or absent corpus).
    pub fn static_defaults(cfg: &AnalysisConfig) -> Self {
        Self {
            global_mean: ThresholdValue::default_value(cfg.bayes_default_mean),
            keep_min: ThresholdValue::default_value(cfg.imdb_keep_min_rating),
            delete_max: ThresholdValue::default_value(cfg.imdb_delete_max_rating),
            keep_min_no_rt: ThresholdValue::default_value(cfg.imdb_keep_min_rating),
            delete_max_no_rt: ThresholdValue::default_value(cfg.imdb_delete_max_rating),
        }
    }

    /// Derive a snapshot from previously observed rating signals.
    pub fn from_signals(signals: &[RatingSignals], cfg: &AnalysisConfig) -> Self {
        let mut all: Vec<f64> = signals.iter().filter_map(|s| s.imdb_rating).collect();
        all.sort_by(|a, b| a.total_cmp(b));
        let mut no_rt: Vec<f64> = signals
            .iter()
            .filter(|s| s.rt_score.is_none())
            .filter_map(|s| s.imdb_rating)
            .collect();
        no_rt.sort_by(|a, b| a.total_cmp(b));

        let global_mean = if all.len() >= cfg.auto_min_samples {
            ThresholdValue {
                value: all.iter().sum::<f64>() / all.len() as f64,
                source: ThresholdSource::Computed,
                samples: all.len(),
            }
        } else {
            ThresholdValue::default_value(cfg.bayes_default_mean)
        };

        let (keep_min, delete_max) = if cfg.auto_thresholds_enabled {
            (
                auto_threshold(&all, cfg.auto_keep_percentile, cfg.imdb_keep_min_rating, cfg),
                auto_threshold(&all, cfg.auto_delete_percentile, cfg.imdb_delete_max_rating, cfg),
            )
        } else {
            (
                ThresholdValue::default_value(cfg.imdb_keep_min_rating),
                ThresholdValue::default_value(cfg.imdb_delete_max_rating),
            )
        };

        // NO-RT thresholds fall back to the global auto value, not the
        // static default: the chain is subset -> global -> default.
        let keep_min_no_rt = no_rt_threshold(&no_rt, cfg.auto_keep_percentile, keep_min, cfg);
        let delete_max_no_rt =
            no_rt_threshold(&no_rt, cfg.auto_delete_percentile, delete_max, cfg);

        let snapshot = Self {
            global_mean,
            keep_min,
            delete_max,
            keep_min_no_rt,
            delete_max_no_rt,
        };
        debug!(
            mean = snapshot.global_mean.value,
            mean_source = %snapshot.global_mean.source,
            keep = snapshot.keep_min.value,
            delete = snapshot.delete_max.value,
            "threshold snapshot ready"
        );
        snapshot
    }
}

fn auto_threshold(
    sorted: &[f64],
    percentile_p: f64,
    static_fallback: f64,
    cfg: &AnalysisConfig,
) -> ThresholdValue {
    if sorted.len() >= cfg.auto_min_samples {
        match percentile(sorted, percentile_p) {
            Some(value) => ThresholdValue {
                value,
                source: ThresholdSource::Computed,
                samples: sorted.len(),
            },
            None => ThresholdValue::default_value(static_fallback),
        }
    } else {
        ThresholdValue::default_value(static_fallback)
    }
}

fn no_rt_threshold(
    sorted_subset: &[f64],
    percentile_p: f64,
    global: ThresholdValue,
    cfg: &AnalysisConfig,
) -> ThresholdValue {
    if !cfg.auto_thresholds_enabled {
        return global;
    }
    if sorted_subset.len() >= cfg.auto_min_samples {
        if let Some(value) = percentile(sorted_subset, percentile_p) {
            return ThresholdValue {
                value,
                source: ThresholdSource::Computed,
                samples: sorted_subset.len(),
            };
        }
    }
    ThresholdValue {
        value: global.value,
        source: ThresholdSource::GlobalAuto,
        samples: global.samples,
    }
}

/// Nearest-rank percentile over a sorted ascending slice.
///
/// `p` is clamped to [0,1]; the result is `sorted[floor(p * (N-1))]`.
/// No interpolation: `p=0` is the first element, `p=1` the last.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let idx = (p * (sorted.len() - 1) as f64).floor() as usize;
    sorted.get(idx).copied()
}

static SNAPSHOT: OnceLock<ThresholdSnapshot> = OnceLock::new();

/// Process-wide snapshot, computed on first access and never again.
pub fn process_snapshot(init: impl FnOnce() -> ThresholdSnapshot) -> &'static ThresholdSnapshot {
    SNAPSHOT.get_or_init(init)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_auto(min_samples: usize) -> AnalysisConfig {
        AnalysisConfig {
            auto_thresholds_enabled: true,
            auto_min_samples: min_samples,
            ..Default::default()
        }
    }

    fn signal(rating: f64, rt: Option<u32>) -> RatingSignals {
        RatingSignals {
            imdb_rating: Some(rating),
            imdb_votes: Some(1000),
            rt_score: rt,
            metacritic: None,
        }
    }

    #[test]
    fn test_percentile_boundaries() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 1.0), Some(5.0));
        assert_eq!(percentile(&values, 0.5), Some(3.0));
    }

    #[test]
    fn test_percentile_clamps_and_empty() {
        let values = [1.0, 2.0];
        assert_eq!(percentile(&values, -3.0), Some(1.0));
        assert_eq!(percentile(&values, 7.0), Some(2.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn test_small_corpus_falls_back_to_defaults() {
        let cfg = cfg_auto(50);
        let signals: Vec<_> = (0..10).map(|i| signal(5.0 + i as f64 * 0.1, None)).collect();
        let snapshot = ThresholdSnapshot::from_signals(&signals, &cfg);
        assert_eq!(snapshot.keep_min.value, cfg.imdb_keep_min_rating);
        assert_eq!(snapshot.keep_min.source, ThresholdSource::Default);
        assert_eq!(snapshot.global_mean.value, cfg.bayes_default_mean);
        assert_eq!(snapshot.global_mean.source, ThresholdSource::Default);
    }

    #[test]
    fn test_large_corpus_computes_percentiles() {
        let cfg = cfg_auto(10);
        // Ratings 1.0..=10.0 repeated; median should land mid-distribution
        let signals: Vec<_> = (0..100)
            .map(|i| signal(1.0 + (i % 10) as f64, Some(80)))
            .collect();
        let snapshot = ThresholdSnapshot::from_signals(&signals, &cfg);
        assert_eq!(snapshot.keep_min.source, ThresholdSource::Computed);
        assert_eq!(snapshot.keep_min.samples, 100);
        assert!(snapshot.keep_min.value >= snapshot.delete_max.value);
    }

    #[test]
    fn test_no_rt_subset_too_small_reuses_global() {
        let cfg = cfg_auto(10);
        // 50 titles with RT, only 3 without
        let mut signals: Vec<_> = (0..50).map(|i| signal(4.0 + (i % 5) as f64, Some(70))).collect();
        signals.extend((0..3).map(|_| signal(6.0, None)));
        let snapshot = ThresholdSnapshot::from_signals(&signals, &cfg);
        assert_eq!(snapshot.keep_min.source, ThresholdSource::Computed);
        assert_eq!(snapshot.keep_min_no_rt.source, ThresholdSource::GlobalAuto);
        assert_eq!(snapshot.keep_min_no_rt.value, snapshot.keep_min.value);
    }

    #[test]
    fn test_no_rt_subset_large_enough_computes_own() {
        let cfg = cfg_auto(10);
        let mut signals: Vec<_> = (0..50).map(|i| signal(5.0 + (i % 5) as f64, Some(70))).collect();
        signals.extend((0..20).map(|i| signal(2.0 + (i % 4) as f64, None)));
        let snapshot = ThresholdSnapshot::from_signals(&signals, &cfg);
        assert_eq!(snapshot.keep_min_no_rt.source, ThresholdSource::Computed);
        assert_eq!(snapshot.keep_min_no_rt.samples, 20);
    }

    #[test]
    fn test_auto_disabled_keeps_statics() {
        let cfg = AnalysisConfig {
            auto_thresholds_enabled: false,
            auto_min_samples: 1,
            ..Default::default()
        };
        let signals: Vec<_> = (0..100).map(|_| signal(2.0, None)).collect();
        let snapshot = ThresholdSnapshot::from_signals(&signals, &cfg);
        assert_eq!(snapshot.keep_min.value, cfg.imdb_keep_min_rating);
        assert_eq!(snapshot.delete_max_no_rt.value, cfg.imdb_delete_max_rating);
        // The mean is still computed; it feeds Bayes, not the auto cutoffs
        assert_eq!(snapshot.global_mean.source, ThresholdSource::Computed);
        assert!((snapshot.global_mean.value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_corpus_is_all_defaults() {
        let cfg = cfg_auto(1);
        let snapshot = ThresholdSnapshot::from_signals(&[], &cfg);
        assert_eq!(snapshot, ThresholdSnapshot::static_defaults(&cfg));
    }
}

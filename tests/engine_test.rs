//! Decision engine behavior tests
//!
//! Covers totality over garbled inputs, the fixed rule order, and the
//! threshold fallback chains, all through the public library API.

use cinecull::config::AnalysisConfig;
use cinecull::engine::{self, rules};
use cinecull::extract::{self, RatingPayload};
use cinecull::models::{Decision, RatingSignals};
use cinecull::thresholds::{percentile, ThresholdSnapshot, ThresholdSource};

fn signals(rating: Option<f64>, votes: Option<u64>, rt: Option<u32>) -> RatingSignals {
    RatingSignals {
        imdb_rating: rating,
        imdb_votes: votes,
        rt_score: rt,
        metacritic: None,
    }
}

#[test]
fn decide_is_total_for_any_input_shape() {
    let cfg = AnalysisConfig::default();
    let snap = ThresholdSnapshot::static_defaults(&cfg);
    let ratings = [None, Some(-3.0), Some(0.0), Some(5.5), Some(10.0), Some(99.0)];
    let votes = [None, Some(0), Some(1), Some(u64::MAX)];
    let rts = [None, Some(0), Some(50), Some(100), Some(999)];
    let years = [None, Some(1900), Some(2100), Some(0), Some(-44)];
    for r in ratings {
        for v in votes {
            for rt in rts {
                for y in years {
                    let result = engine::decide(&signals(r, v, rt), y, &cfg, &snap);
                    assert!(!result.reason.is_empty());
                    assert!(matches!(
                        result.decision,
                        Decision::Keep | Decision::Delete | Decision::Maybe | Decision::Unknown
                    ));
                }
            }
        }
    }
}

#[test]
fn no_data_is_unknown_regardless_of_year() {
    let cfg = AnalysisConfig::default();
    let snap = ThresholdSnapshot::static_defaults(&cfg);
    for year in [None, Some(1920), Some(2020), Some(2100)] {
        let result = engine::decide(&signals(None, None, None), year, &cfg, &snap);
        assert_eq!(result.decision, Decision::Unknown);
        assert_eq!(result.rule_id, rules::NO_DATA);
    }
}

#[test]
fn well_rated_popular_title_keeps_via_first_matching_rule() {
    // 7.5 across 60k votes with RT 80 for a 2015 title: both keep rules
    // qualify, the dynamic-votes rule is checked first.
    let cfg = AnalysisConfig::default();
    let snap = ThresholdSnapshot::static_defaults(&cfg);
    let result = engine::decide(
        &signals(Some(7.5), Some(60_000), Some(80)),
        Some(2015),
        &cfg,
        &snap,
    );
    assert_eq!(result.decision, Decision::Keep);
    assert_eq!(result.rule_id, rules::KEEP_IMDB_DYNAMIC_VOTES);
}

#[test]
fn reason_strings_embed_the_numbers_judged() {
    let cfg = AnalysisConfig::default();
    let snap = ThresholdSnapshot::static_defaults(&cfg);
    let result = engine::decide(
        &signals(Some(7.5), Some(60_000), Some(80)),
        Some(2015),
        &cfg,
        &snap,
    );
    assert!(result.reason.contains("7.5"));
    assert!(result.reason.contains("60000"));

    let result = engine::decide(&signals(Some(2.0), Some(20_000), None), Some(2010), &cfg, &snap);
    assert_eq!(result.rule_id, rules::DELETE_BAYES);
    assert!(result.reason.contains("R=2.0"));
    assert!(result.reason.contains("v=20000"));
    assert!(result.reason.contains("C=6.50"));
}

#[test]
fn extraction_feeds_the_engine_end_to_end() {
    let payload: RatingPayload = serde_json::from_str(
        r#"{
            "Title": "Some Film",
            "imdbRating": "N/A",
            "imdbVotes": "1,234",
            "Ratings": [{"Source": "Rotten Tomatoes", "Value": "85%"}]
        }"#,
    )
    .unwrap();
    let signals = extract::extract(&payload);
    assert_eq!(signals.imdb_rating, None);
    assert_eq!(signals.imdb_votes, Some(1234));
    assert_eq!(signals.rt_score, Some(85));

    // RT exists, so this is not a NO_DATA case even without an IMDb rating
    let cfg = AnalysisConfig::default();
    let snap = ThresholdSnapshot::static_defaults(&cfg);
    let result = engine::decide(&signals, Some(2005), &cfg, &snap);
    assert_ne!(result.rule_id, rules::NO_DATA);
}

#[test]
fn percentile_nearest_rank_contract() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(percentile(&values, 0.0), Some(1.0));
    assert_eq!(percentile(&values, 1.0), Some(5.0));
    assert_eq!(percentile(&values, 0.5), Some(3.0));
    // No interpolation: 0.6 * 4 = 2.4 floors to index 2
    assert_eq!(percentile(&values, 0.6), Some(3.0));
}

#[test]
fn threshold_fallback_chain_labels_sources() {
    let cfg = AnalysisConfig {
        auto_thresholds_enabled: true,
        auto_min_samples: 10,
        ..Default::default()
    };

    // Below minimum everywhere: statics with "default" provenance
    let tiny: Vec<RatingSignals> = (0..3).map(|_| signals(Some(6.0), Some(100), None)).collect();
    let snap = ThresholdSnapshot::from_signals(&tiny, &cfg);
    assert_eq!(snap.keep_min.value, cfg.imdb_keep_min_rating);
    assert_eq!(snap.keep_min.source, ThresholdSource::Default);

    // Global large, NO-RT subset tiny: NO-RT reuses the computed global
    let mut mixed: Vec<RatingSignals> =
        (0..40).map(|i| signals(Some(3.0 + (i % 7) as f64), Some(100), Some(60))).collect();
    mixed.extend((0..2).map(|_| signals(Some(6.0), Some(100), None)));
    let snap = ThresholdSnapshot::from_signals(&mixed, &cfg);
    assert_eq!(snap.keep_min.source, ThresholdSource::Computed);
    assert_eq!(snap.keep_min_no_rt.source, ThresholdSource::GlobalAuto);
    assert_eq!(snap.keep_min_no_rt.value, snap.keep_min.value);
}

#[test]
fn auto_thresholds_change_decisions() {
    // A catalog of mostly-bad films pulls the keep cutoff down
    let cfg = AnalysisConfig {
        auto_thresholds_enabled: true,
        auto_min_samples: 10,
        bayes_enabled: false,
        ..Default::default()
    };
    let corpus: Vec<RatingSignals> =
        (0..100).map(|i| signals(Some(3.0 + (i % 30) as f64 * 0.1), Some(5000), None)).collect();
    let snap = ThresholdSnapshot::from_signals(&corpus, &cfg);
    assert!(snap.keep_min_no_rt.value < cfg.imdb_keep_min_rating);

    // 5.0 against the static 7.0 cutoff would never keep; against this
    // catalog's median it does.
    let result = engine::decide(&signals(Some(5.0), Some(9000), None), Some(2010), &cfg, &snap);
    assert_eq!(result.decision, Decision::Keep);
    assert_eq!(result.rule_id, rules::KEEP_IMDB_DYNAMIC_VOTES);
}

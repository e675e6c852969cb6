//! Decision engine
//!
//! An ordered rule cascade that turns rating signals into a
//! KEEP / DELETE / MAYBE / UNKNOWN decision. Each rule either fires and
//! returns a terminal decision or falls through to the next; the order
//! is part of the contract. Every reason string embeds the concrete
//! numbers it judged, so a decision can be audited from the report
//! alone.
//!
//! The whole module is pure: absent inputs fail their guards and fall
//! through, nothing here can fail.

use crate::config::AnalysisConfig;
use crate::models::{Decision, DecisionResult, RatingSignals};
use crate::thresholds::ThresholdSnapshot;

/// Rule identifiers, stable across releases (reports key on them).
pub mod rules {
    pub const NO_DATA: &str = "NO_DATA";
    pub const KEEP_IMDB_DYNAMIC_VOTES: &str = "KEEP_IMDB_DYNAMIC_VOTES";
    pub const KEEP_RT_IMDB: &str = "KEEP_RT_IMDB";
    pub const DELETE_BAYES: &str = "DELETE_BAYES";
    pub const DELETE_LOW_RATING_HIGH_VOTES: &str = "DELETE_LOW_RATING_HIGH_VOTES";
    pub const DELETE_IMDB: &str = "DELETE_IMDB";
    pub const DELETE_IMDB_NO_RT: &str = "DELETE_IMDB_NO_RT";
    pub const FALLBACK_MAYBE: &str = "FALLBACK_MAYBE";
}

/// Minimum vote count for a title of the given year to count as well
/// known: smallest breakpoint at or past the year wins, otherwise the
/// last (most demanding) entry. Unknown years get the last entry too.
pub fn votes_threshold_for_year(year: Option<i32>, table: &[(i32, u64)]) -> u64 {
    let Some(last) = table.last() else {
        return 0;
    };
    match year {
        Some(y) => table
            .iter()
            .find(|(breakpoint, _)| *breakpoint >= y)
            .map(|(_, votes)| *votes)
            .unwrap_or(last.1),
        None => last.1,
    }
}

/// Vote-weighted blend of a title's own rating and the global mean:
/// `(v/(v+m))·R + (m/(v+m))·C`. `None` when `v + m == 0`.
pub fn bayes_score(rating: f64, votes: u64, m: u64, global_mean: f64) -> Option<f64> {
    let v = votes as f64;
    let m = m as f64;
    let total = v + m;
    if total == 0.0 {
        return None;
    }
    Some((v / total) * rating + (m / total) * global_mean)
}

fn fmt_year(year: Option<i32>) -> String {
    year.map_or_else(|| "unknown".to_string(), |y| y.to_string())
}

/// Run the cascade for one title.
pub fn decide(
    signals: &RatingSignals,
    year: Option<i32>,
    cfg: &AnalysisConfig,
    thresholds: &ThresholdSnapshot,
) -> DecisionResult {
    let result = |decision, reason, rule_id| DecisionResult {
        decision,
        reason,
        rule_id,
        signals: *signals,
        year,
    };

    let rating = signals.imdb_rating;
    let votes = signals.imdb_votes;
    let rt = signals.rt_score;

    // Titles without an RT score are judged against the NO-RT cutoffs.
    let (keep_min, delete_max) = if rt.is_some() {
        (thresholds.keep_min.value, thresholds.delete_max.value)
    } else {
        (
            thresholds.keep_min_no_rt.value,
            thresholds.delete_max_no_rt.value,
        )
    };

    // 0. Nothing to judge on.
    if rating.is_none() && rt.is_none() {
        return result(
            Decision::Unknown,
            "insufficient OMDb data (no IMDb rating, no RT score)".to_string(),
            rules::NO_DATA,
        );
    }

    let m = votes_threshold_for_year(year, &cfg.year_votes_breakpoints());

    // 1. Well-known and well-rated for its era.
    if let (Some(r), Some(v)) = (rating, votes) {
        if m > 0 && r >= keep_min && v >= m {
            return result(
                Decision::Keep,
                format!(
                    "IMDb {r:.1} >= {keep_min:.1} with {v} votes (>= {m} required for year {})",
                    fmt_year(year)
                ),
                rules::KEEP_IMDB_DYNAMIC_VOTES,
            );
        }
    }

    // 2. Critics and audience agree it is good.
    if let (Some(rt_val), Some(r)) = (rt, rating) {
        if rt_val >= cfg.rt_keep_min_score && r >= cfg.imdb_keep_min_rating_with_rt {
            return result(
                Decision::Keep,
                format!(
                    "RT {rt_val}% >= {}% and IMDb {r:.1} >= {:.1}",
                    cfg.rt_keep_min_score, cfg.imdb_keep_min_rating_with_rt
                ),
                rules::KEEP_RT_IMDB,
            );
        }
    }

    // 3. Bayesian shrinkage: distrust thin vote counts.
    if cfg.bayes_enabled {
        if let (Some(r), Some(v)) = (rating, votes) {
            let c = thresholds.global_mean.value;
            if let Some(score) = bayes_score(r, v, m, c) {
                if score <= cfg.bayes_delete_max_score {
                    return result(
                        Decision::Delete,
                        format!(
                            "bayes score {score:.2} <= {:.2} (R={r:.1}, v={v}, m={m}, C={c:.2})",
                            cfg.bayes_delete_max_score
                        ),
                        rules::DELETE_BAYES,
                    );
                }
            }
        }
    }

    // 4. Low rating the crowd actually agrees on.
    if let (Some(r), Some(v)) = (rating, votes) {
        if m > 0 && r <= delete_max && v >= m {
            return result(
                Decision::Delete,
                format!("IMDb {r:.1} <= {delete_max:.1} despite {v} votes (>= {m})"),
                rules::DELETE_LOW_RATING_HIGH_VOTES,
            );
        }
    }

    // 5. Low rating, little attention.
    if let (Some(r), Some(v)) = (rating, votes) {
        if r <= delete_max && v <= cfg.imdb_delete_max_votes {
            return result(
                Decision::Delete,
                format!(
                    "IMDb {r:.1} <= {delete_max:.1} with only {v} votes (<= {})",
                    cfg.imdb_delete_max_votes
                ),
                rules::DELETE_IMDB,
            );
        }
    }

    // 6. No critic signal at all, low rating, modest attention.
    if rt.is_none() {
        if let (Some(r), Some(v)) = (rating, votes) {
            if r <= delete_max && v <= cfg.imdb_delete_max_votes_no_rt {
                return result(
                    Decision::Delete,
                    format!(
                        "no RT score, IMDb {r:.1} <= {delete_max:.1} with {v} votes (<= {})",
                        cfg.imdb_delete_max_votes_no_rt
                    ),
                    rules::DELETE_IMDB_NO_RT,
                );
            }
        }
    }

    // 7. Not clearly good, not clearly bad.
    result(
        Decision::Maybe,
        format!(
            "no rule fired (IMDb {}, votes {}, RT {})",
            rating.map_or_else(|| "absent".to_string(), |r| format!("{r:.1}")),
            votes.map_or_else(|| "absent".to_string(), |v| v.to_string()),
            rt.map_or_else(|| "absent".to_string(), |s| format!("{s}%")),
        ),
        rules::FALLBACK_MAYBE,
    )
}

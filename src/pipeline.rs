//! Analysis pipeline
//!
//! Ties the pieces together for a batch of movie inputs: fetch payload,
//! extract signals, decide, run the misidentification checks, assemble
//! the output row. The fetch function is injected so the pipeline never
//! knows whether a payload came from the network, the cache, or nowhere.

use crate::config::AnalysisConfig;
use crate::engine;
use crate::extract::{self, RatingPayload};
use crate::misident;
use crate::models::{AnalyzedRow, MovieInput};
use crate::thresholds::ThresholdSnapshot;
use tracing::debug;

/// Combine one input and its fetched payload into an output row.
pub fn assemble_row(
    input: &MovieInput,
    payload: &RatingPayload,
    cfg: &AnalysisConfig,
    thresholds: &ThresholdSnapshot,
) -> AnalyzedRow {
    let signals = extract::extract(payload);
    let result = engine::decide(&signals, input.year, cfg, thresholds);

    // An empty payload carries nothing to cross-check against.
    let payload_for_hints = (!payload.is_empty()).then_some(payload);
    let hint = misident::detect(&input.title, input.year, payload_for_hints, &signals, cfg);

    AnalyzedRow {
        source: input.source,
        library: input.library.clone(),
        title: input.title.clone(),
        year: input.year,
        imdb_rating: signals.imdb_rating,
        imdb_votes: signals.imdb_votes,
        rt_score: signals.rt_score,
        metacritic: signals.metacritic,
        decision: result.decision,
        reason: result.reason,
        rule_id: result.rule_id.to_string(),
        misidentified_hint: hint,
        file: input.file.clone(),
        file_size_bytes: input.file_size_bytes,
        imdb_id: payload.imdb_id.clone().or_else(|| input.imdb_id_hint.clone()),
        external_title: payload.title.clone(),
        external_year: payload.year.clone(),
    }
}

/// Analyze a batch of inputs with a caller-supplied fetch function.
pub fn analyze_movies(
    inputs: &[MovieInput],
    fetch: &mut dyn FnMut(&str, Option<i32>) -> RatingPayload,
    cfg: &AnalysisConfig,
    thresholds: &ThresholdSnapshot,
) -> Vec<AnalyzedRow> {
    inputs
        .iter()
        .map(|input| {
            let payload = fetch(&input.title, input.year);
            let row = assemble_row(input, &payload, cfg, thresholds);
            debug!(title = %row.title, decision = %row.decision, rule = %row.rule_id, "decided");
            row
        })
        .collect()
}

//! Analyze command - the full enumerate/fetch/decide/report pipeline

use crate::config::CinecullConfig;
use crate::models::{sort_rows, AnalysisReport, DecisionSummary, MovieInput};
use crate::omdb::{self, OmdbClient, RatingCorpus};
use crate::pipeline;
use crate::reporters::{self, OutputFormat};
use crate::sources::{inventory, local};
use crate::thresholds::{self, ThresholdSnapshot};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

pub struct AnalyzeArgs {
    pub path: PathBuf,
    pub format: String,
    pub output: Option<PathBuf>,
    pub inventory: Option<PathBuf>,
    pub offline: bool,
    pub limit: usize,
    pub cache: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let format = OutputFormat::from_str(&args.format)?;
    let config = CinecullConfig::load(&args.path);

    let mut inputs = gather_inputs(&args)?;
    if args.limit > 0 && inputs.len() > args.limit {
        inputs.truncate(args.limit);
    }
    if inputs.is_empty() {
        anyhow::bail!("no movies found under {}", args.path.display());
    }
    info!("analyzing {} titles", inputs.len());

    let cache_path = args
        .cache
        .clone()
        .or_else(omdb::default_cache_path)
        .unwrap_or_else(|| args.path.join(".cinecull").join("ratings.json"));
    let mut corpus = RatingCorpus::load(&cache_path);

    // Thresholds derive from what the corpus looked like at startup and
    // stay fixed for the whole run, even as lookups grow the corpus.
    let thresholds: ThresholdSnapshot = thresholds::process_snapshot(|| {
        ThresholdSnapshot::from_signals(&corpus.signals(), &config.analysis)
    })
    .clone();

    let client = if args.offline {
        None
    } else {
        match OmdbClient::from_key(config.omdb_api_key.as_deref()) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("{e}; running from cache only");
                None
            }
        }
    };

    let mut fetch = |title: &str, year: Option<i32>| {
        let key = omdb::lookup_key(title, year);
        if let Some(cached) = corpus.get(&key) {
            return cached.clone();
        }
        let payload = match &client {
            Some(client) => client.lookup(title, year),
            None => Default::default(),
        };
        // Cache misses too, so reruns stay offline-stable
        corpus.insert(key, payload.clone());
        payload
    };

    let mut rows = pipeline::analyze_movies(&inputs, &mut fetch, &config.analysis, &thresholds);
    sort_rows(&mut rows);

    if let Err(e) = corpus.save() {
        warn!("could not persist rating cache: {e}");
    }

    let report = AnalysisReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        scanned_path: args.path.display().to_string(),
        summary: DecisionSummary::from_rows(&rows),
        rows,
    };

    let rendered = reporters::report_with_format(&report, format)?;
    write_output(&rendered, format, args.output)
}

fn gather_inputs(args: &AnalyzeArgs) -> Result<Vec<MovieInput>> {
    match &args.inventory {
        Some(path) => inventory::load(path),
        None => Ok(local::scan(&args.path)),
    }
}

fn write_output(rendered: &str, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let output = output.or_else(|| {
        // HTML is unreadable on a terminal; auto-name a file instead
        matches!(format, OutputFormat::Html)
            .then(|| PathBuf::from(format!("cinecull-report.{}", reporters::file_extension(format))))
    });
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

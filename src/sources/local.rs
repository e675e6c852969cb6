//! Local file tree walker
//!
//! Walks a directory for movie containers and parses `Title (Year)` or
//! `Title.Year.quality` shaped names out of the file stems.

use crate::models::{MovieInput, Source};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;
use walkdir::WalkDir;

const MOVIE_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "mov", "wmv", "mpg", "mpeg", "ts", "webm",
];

/// Years outside this window are treated as part of the title
const YEAR_MIN: i32 = 1888;
const YEAR_MAX: i32 = 2100;

static PAREN_YEAR: OnceLock<Regex> = OnceLock::new();
static SEPARATED_YEAR: OnceLock<Regex> = OnceLock::new();

fn paren_year() -> &'static Regex {
    PAREN_YEAR.get_or_init(|| Regex::new(r"^(.+?)\s*\((\d{4})\)").expect("paren year regex"))
}

fn separated_year() -> &'static Regex {
    SEPARATED_YEAR
        .get_or_init(|| Regex::new(r"^(.+?)[.\s_]+(\d{4})(?:[.\s_]|$)").expect("separated year regex"))
}

fn clean_title(raw: &str) -> String {
    raw.replace(['.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a file stem into a title and optional year.
///
/// `Heat (1995)` and `Heat.1995.1080p.BluRay` both parse; a stem with
/// no plausible year is all title.
pub fn parse_movie_name(stem: &str) -> (String, Option<i32>) {
    for pattern in [paren_year(), separated_year()] {
        if let Some(captures) = pattern.captures(stem) {
            let year: Option<i32> = captures[2].parse().ok().filter(|y| (YEAR_MIN..=YEAR_MAX).contains(y));
            if let Some(y) = year {
                return (clean_title(&captures[1]), Some(y));
            }
        }
    }
    (clean_title(stem), None)
}

/// Walk a directory tree and produce one input per movie container.
pub fn scan(root: &Path) -> Vec<MovieInput> {
    let library = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut inputs = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_movie = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| MOVIE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_movie {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (title, year) = parse_movie_name(&stem);
        if title.is_empty() {
            continue;
        }
        let file_size_bytes = entry.metadata().ok().map(|m| m.len());

        inputs.push(MovieInput {
            source: Source::Local,
            library: library.clone(),
            title,
            year,
            file: Some(path.display().to_string()),
            file_size_bytes,
            imdb_id_hint: None,
        });
    }

    debug!("found {} movie files under {}", inputs.len(), root.display());
    inputs
}

//! cinecull - movie library curation
//!
//! Enumerates a movie library, fetches external ratings, and classifies
//! every title KEEP / DELETE / MAYBE / UNKNOWN through an ordered rule
//! cascade with adaptive, catalog-derived thresholds.

pub mod cli;
pub mod config;
pub mod engine;
pub mod extract;
pub mod misident;
pub mod models;
pub mod omdb;
pub mod pipeline;
pub mod reporters;
pub mod sources;
pub mod thresholds;

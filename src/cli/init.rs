//! Init command - write a cinecull.toml config template

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const TEMPLATE: &str = r#"# cinecull configuration
# Get a free OMDb key at https://www.omdbapi.com/apikey.aspx
# (or set CINECULL_OMDB_API_KEY in the environment)
# omdb_api_key = "xxxx"

[analysis]
# KEEP when the IMDb rating reaches this and the title is well known
imdb_keep_min_rating = 7.0
# Relaxed IMDb floor when a good Rotten Tomatoes score backs it up
imdb_keep_min_rating_with_rt = 6.5
rt_keep_min_score = 75

# DELETE when the IMDb rating is at or below this
imdb_delete_max_rating = 5.5
imdb_delete_max_votes = 1000
imdb_delete_max_votes_no_rt = 3000

# year:votes pairs — how many IMDb votes a title of that era needs to
# count as well known. Older films need fewer votes.
year_votes_table = "1950:200,1980:500,2000:2000,2015:5000"

# Vote-weighted blend with the catalog mean; distrusts thin vote counts
bayes_enabled = true
bayes_delete_max_score = 5.8
bayes_default_mean = 6.5

# Derive keep/delete cutoffs from your catalog's own rating distribution
auto_thresholds_enabled = false
auto_keep_percentile = 0.5
auto_delete_percentile = 0.1
auto_min_samples = 50
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let config_path = root.join("cinecull.toml");
    if config_path.exists() {
        println!(
            "{} {} already exists, leaving it alone",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, TEMPLATE)
        .with_context(|| "Failed to create config file")?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Analyze the library", style("cinecull analyze .").cyan());
    println!(
        "  {} Save a report for deletion",
        style("cinecull analyze . --format json -o run.json").cyan()
    );

    Ok(())
}

//! Init command - write a vertex-actors.toml with the default settings

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use vertex_actors::config::{CONFIG_FILE, EXAMPLE_CONFIG};

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    // Keep the default state directory out of version control
    let gitignore_path = dir.join(".gitignore");
    if gitignore_path.exists() {
        let content = std::fs::read_to_string(&gitignore_path).unwrap_or_default();
        if !content.contains(".vertex-actors") {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&gitignore_path)?;
            use std::io::Write;
            file.write_all(b"\n# vertex-actors state\n.vertex-actors/\n")?;
            println!(
                "{} Added .vertex-actors/ to {}",
                style("✓").green(),
                style(".gitignore").cyan()
            );
        }
    }

    println!("\nNext steps:");
    println!("  {} Ingest a stream", style("vertex-actors run edges.jsonl").cyan());
    println!("  {} Query a vertex", style("vertex-actors query out 1").cyan());

    Ok(())
}

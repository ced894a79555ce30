//! `sommelier check` — preflight validation of config and corpus.

use anyhow::Context;
use sommelier_config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;
    println!("Config OK: {config:?}");

    let documents =
        sommelier_memory::load_corpus(&config.corpus_path).context("Failed to load corpus")?;
    let dimension = documents.first().map(|d| d.embedding.len()).unwrap_or(0);
    println!(
        "Corpus OK: {} documents, embedding dimension {}",
        documents.len(),
        dimension
    );

    if config.api_key.is_none() {
        println!("Warning: no API key set — `serve` will refuse to start");
    }

    Ok(())
}

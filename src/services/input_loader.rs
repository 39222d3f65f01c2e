//! Loads templates, topics, and adjectives from disk.

use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::errors::InputError;
use crate::domain::models::{InputConfig, PromptTemplate, Taxonomy};

/// Everything the control loop reads from disk, loaded once per run.
#[derive(Debug, Clone)]
pub struct HarvestInputs {
    pub base_template: PromptTemplate,
    pub continuation_template: Option<PromptTemplate>,
    pub taxonomy: Taxonomy,
    pub adjectives: Vec<String>,
}

/// Split newline-delimited adjectives, skipping blank lines.
pub fn read_adjectives(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

async fn read_text(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })
}

async fn load_template(path: &Path) -> Result<PromptTemplate, InputError> {
    let text = read_text(path).await?;
    PromptTemplate::parse(&text).map_err(|e| InputError::Template {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

async fn load_taxonomy(path: &Path) -> Result<Taxonomy, InputError> {
    let text = read_text(path).await?;
    Taxonomy::from_json(&text).map_err(|source| InputError::Taxonomy {
        path: path.to_path_buf(),
        source,
    })
}

/// Load all inputs named by `config`.
pub async fn load_inputs(config: &InputConfig) -> Result<HarvestInputs, InputError> {
    let base_template = load_template(&config.prompt_file).await?;

    let continuation_template = match &config.continue_file {
        Some(path) => Some(load_template(path).await?),
        None => None,
    };

    let taxonomy = load_taxonomy(&config.topics_file).await?;
    if taxonomy.categories.is_empty() {
        warn!(path = %config.topics_file.display(), "topics file has no categories");
    }

    let adjectives = match &config.adjectives_file {
        Some(path) => read_adjectives(&read_text(path).await?),
        None => Vec::new(),
    };

    info!(
        categories = taxonomy.categories.len(),
        subcategories = taxonomy.subcategory_count(),
        adjectives = adjectives.len(),
        continuation = continuation_template.is_some(),
        "inputs loaded"
    );

    Ok(HarvestInputs {
        base_template,
        continuation_template,
        taxonomy,
        adjectives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_adjectives_skips_blank_lines() {
        let adjectives = read_adjectives("tricky\n\n  fun \r\nobscure\n");
        assert_eq!(adjectives, vec!["tricky", "fun", "obscure"]);
    }

    #[test]
    fn test_read_adjectives_empty_input() {
        assert!(read_adjectives("").is_empty());
        assert!(read_adjectives("\n\n").is_empty());
    }
}

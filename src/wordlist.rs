//! Wordlist loading: a file (or the packaged default), optionally filtered
//! to entries that look like a GraphQL name, optionally fetched from a URL
//! and cached locally first.

use std::path::Path;
use std::path::PathBuf;

use crate::error::Result;
use crate::grammar::VALID_NAME;

const PACKAGED_DEFAULT: &str = include_str!("assets/default_wordlist.txt");

fn split_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Loads the wordlist from `path`, or the packaged default if `None`.
pub fn load(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => Ok(split_lines(&std::fs::read_to_string(path)?)),
        None => Ok(split_lines(PACKAGED_DEFAULT)),
    }
}

/// Drops entries that don't match the grammar's `NAME` production, warning
/// once per dropped entry.
pub fn validate(wordlist: Vec<String>) -> Vec<String> {
    wordlist
        .into_iter()
        .filter(|word| {
            let ok = VALID_NAME.is_match(word);
            if !ok {
                tracing::warn!(word, "dropping wordlist entry that isn't a valid GraphQL name");
            }
            ok
        })
        .collect()
}

/// Resolves the on-disk cache path for a fetched wordlist, `~/.gql-oracle/wordlist.txt`.
fn cache_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "gql-oracle")
        .map(|dirs| dirs.cache_dir().join("wordlist.txt"))
}

/// Fetches a wordlist from `url`, caching it on disk so subsequent runs
/// don't re-fetch. Grounded in the hosted-wordlist helper the source ships,
/// reworked as an opt-in flag rather than the unconditional default.
pub async fn fetch(url: &url::Url) -> Result<Vec<String>> {
    if let Some(cache) = cache_path() {
        if let Ok(content) = std::fs::read_to_string(&cache) {
            if !content.trim().is_empty() {
                return Ok(split_lines(&content));
            }
        }
    }

    let response = reqwest::get(url.clone()).await?;
    let content = response.text().await?;

    if let Some(cache) = cache_path() {
        if let Some(parent) = cache.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                tracing::warn!(%error, path = %cache.display(), "could not create wordlist cache directory");
            } else if let Err(error) = std::fs::write(&cache, &content) {
                tracing::warn!(%error, path = %cache.display(), "could not write wordlist cache");
            }
        }
    }

    Ok(split_lines(&content))
}

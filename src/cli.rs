//! Command-line surface. The two-letter short form `-wv` is expressed as a
//! bare `--validate` long flag: clap short options are single characters,
//! so there's no literal equivalent for it.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use url::Url;

use crate::context::DEFAULT_BUCKET_SIZE;
use crate::error::OracleError;
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "gql-oracle",
    about = "Reconstructs a GraphQL schema from validator error-message suggestions"
)]
pub struct Args {
    /// Target GraphQL endpoint
    pub url: Url,

    /// 0 -> WARNING, 1 -> INFO, >=2 -> DEBUG
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Resume from a previously emitted schema
    #[arg(short = 'i', long = "input-schema", value_name = "file")]
    pub input_schema: Option<PathBuf>,

    /// Write schema JSON here each round (else stdout at the end)
    #[arg(short = 'o', long = "output", value_name = "file")]
    pub output: Option<PathBuf>,

    /// Starting document template; must contain FUZZ
    #[arg(short = 'd', long = "document", value_name = "string", default_value = "query { FUZZ }")]
    pub document: String,

    /// HTTP header, "Key: Value"
    #[arg(short = 'H', long = "header", value_name = "K: V")]
    pub headers: Vec<String>,

    #[arg(short = 'c', long = "concurrent-requests", value_name = "int", default_value_t = 50)]
    pub concurrent_requests: usize,

    /// Newline-separated names; defaults to the packaged wordlist
    #[arg(short = 'w', long = "wordlist", value_name = "file")]
    pub wordlist: Option<PathBuf>,

    /// Fetch the field/argument wordlist from this URL, caching it locally
    #[arg(long = "wordlist-url", value_name = "url")]
    pub wordlist_url: Option<Url>,

    /// Drop wordlist entries that don't look like a GraphQL name
    #[arg(long = "validate")]
    pub validate: bool,

    #[arg(short = 'x', long = "proxy", value_name = "url")]
    pub proxy: Option<Url>,

    /// Disable TLS certificate verification
    #[arg(short = 'k', long = "no-ssl")]
    pub no_ssl: bool,

    #[arg(short = 'm', long = "max-retries", value_name = "int", default_value_t = 3)]
    pub max_retries: u32,

    /// Exponential backoff base; delay = 0.5 * base^retries
    #[arg(short = 'b', long = "backoff", value_name = "int")]
    pub backoff: Option<u32>,

    #[arg(short = 'p', long = "profile", value_enum, default_value_t = Profile::Fast)]
    pub profile: Profile,

    /// Show a progress bar on long fan-outs
    #[arg(long = "progress")]
    pub progress: bool,

    /// Append an "Input" suffix to argument typerefs that look like they're
    /// missing it. Off by default: it's a heuristic, not a rule.
    #[arg(long = "infer-input-suffix")]
    pub infer_input_suffix: bool,

    /// Wordlist bucket size (64-4096)
    #[arg(long = "bucket-size", value_name = "int", default_value_t = DEFAULT_BUCKET_SIZE)]
    pub bucket_size: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// concurrent=1, max-retries=50, backoff=2
    Slow,
    Fast,
}

impl Args {
    pub fn parse_headers(&self) -> Result<HashMap<String, String>> {
        let mut headers = HashMap::new();
        for header in &self.headers {
            let (key, value) = header.split_once(": ").ok_or_else(|| {
                OracleError::ArgumentParse(format!("malformed header '{header}', expected 'Key: Value'"))
            })?;
            headers.insert(key.to_string(), value.to_string());
        }
        Ok(headers)
    }
}

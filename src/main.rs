use std::process::ExitCode;

use clap::Parser;

use gql_oracle::cli::Args;
use gql_oracle::cli::Profile;
use gql_oracle::context::Oracle;
use gql_oracle::http::Client;
use gql_oracle::http::ClientConfig;
use gql_oracle::logging;
use gql_oracle::oracle;
use gql_oracle::wordlist;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "aborting");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> gql_oracle::error::Result<()> {
    let headers = args.parse_headers()?;

    let mut config = ClientConfig::new(args.url.clone());
    config.headers = headers;
    config.max_retries = args.max_retries;
    config.concurrent_requests = args.concurrent_requests;
    config.proxy = args.proxy.clone();
    config.backoff = args.backoff;
    config.disable_ssl_verify = args.no_ssl;
    if args.profile == Profile::Slow {
        config = config.slow_profile();
    }

    let client = Client::new(config)?;
    let oracle = Oracle::new(client, args.bucket_size, args.infer_input_suffix).with_progress(args.progress);

    let mut words = match &args.wordlist_url {
        Some(url) => wordlist::fetch(url).await?,
        None => wordlist::load(args.wordlist.as_deref())?,
    };
    if args.validate {
        words = wordlist::validate(words);
    }
    tracing::info!(count = words.len(), "loaded wordlist");

    let input_schema = match &args.input_schema {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    let schema = oracle::run(
        &oracle,
        &words,
        args.document.clone(),
        input_schema,
        args.output.as_deref(),
    )
    .await?;

    if args.output.is_none() {
        println!("{}", schema.to_json_string());
    }

    Ok(())
}

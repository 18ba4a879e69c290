//! Tracing setup: verbosity count from `-v` takes precedence over `LOG_LEVEL`.
//! `LOG_FMT` picks the formatter (`compact`, `json`, or the default); `LOG_DATEFMT`
//! is read but, absent a strftime-style formatter in `tracing-subscriber`, only
//! toggles between showing and hiding timestamps (`LOG_DATEFMT=none` hides).

const DEFAULT_LEVEL: &str = "info";

enum Format {
    Default,
    Compact,
    Json,
}

pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LEVEL.to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };

    let format = match std::env::var("LOG_FMT").as_deref() {
        Ok("compact") => Format::Compact,
        Ok("json") => Format::Json,
        _ => Format::Default,
    };
    let show_time = std::env::var("LOG_DATEFMT").map(|v| v != "none").unwrap_or(true);

    let filter = tracing_subscriber::EnvFilter::try_new(format!("gql_oracle={level}"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LEVEL));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match (format, show_time) {
        (Format::Default, true) => builder.init(),
        (Format::Default, false) => builder.without_time().init(),
        (Format::Compact, true) => builder.compact().init(),
        (Format::Compact, false) => builder.compact().without_time().init(),
        (Format::Json, true) => builder.json().init(),
        (Format::Json, false) => builder.json().without_time().init(),
    }
}

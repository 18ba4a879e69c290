pub mod cli;
pub mod context;
pub mod error;
pub mod grammar;
pub mod http;
pub mod logging;
pub mod oracle;
pub mod probe;
pub mod schema;
pub mod wordlist;

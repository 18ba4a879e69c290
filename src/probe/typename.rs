use crate::context::Oracle;
use crate::grammar;

use super::error_messages;

/// The three root operation typenames, fetched directly (no error-message
/// inference needed — `__typename` is always queryable).
#[derive(Debug, Clone, Default)]
pub struct RootTypenames {
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

/// Sends the document with `FUZZ` replaced by a sentinel invalid field name
/// and scans the resulting errors for the containing type's name.
pub async fn probe_typename(oracle: &Oracle, input_document: &str) -> String {
    let document = input_document.replacen("FUZZ", "IAmWrongField", 1);
    let response = oracle.client.post(Some(&document)).await;
    grammar::extract_typename(&error_messages(&response))
}

/// Fetches `query`/`mutation`/`subscription { __typename }` serially, since
/// this only runs once per outer-loop invocation and there's no benefit to
/// racing three requests against a target we've barely started probing.
pub async fn fetch_root_typenames(oracle: &Oracle) -> RootTypenames {
    RootTypenames {
        query: fetch_typename(oracle, "query { __typename }").await,
        mutation: fetch_typename(oracle, "mutation { __typename }").await,
        subscription: fetch_typename(oracle, "subscription { __typename }").await,
    }
}

async fn fetch_typename(oracle: &Oracle, document: &str) -> Option<String> {
    let response = oracle.client.post(Some(document)).await;
    response["data"]["__typename"].as_str().map(String::from)
}

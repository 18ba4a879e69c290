use std::collections::HashSet;

use crate::context::Oracle;
use crate::grammar;

use super::any_no_subfields;
use super::error_messages;

/// Probes one bucket of candidate argument names against `field` using an
/// integer-literal fragment, e.g. `field(w1: 7, w2: 7)`.
pub async fn probe_valid_args(
    oracle: &Oracle,
    field: &str,
    bucket: &[String],
    input_document: &str,
) -> HashSet<String> {
    let args = bucket
        .iter()
        .map(|w| format!("{w}: 7"))
        .collect::<Vec<_>>()
        .join(", ");
    let fragment = format!("{field}({args})");
    let document = input_document.replacen("FUZZ", &fragment, 1);
    let response = oracle.client.post(Some(&document)).await;
    let errors = error_messages(&response);

    if any_no_subfields(&errors) {
        return HashSet::new();
    }

    let mut valid: HashSet<String> = bucket.iter().cloned().collect();
    for msg in &errors {
        if let Some(invalid) = grammar::find_invalid_arg(msg) {
            valid.remove(&invalid);
        }
        if let Some(dup) = grammar::find_duplicate_arg(msg) {
            valid.remove(&dup);
        }
    }
    for msg in &errors {
        valid.extend(grammar::classify_arg_error(msg));
    }

    valid
}

/// Tiles [`probe_valid_args`] over the full wordlist in `oracle.bucket_size`
/// chunks and unions the results.
pub async fn probe_args(
    oracle: &Oracle,
    field: &str,
    wordlist: &[String],
    input_document: &str,
) -> HashSet<String> {
    let bucket_size = oracle.bucket_size.max(1);
    let tasks = wordlist
        .chunks(bucket_size)
        .map(|bucket| probe_valid_args(oracle, field, bucket, input_document));

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .flatten()
        .collect()
}

use std::collections::HashSet;

use crate::context::Oracle;
use crate::grammar;

use super::any_no_subfields;
use super::error_messages;

/// Splits `wordlist` into `oracle.bucket_size`-sized buckets, substitutes
/// each bucket's space-joined words into `input_document`'s `FUZZ` marker,
/// and unions the field names each bucket's response reveals.
pub async fn probe_valid_fields(
    oracle: &Oracle,
    wordlist: &[String],
    input_document: &str,
) -> HashSet<String> {
    let bucket_size = oracle.bucket_size.max(1);
    let tasks = wordlist
        .chunks(bucket_size)
        .map(|bucket| probe_field_bucket(oracle, bucket, input_document));

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .flatten()
        .collect()
}

async fn probe_field_bucket(
    oracle: &Oracle,
    bucket: &[String],
    input_document: &str,
) -> HashSet<String> {
    let fragment = bucket.join(" ");
    let document = input_document.replacen("FUZZ", &fragment, 1);
    let response = oracle.client.post(Some(&document)).await;
    let errors = error_messages(&response);

    if any_no_subfields(&errors) {
        return HashSet::new();
    }

    // Seed optimistically, discard invalid, then union suggestions — in
    // that order, since swapping the steps can drop legitimate discoveries.
    let mut valid: HashSet<String> = bucket.iter().cloned().collect();
    for msg in &errors {
        if let Some(invalid) = grammar::find_invalid_field(msg) {
            valid.remove(&invalid);
        }
    }
    for msg in &errors {
        valid.extend(grammar::classify_field_error(msg));
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Client;
    use crate::http::ClientConfig;
    use pretty_assertions::assert_eq;
    use url::Url;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::method;

    async fn oracle_against(server: &MockServer) -> Oracle {
        let url = Url::parse(&server.uri()).unwrap();
        let client = Client::new(ClientConfig::new(url)).unwrap();
        Oracle::new(client, 512, false)
    }

    #[tokio::test]
    async fn discovers_suggested_fields_and_discards_the_invalid_seed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [
                    {"message": "Cannot query field \"hoems\" on type \"Query\". Did you mean \"homes\"?"}
                ]
            })))
            .mount(&server)
            .await;

        let oracle = oracle_against(&server).await;
        let wordlist = vec!["hoems".to_string()];
        let got = probe_valid_fields(&oracle, &wordlist, "query { FUZZ }").await;

        assert_eq!(got, HashSet::from(["homes".to_string()]));
    }

    #[tokio::test]
    async fn abandons_bucket_on_no_subfields_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [
                    {"message": "Field \"id\" must not have a selection since type \"ID!\" has no subfields."}
                ]
            })))
            .mount(&server)
            .await;

        let oracle = oracle_against(&server).await;
        let wordlist = vec!["anything".to_string()];
        let got = probe_valid_fields(&oracle, &wordlist, "query { id { FUZZ } }").await;

        assert!(got.is_empty());
    }
}

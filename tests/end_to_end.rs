//! Reconstructs a small two-level schema end to end: a Query type exposing
//! `launches`, `launch`, and `me`, where `me` leads to a User type exposing
//! `id`, `email`, and `trips`. Every endpoint response is scripted from the
//! validator error-message shapes a real GraphQL server emits.

use gql_oracle::context::Oracle;
use gql_oracle::http::Client;
use gql_oracle::http::ClientConfig;
use gql_oracle::oracle;
use serde_json::json;
use url::Url;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::method;

fn errors(messages: &[&str]) -> serde_json::Value {
    json!({ "errors": messages.iter().map(|m| json!({"message": m})).collect::<Vec<_>>() })
}

async fn stub(server: &MockServer, query: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(body_json(json!({ "query": query })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn reconstructs_query_and_user_types_from_suggestions() {
    let server = MockServer::start().await;

    // -- root typenames (round 1 only; input_schema starts empty) --------
    stub(&server, "query { __typename }", json!({"data": {"__typename": "Query"}})).await;
    stub(&server, "mutation { __typename }", json!({"data": {"__typename": "Query"}})).await;
    stub(&server, "subscription { __typename }", json!({"data": {"__typename": "Query"}})).await;

    // -- round 1: Query --------------------------------------------------
    stub(
        &server,
        "query { IAmWrongField }",
        errors(&[r#"Cannot query field "IAmWrongField" on type "Query"."#]),
    )
    .await;

    stub(
        &server,
        "query { launches launch me id email trips nope }",
        errors(&[
            r#"Cannot query field "id" on type "Query"."#,
            r#"Cannot query field "email" on type "Query"."#,
            r#"Cannot query field "trips" on type "Query"."#,
            r#"Cannot query field "nope" on type "Query"."#,
        ]),
    )
    .await;

    stub(
        &server,
        "query { launches }",
        errors(&[r#"Field "launches" must not have a selection since type "[String!]!" has no subfields."#]),
    )
    .await;
    stub(
        &server,
        "query { launches { lol } }",
        errors(&[r#"Field "launches" must not have a selection since type "[String!]!" has no subfields."#]),
    )
    .await;

    stub(
        &server,
        "query { launch }",
        errors(&[r#"Field "launch" must not have a selection since type "ID!" has no subfields."#]),
    )
    .await;
    stub(
        &server,
        "query { launch { lol } }",
        errors(&[r#"Field "launch" must not have a selection since type "ID!" has no subfields."#]),
    )
    .await;

    stub(
        &server,
        "query { me }",
        errors(&[r#"Field "me" of type "User" must have a selection of subfields. Did you mean "me { ... }"?"#]),
    )
    .await;
    stub(
        &server,
        "query { me { lol } }",
        errors(&[r#"Cannot query field "lol" on type "User"."#]),
    )
    .await;

    stub(
        &server,
        "query { me(launches: 7, launch: 7, me: 7, id: 7, email: 7, trips: 7, nope: 7) }",
        errors(&[
            r#"Unknown argument "launches" on field "me" of type "User"."#,
            r#"Unknown argument "launch" on field "me" of type "User"."#,
            r#"Unknown argument "me" on field "me" of type "User"."#,
            r#"Unknown argument "id" on field "me" of type "User"."#,
            r#"Unknown argument "email" on field "me" of type "User"."#,
            r#"Unknown argument "trips" on field "me" of type "User"."#,
            r#"Unknown argument "nope" on field "me" of type "User"."#,
        ]),
    )
    .await;

    // -- round 2: User, reached through Query.me --------------------------
    stub(
        &server,
        "query { me { IAmWrongField } }",
        errors(&[r#"Cannot query field "IAmWrongField" on type "User"."#]),
    )
    .await;

    stub(
        &server,
        "query { me { launches launch me id email trips nope } }",
        errors(&[
            r#"Cannot query field "launches" on type "User"."#,
            r#"Cannot query field "launch" on type "User"."#,
            r#"Cannot query field "me" on type "User"."#,
            r#"Cannot query field "nope" on type "User"."#,
        ]),
    )
    .await;

    stub(
        &server,
        "query { me { id } }",
        errors(&[r#"Field "id" must not have a selection since type "ID!" has no subfields."#]),
    )
    .await;
    stub(
        &server,
        "query { me { id { lol } } }",
        errors(&[r#"Field "id" must not have a selection since type "ID!" has no subfields."#]),
    )
    .await;

    stub(
        &server,
        "query { me { email } }",
        errors(&[r#"Field "email" must not have a selection since type "String!" has no subfields."#]),
    )
    .await;
    stub(
        &server,
        "query { me { email { lol } } }",
        errors(&[r#"Field "email" must not have a selection since type "String!" has no subfields."#]),
    )
    .await;

    stub(
        &server,
        "query { me { trips } }",
        errors(&[r#"Field "trips" must not have a selection since type "[String!]!" has no subfields."#]),
    )
    .await;
    stub(
        &server,
        "query { me { trips { lol } } }",
        errors(&[r#"Field "trips" must not have a selection since type "[String!]!" has no subfields."#]),
    )
    .await;

    let url = Url::parse(&server.uri()).unwrap();
    let client = Client::new(ClientConfig::new(url)).unwrap();
    let oracle = Oracle::new(client, 512, false);

    let wordlist: Vec<String> = ["launches", "launch", "me", "id", "email", "trips", "nope"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let schema = oracle::run(&oracle, &wordlist, "query { FUZZ }".to_string(), None, None)
        .await
        .unwrap();

    let query_fields: std::collections::HashSet<_> =
        schema.types["Query"].fields.iter().map(|f| f.name.clone()).collect();
    assert_eq!(
        query_fields,
        ["launches", "launch", "me"].iter().map(|s| s.to_string()).collect()
    );

    let user_fields: std::collections::HashSet<_> =
        schema.types["User"].fields.iter().map(|f| f.name.clone()).collect();
    assert_eq!(
        user_fields,
        ["id", "email", "trips"].iter().map(|s| s.to_string()).collect()
    );
}

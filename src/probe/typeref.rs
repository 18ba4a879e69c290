use crate::context::Oracle;
use crate::error::OracleError;
use crate::error::Result;
use crate::grammar;
use crate::grammar::FuzzingContext;
use crate::schema::TypeRef;

use super::error_messages;

/// Sends every document in `documents` concurrently and returns the *last*
/// non-null typeref extracted across all of their error messages, in
/// document then message order.
pub async fn probe_typeref(
    oracle: &Oracle,
    documents: &[String],
    context: FuzzingContext,
) -> Option<TypeRef> {
    let tasks = documents
        .iter()
        .map(|doc| async move { error_messages(&oracle.client.post(Some(doc)).await) });

    let responses = futures::future::join_all(tasks).await;

    let mut last = None;
    for errors in responses {
        for msg in errors {
            if let Some(typeref) = grammar::extract_typeref(&msg, context) {
                last = Some(typeref);
            }
        }
    }
    last
}

/// Resolves a field's own type by provoking both the bare-selection and
/// nested-subfield errors. A FIELD typeref must be recoverable — if the
/// target never suggests one, field typing is impossible and the run aborts.
pub async fn probe_field_type(
    oracle: &Oracle,
    field: &str,
    input_document: &str,
) -> Result<TypeRef> {
    let documents = vec![
        input_document.replacen("FUZZ", field, 1),
        input_document.replacen("FUZZ", &format!("{field} {{ lol }}"), 1),
    ];

    probe_typeref(oracle, &documents, FuzzingContext::Field)
        .await
        .ok_or(OracleError::EndpointError)
}

/// Resolves one argument's type by provoking coercion errors across five
/// mistyped literal shapes. A null result just means this argument's type
/// stays unknown; it isn't fatal.
pub async fn probe_arg_typeref(
    oracle: &Oracle,
    field: &str,
    arg: &str,
    input_document: &str,
) -> Option<TypeRef> {
    let stripped = &arg[..arg.len().saturating_sub(1)];
    let fragments = [
        format!("{field}({arg}: 42)"),
        format!("{field}({arg}: {{}})"),
        format!("{field}({stripped}: 42)"),
        format!("{field}({arg}: \"42\")"),
        format!("{field}({arg}: false)"),
    ];
    let documents = fragments
        .iter()
        .map(|f| input_document.replacen("FUZZ", f, 1))
        .collect::<Vec<_>>();

    probe_typeref(oracle, &documents, FuzzingContext::Argument).await
}

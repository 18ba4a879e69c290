//! Turns document templates into schema facts by talking to the endpoint
//! through an [`Oracle`](crate::context::Oracle) and handing the response's
//! error messages to the grammar.

mod args;
mod fields;
mod typename;
mod typeref;

pub use args::probe_args;
pub use args::probe_valid_args;
pub use fields::probe_valid_fields;
pub use typename::RootTypenames;
pub use typename::fetch_root_typenames;
pub use typename::probe_typename;
pub use typeref::probe_arg_typeref;
pub use typeref::probe_field_type;
pub use typeref::probe_typeref;

use serde_json::Value;

/// Pulls `errors[*].message` out of a raw GraphQL response, ignoring any
/// response shape that doesn't carry one (an exhausted-retries empty map, or
/// a response with no errors at all).
fn error_messages(response: &Value) -> Vec<String> {
    response["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["message"].as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// True when any message in `errors` reports that the enclosing selection's
/// type is a childless scalar — the bucket-abort signal shared by the field
/// and argument probes.
fn any_no_subfields(errors: &[String]) -> bool {
    errors
        .iter()
        .any(|m| m.contains("must not have a selection since type") && m.contains("has no subfields"))
}

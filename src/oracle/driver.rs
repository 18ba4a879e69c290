//! Outer fixed-point loop: repeatedly runs one introspection round, then
//! picks the next unresolved type until none remain.

use std::collections::HashSet;
use std::path::Path;

use crate::context::Oracle;
use crate::error::Result;
use crate::schema::BUILTIN_SCALARS;
use crate::schema::Schema;

use super::round::clairvoyance;

/// Runs rounds until every discovered type either has fields or has been
/// ruled out, writing the schema to `output_path` after each round if given.
/// Returns the final schema.
pub async fn run(
    oracle: &Oracle,
    wordlist: &[String],
    mut input_document: String,
    mut input_schema: Option<String>,
    output_path: Option<&Path>,
) -> Result<Schema> {
    let mut ignored: HashSet<String> = BUILTIN_SCALARS.iter().map(|s| s.to_string()).collect();

    loop {
        let json = clairvoyance(oracle, wordlist, &input_document, input_schema.as_deref()).await?;

        if let Some(path) = output_path {
            std::fs::write(path, &json)?;
        }

        let schema = Schema::from_json_str(&json)?;

        let next = schema.type_without_fields(&ignored);
        let Some(next) = next else {
            return Ok(schema);
        };

        tracing::info!(next_type = %next, "continuing fixed-point loop");
        ignored.insert(next.clone());

        let path = schema.path_from_root(&next)?;
        input_document = schema.convert_path_to_document(path)?;
        input_schema = Some(json);
    }
}

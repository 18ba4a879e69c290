//! One introspection round: discover the fields (and their arguments) of a
//! single type addressed by `input_document`'s `FUZZ` placeholder.

use crate::context::Oracle;
use crate::error::Result;
use crate::probe;
use crate::schema::BUILTIN_SCALARS;
use crate::schema::Field;
use crate::schema::InputValue;
use crate::schema::Schema;
use crate::schema::TypeRef;

/// Runs one round against `input_document`, seeding the schema from
/// `input_schema` when resuming, or from freshly-fetched root typenames
/// otherwise. Returns the updated schema serialized in introspection JSON.
pub async fn clairvoyance(
    oracle: &Oracle,
    wordlist: &[String],
    input_document: &str,
    input_schema: Option<&str>,
) -> Result<String> {
    let mut schema = match input_schema {
        Some(raw) => Schema::from_json_str(raw)?,
        None => {
            let roots = probe::fetch_root_typenames(oracle).await;
            Schema::new(roots.query, roots.mutation, roots.subscription)
        }
    };

    let typename = probe::probe_typename(oracle, input_document).await;
    schema.add_type(&typename, "OBJECT");

    let valid_fields = probe::probe_valid_fields(oracle, wordlist, input_document).await;
    tracing::info!(typename = %typename, field_count = valid_fields.len(), "discovered fields");

    let bar = oracle.progress.then(|| {
        indicatif::ProgressBar::new(valid_fields.len() as u64).with_message(format!("exploring {typename}"))
    });

    let tasks = valid_fields.iter().map(|field_name| {
        let bar = bar.clone();
        async move {
            let result = explore_field(oracle, field_name, input_document, wordlist).await;
            if let Some(bar) = &bar {
                bar.inc(1);
            }
            result
        }
    });
    let fields: Result<Vec<Field>> = futures::future::join_all(tasks).await.into_iter().collect();
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let fields = fields?;

    for field in fields {
        for arg in &field.args {
            schema.add_type(&arg.type_ref.name, "INPUT_OBJECT");
        }
        schema.add_type(&field.type_ref.name, "OBJECT");
        schema.types.get_mut(&typename).expect("just inserted above").fields.push(field);
    }

    Ok(schema.to_json_string())
}

async fn explore_field(
    oracle: &Oracle,
    field_name: &str,
    input_document: &str,
    wordlist: &[String],
) -> Result<Field> {
    let typeref = probe::probe_field_type(oracle, field_name, input_document).await?;
    let mut field = Field::new(field_name, typeref.clone());

    if BUILTIN_SCALARS.contains(&typeref.name.as_str()) {
        return Ok(field);
    }

    let arg_names = probe::probe_args(oracle, field_name, wordlist, input_document).await;
    for arg_name in arg_names {
        let Some(mut arg_typeref) = probe::probe_arg_typeref(oracle, field_name, &arg_name, input_document).await
        else {
            continue;
        };
        if oracle.infer_input_suffix && arg_typeref.kind == "INPUT_OBJECT" && !arg_typeref.name.ends_with("Input") {
            arg_typeref = TypeRef::with_modifiers(
                format!("{}Input", arg_typeref.name),
                arg_typeref.kind,
                arg_typeref.is_list,
                arg_typeref.non_null_item,
                arg_typeref.non_null,
            );
        }
        field.args.push(InputValue::new(arg_name, arg_typeref));
    }

    Ok(field)
}

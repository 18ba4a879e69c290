//! Turns validator error-message text into schema facts.
//!
//! The grammar is closed: a fixed, ordered table of anchored regexes. Each
//! classifier tries its SKIP patterns first, then its suggestion patterns in
//! priority order, falling back to a debug-logged "unknown message" empty
//! result.

use std::collections::HashSet;

use crate::schema::BUILTIN_SCALARS;
use crate::schema::TypeRef;

use super::patterns::ARG_DUPLICATE;
use super::patterns::ARG_UNKNOWN_DOUBLE;
use super::patterns::ARG_UNKNOWN_INVALID;
use super::patterns::ARG_UNKNOWN_MULTI;
use super::patterns::ARG_UNKNOWN_ON_FIELD;
use super::patterns::ARG_UNKNOWN_ON_FIELD_SHORT;
use super::patterns::ARG_UNKNOWN_SINGLE;
use super::patterns::CANNOT_QUERY_FIELD_DOUBLE;
use super::patterns::CANNOT_QUERY_FIELD_INLINE_FRAGMENT;
use super::patterns::CANNOT_QUERY_FIELD_INVALID;
use super::patterns::CANNOT_QUERY_FIELD_MULTI;
use super::patterns::CANNOT_QUERY_FIELD_PLAIN;
use super::patterns::CANNOT_QUERY_FIELD_SINGLE;
use super::patterns::FIELD_ARG_REQUIRED;
use super::patterns::FIELD_MUST_HAVE_SELECTION;
use super::patterns::FIELD_NO_SUBFIELDS;
use super::patterns::SCALAR_COERCION_NOISE;
use super::patterns::TYPENAME_CANNOT_QUERY_FIELD;
use super::patterns::TYPENAME_MUST_NOT_HAVE_SUB_SELECTION;
use super::patterns::TYPENAME_NO_SUBFIELDS;
use super::patterns::TYPEREF_ARG_REQUIRED;
use super::patterns::TYPEREF_CANNOT_QUERY_FIELD;
use super::patterns::TYPEREF_EXPECTED_TYPE;
use super::patterns::TYPEREF_FIELD_MUST_HAVE_SELECTION;
use super::patterns::TYPEREF_MUST_NOT_HAVE_SUB_SELECTION;
use super::patterns::TYPEREF_NO_SUBFIELDS;

/// Context a typeref is being extracted in; the two families of regex act as
/// mutual reject filters so the same message can't satisfy both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzingContext {
    Field,
    Argument,
}

fn strip_quotes(s: &str) -> String {
    s.trim_matches(|c| c == '\'' || c == '"').to_string()
}

/// Discovers valid field names suggested by a single error message.
pub fn classify_field_error(msg: &str) -> HashSet<String> {
    if FIELD_NO_SUBFIELDS.is_match(msg)
        || FIELD_ARG_REQUIRED.is_match(msg)
        || CANNOT_QUERY_FIELD_PLAIN.is_match(msg)
        || CANNOT_QUERY_FIELD_INLINE_FRAGMENT.is_match(msg)
    {
        return HashSet::new();
    }

    if let Some(caps) = FIELD_MUST_HAVE_SELECTION.captures(msg) {
        return HashSet::from([caps["field"].to_string()]);
    }

    if let Some(caps) = CANNOT_QUERY_FIELD_SINGLE.captures(msg) {
        return HashSet::from([caps["field"].to_string()]);
    }

    if let Some(caps) = CANNOT_QUERY_FIELD_DOUBLE.captures(msg) {
        return HashSet::from([caps["one"].to_string(), caps["two"].to_string()]);
    }

    if let Some(caps) = CANNOT_QUERY_FIELD_MULTI.captures(msg) {
        let mut set: HashSet<String> = caps["multi"]
            .split(", ")
            .filter(|s| !s.is_empty())
            .map(strip_quotes)
            .collect();
        if let Some(last) = caps.name("last") {
            set.insert(last.as_str().to_string());
        }
        return set;
    }

    if SCALAR_COERCION_NOISE.is_match(msg) {
        return HashSet::new();
    }

    tracing::debug!(message = msg, "unknown field error message");
    HashSet::new()
}

/// Discovers valid argument names suggested by a single error message.
pub fn classify_arg_error(msg: &str) -> HashSet<String> {
    if ARG_UNKNOWN_ON_FIELD.is_match(msg)
        || ARG_UNKNOWN_ON_FIELD_SHORT.is_match(msg)
        || ARG_DUPLICATE.is_match(msg)
        || FIELD_MUST_HAVE_SELECTION.is_match(msg)
        || FIELD_ARG_REQUIRED.is_match(msg)
    {
        return HashSet::new();
    }

    if let Some(caps) = ARG_UNKNOWN_SINGLE.captures(msg) {
        return HashSet::from([caps["arg"].to_string()]);
    }

    if let Some(caps) = ARG_UNKNOWN_DOUBLE.captures(msg) {
        return HashSet::from([caps["first"].to_string(), caps["second"].to_string()]);
    }

    if let Some(caps) = ARG_UNKNOWN_MULTI.captures(msg) {
        let mut set: HashSet<String> = caps["multi"]
            .split(", ")
            .filter(|s| !s.is_empty())
            .map(strip_quotes)
            .collect();
        if let Some(last) = caps.name("last") {
            set.insert(last.as_str().to_string());
        }
        return set;
    }

    tracing::debug!(message = msg, "unknown argument error message");
    HashSet::new()
}

/// An invalid-name scan used by the probes to *discard* from the optimistic
/// bucket seed, distinct from the suggestion-based *union*.
pub fn find_invalid_field(msg: &str) -> Option<String> {
    CANNOT_QUERY_FIELD_INVALID
        .captures(msg)
        .map(|c| c["invalid_field"].to_string())
}

pub fn find_invalid_arg(msg: &str) -> Option<String> {
    ARG_UNKNOWN_INVALID.captures(msg).map(|c| c["invalid_arg"].to_string())
}

pub fn find_duplicate_arg(msg: &str) -> Option<String> {
    ARG_DUPLICATE.captures(msg).map(|c| c["arg"].to_string())
}

fn typeref_from_token(tk: &str, context: FuzzingContext) -> TypeRef {
    let name = tk.replace(['!', '[', ']'], "");
    let kind = if BUILTIN_SCALARS.contains(&name.as_str()) {
        "SCALAR"
    } else {
        match context {
            FuzzingContext::Field => "OBJECT",
            FuzzingContext::Argument => "INPUT_OBJECT",
        }
    };
    let is_list = tk.contains('[') && tk.contains(']');
    let non_null_item = is_list && tk.contains("!]");
    let non_null = tk.ends_with('!');

    TypeRef::with_modifiers(name, kind, is_list, non_null_item, non_null)
}

/// Extracts a type reference from a single error message, or `None` if the
/// message doesn't name one in this context.
pub fn extract_typeref(msg: &str, context: FuzzingContext) -> Option<TypeRef> {
    let rejected = match context {
        FuzzingContext::Argument => {
            TYPEREF_FIELD_MUST_HAVE_SELECTION.is_match(msg)
                || TYPEREF_NO_SUBFIELDS.is_match(msg)
                || TYPEREF_CANNOT_QUERY_FIELD.is_match(msg)
                || TYPEREF_MUST_NOT_HAVE_SUB_SELECTION.is_match(msg)
        }
        FuzzingContext::Field => {
            TYPEREF_ARG_REQUIRED.is_match(msg) || TYPEREF_EXPECTED_TYPE.is_match(msg)
        }
    };
    if rejected {
        return None;
    }

    let token = match context {
        FuzzingContext::Field => TYPEREF_FIELD_MUST_HAVE_SELECTION
            .captures(msg)
            .or_else(|| TYPEREF_NO_SUBFIELDS.captures(msg))
            .or_else(|| TYPEREF_CANNOT_QUERY_FIELD.captures(msg))
            .or_else(|| TYPEREF_MUST_NOT_HAVE_SUB_SELECTION.captures(msg))
            .map(|c| c["typeref"].to_string()),
        FuzzingContext::Argument => TYPEREF_ARG_REQUIRED
            .captures(msg)
            .or_else(|| TYPEREF_EXPECTED_TYPE.captures(msg))
            .map(|c| c["typeref"].to_string()),
    };

    match token {
        Some(tk) => Some(typeref_from_token(&tk, context)),
        None => {
            tracing::debug!(message = msg, ?context, "unknown error message while extracting typeref");
            None
        }
    }
}

/// Scans a batch of error messages for the containing type's name, falling
/// back to `"Query"` (and a warning) when nothing matches — many endpoints
/// silently default to that on unrelated errors.
pub fn extract_typename(errors: &[String]) -> String {
    for pattern in [
        &*TYPENAME_CANNOT_QUERY_FIELD,
        &*TYPENAME_NO_SUBFIELDS,
        &*TYPENAME_MUST_NOT_HAVE_SUB_SELECTION,
    ] {
        for error in errors {
            if let Some(caps) = pattern.captures(error) {
                return caps["typename"].replace(['[', ']', '!'], "");
            }
        }
    }

    tracing::warn!("could not determine containing type name from errors; defaulting to 'Query'");
    "Query".to_string()
}

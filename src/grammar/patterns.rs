//! The closed table of compiled regular expressions the grammar matches
//! against. Every pattern here is anchored (`^...$`) and compiled once at
//! first use via [`once_cell::sync::Lazy`].

use once_cell::sync::Lazy;
use regex::Regex;

const NAME: &str = r#"[_A-Za-z][_0-9A-Za-z]*"#;
const TYPEREF: &str = r#"[_A-Za-z\[\]!][_0-9a-zA-Z\[\]!]*"#;
const Q: &str = r#"['"]"#;
const REQUIRED: &str = r#"required(?:, but it was not provided| but not provided)?\."#;

fn build(pattern: String) -> Regex {
    Regex::new(&format!("^{pattern}$")).expect("pattern table is a compile-time constant")
}

fn build_prefix(pattern: String) -> Regex {
    Regex::new(&format!("^{pattern}")).expect("pattern table is a compile-time constant")
}

macro_rules! pattern {
    ($name:ident, $fmt:expr) => {
        pub static $name: Lazy<Regex> = Lazy::new(|| {
            build(format!($fmt, q = Q, name = NAME, typeref = TYPEREF, required = REQUIRED))
        });
    };
}

/// Like `pattern!`, but anchored only at the start — used for the "discard
/// this name" scans that match a prefix of a longer suggestion message.
macro_rules! prefix_pattern {
    ($name:ident, $fmt:expr) => {
        pub static $name: Lazy<Regex> = Lazy::new(|| {
            build_prefix(format!($fmt, q = Q, name = NAME, typeref = TYPEREF, required = REQUIRED))
        });
    };
}

pattern!(VALID_NAME, r#"{name}"#);

// ---- field suggestions -----------------------------------------------

pattern!(
    FIELD_NO_SUBFIELDS,
    r#"Field {q}{name}{q} must not have a selection since type {q}{typeref}{q} has no subfields\."#
);
pattern!(
    FIELD_ARG_REQUIRED,
    r#"Field {q}{name}{q} argument {q}{name}{q} of type {q}{typeref}{q} is {required}"#
);
pattern!(
    CANNOT_QUERY_FIELD_PLAIN,
    r#"Cannot query field {q}{name}{q} on type {q}{name}{q}\."#
);
pattern!(
    CANNOT_QUERY_FIELD_INLINE_FRAGMENT,
    r#"Cannot query field {q}{name}{q} on type {q}{name}{q}\. Did you mean inline fragment on .+\?"#
);
pattern!(
    FIELD_MUST_HAVE_SELECTION,
    r#"Field {q}(?P<field>{name}){q} of type {q}(?P<typeref>{typeref}){q} must have a selection(?: of subfields)?\. Did you mean {q}[_A-Za-z][_0-9A-Za-z]* \{{ \.\.\. \}}{q}\?"#
);
pattern!(
    CANNOT_QUERY_FIELD_SINGLE,
    r#"Cannot query field {q}{name}{q} on type {q}{name}{q}\. Did you mean {q}(?P<field>{name}){q}\?"#
);
pattern!(
    CANNOT_QUERY_FIELD_DOUBLE,
    r#"Cannot query field {q}{name}{q} on type {q}{name}{q}\. Did you mean {q}(?P<one>{name}){q} or {q}(?P<two>{name}){q}\?"#
);
pattern!(
    CANNOT_QUERY_FIELD_MULTI,
    r#"Cannot query field {q}{name}{q} on type {q}{name}{q}\. Did you mean (?P<multi>(?:{q}{name}{q}, )+)(?:or {q}(?P<last>{name}){q})?\?"#
);
prefix_pattern!(
    CANNOT_QUERY_FIELD_INVALID,
    r#"Cannot query field {q}(?P<invalid_field>{name}){q}"#
);
pattern!(
    SCALAR_COERCION_NOISE,
    r#"(?:Int|Float|String|ID|Enum|Boolean)[^.]*\.|Not authorized\.?|Expected type {typeref}, found [^.]+\."#
);

// ---- argument suggestions ---------------------------------------------

pattern!(
    ARG_UNKNOWN_ON_FIELD,
    r#"Unknown argument {q}{name}{q} on field {q}{name}{q} of type {q}{name}{q}\."#
);
pattern!(
    ARG_UNKNOWN_ON_FIELD_SHORT,
    r#"Unknown argument {q}{name}{q} on field {q}{name}(?:\.{name})*{q}\."#
);
pattern!(
    ARG_DUPLICATE,
    r#"There can be only one argument named {q}(?P<arg>{typeref}){q}\.?"#
);
pattern!(
    ARG_UNKNOWN_SINGLE,
    r#"Unknown argument {q}{name}{q} on field {q}{name}{q} of type {q}{name}{q}\. Did you mean {q}(?P<arg>{name}){q}\?"#
);
pattern!(
    ARG_UNKNOWN_DOUBLE,
    r#"Unknown argument {q}{name}{q} on field {q}{name}{q} of type {q}{name}{q}\. Did you mean {q}(?P<first>{name}){q} or {q}(?P<second>{name}){q}\?"#
);
pattern!(
    ARG_UNKNOWN_MULTI,
    r#"Unknown argument {q}{name}{q} on field {q}{name}{q} of type {q}{name}{q}\. Did you mean (?P<multi>(?:{q}{name}{q}, )+)(?:or {q}(?P<last>{name}){q})?\?"#
);
prefix_pattern!(
    ARG_UNKNOWN_INVALID,
    r#"Unknown argument {q}(?P<invalid_arg>{name}){q} on field {q}{name}{q}"#
);

// ---- type reference extraction -----------------------------------------

pattern!(
    TYPEREF_FIELD_MUST_HAVE_SELECTION,
    r#"Field {q}{name}{q} of type {q}(?P<typeref>{typeref}){q} must have a selection(?: of subfields)?\. Did you mean {q}[_A-Za-z][_0-9A-Za-z]* \{{ \.\.\. \}}{q}\?"#
);
pattern!(
    TYPEREF_NO_SUBFIELDS,
    r#"Field {q}{name}{q} must not have a selection since type {q}(?P<typeref>{typeref}){q} has no subfields\."#
);
pattern!(
    TYPEREF_CANNOT_QUERY_FIELD,
    r#"Cannot query field {q}{name}{q} on type {q}(?P<typeref>{typeref}){q}\."#
);
pattern!(
    TYPEREF_MUST_NOT_HAVE_SUB_SELECTION,
    r#"Field {q}{name}{q} of type {q}(?P<typeref>{typeref}){q} must not have a sub selection\."#
);
pattern!(
    TYPEREF_ARG_REQUIRED,
    r#"Field {q}{name}{q} argument {q}{name}{q} of type {q}(?P<typeref>{typeref}){q} is {required}"#
);
pattern!(
    TYPEREF_EXPECTED_TYPE,
    r#"Expected type (?P<typeref>{typeref}), found [^.]+\."#
);

// ---- typename extraction -----------------------------------------------

pattern!(
    TYPENAME_CANNOT_QUERY_FIELD,
    r#"Cannot query field {q}{name}{q} on type {q}(?P<typename>{typeref}){q}\."#
);
pattern!(
    TYPENAME_NO_SUBFIELDS,
    r#"Field {q}{name}{q} must not have a selection since type {q}(?P<typename>{typeref}){q} has no subfields\."#
);
pattern!(
    TYPENAME_MUST_NOT_HAVE_SUB_SELECTION,
    r#"Field {q}{name}{q} of type {q}(?P<typename>{typeref}){q} must not have a sub selection\."#
);

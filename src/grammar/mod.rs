//! Classifies validator error-message text into schema facts: valid field
//! and argument name suggestions, type references, and containing-type names.

mod classify;
mod patterns;

pub use classify::FuzzingContext;
pub use classify::classify_arg_error;
pub use classify::classify_field_error;
pub use classify::extract_typename;
pub use classify::extract_typeref;
pub use classify::find_duplicate_arg;
pub use classify::find_invalid_arg;
pub use classify::find_invalid_field;
pub use patterns::VALID_NAME;

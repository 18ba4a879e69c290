mod model;

pub use model::BUILTIN_SCALARS;
pub use model::Field;
pub use model::InputValue;
pub use model::Schema;
pub use model::Type;
pub use model::TypeRef;

//! Descriptor definitions: what a type says about itself, and what it resolves to

mod kind;
pub use kind::*;

mod field;
pub use field::*;

mod vtable;
pub use vtable::*;

mod description;
pub use description::*;

mod descriptor;
pub use descriptor::*;

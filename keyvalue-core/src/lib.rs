#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

#[cfg(not(feature = "alloc"))]
compile_error!("keyvalue-core needs the `alloc` feature");

extern crate alloc;

mod macros;

// Opaque pointer utilities
mod ptr;
pub use ptr::*;

// Type identities
mod identity;
pub use identity::*;

// Descriptor definitions
mod types;
pub use types::*;

// Dynamically typed values
mod value;
pub use value::*;

// Reference records
mod obj;
pub use obj::*;

// Polymorphic containers
mod erased;
pub use erased::*;

// Definitions for `core::` types
mod impls_core;

// Definitions for `alloc::` types
mod impls_alloc;

/// Gives access to the static [`TypeDescription`] of a type, which the metadata
/// cache resolves into a [`TypeDescriptor`] listing every stored field.
///
/// Implement it with the [`reflect!`] macro rather than by hand.
///
/// # Safety
///
/// Key-value access reads and writes memory purely on the strength of the
/// description. Every field offset must point at a value of exactly the
/// field's declared type, within the payload, and a declared base must sit at
/// offset 0 of the payload.
pub unsafe trait Reflect: Clone + 'static {
    /// The description of this type
    const DESCRIPTION: &'static TypeDescription;

    /// Overwrites `slot` with `value` if `value` can be stored in a `Self`,
    /// handing `value` back untouched otherwise.
    ///
    /// By default only a value of exactly `Self` is accepted.
    fn assign_from(slot: &mut Self, value: Value) -> Result<(), Value> {
        *slot = value.downcast::<Self>()?;
        Ok(())
    }
}

/// Infers the identity of a field's type from a projection closure
#[doc(hidden)]
pub const fn identity_of<TRecord, TField: Reflect>(
    _f: &dyn Fn(&TRecord) -> &TField,
) -> TypeIdentity {
    TypeIdentity::of::<TField>()
}

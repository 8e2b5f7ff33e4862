use alloc::{string::String, string::ToString, vec::Vec};

use crate::{FieldDescriptor, TypeDescription, TypeIdentity, TypeKind, ValueVTable};

/// Resolved, immutable shape metadata of one concrete type.
///
/// Descriptors are produced once per type by the metadata cache and never change
/// afterwards. Unlike a [`TypeDescription`], a descriptor carries the full field
/// list, inherited fields included, and a rendered name.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct TypeDescriptor {
    /// Identity of the described type
    pub identity: TypeIdentity,

    /// Representation class
    pub kind: TypeKind,

    /// Display name, with generic parameters
    pub name: String,

    /// Size in bytes of a slot holding a value of this type
    pub size: usize,

    /// Size in bytes of the storage field offsets are relative to
    pub payload_size: usize,

    /// Inherited fields first, then the type's own fields, each group in declaration order
    pub fields: Vec<FieldDescriptor>,

    /// Value operations; absent when nothing describes the type
    pub vtable: Option<ValueVTable>,
}

impl TypeDescriptor {
    /// Assembles a descriptor from a description and its complete field list
    pub fn new(description: &TypeDescription, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            identity: description.identity,
            kind: description.kind,
            name: description.display_name().to_string(),
            size: description.layout.size(),
            payload_size: description.payload_layout.size(),
            fields,
            vtable: Some(description.vtable),
        }
    }

    /// A descriptor for a type nothing describes: no fields, no value operations
    pub fn degenerate(identity: TypeIdentity) -> Self {
        let name = identity.type_name();
        Self {
            identity,
            kind: TypeKind::guess(name),
            name: name.to_string(),
            size: identity.layout().size(),
            payload_size: 0,
            fields: Vec::new(),
            vtable: None,
        }
    }

    /// Returns true unless this is a degenerate descriptor
    #[inline]
    pub fn is_described(&self) -> bool {
        self.vtable.is_some()
    }

    /// Looks a field up by exact name.
    ///
    /// When a derived type redeclares a base field's name, the most-derived field wins.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().rev().find(|field| field.name == name)
    }

    /// Returns true if the descriptor describes `T`
    #[inline]
    pub fn is_type<T: 'static>(&self) -> bool {
        self.identity.is::<T>()
    }
}

impl core::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

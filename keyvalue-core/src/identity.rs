use core::{alloc::Layout, any::TypeId, fmt, hash::Hash};

use crate::{Reflect, TypeDescription};

/// Identity of a concrete Rust type, usable as a key for metadata lookups.
///
/// Two identities are equal iff they name the same [`TypeId`]. Besides the id,
/// an identity remembers the type's layout and diagnostic name, and, for types
/// implementing [`Reflect`], how to reach the type's static description.
#[derive(Clone, Copy)]
pub struct TypeIdentity {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    layout: Layout,
    description: Option<fn() -> &'static TypeDescription>,
}

impl TypeIdentity {
    /// Identity of a reflected type, linked to its description
    pub const fn of<T: Reflect>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
            layout: Layout::new::<T>(),
            description: Some(description_of::<T>),
        }
    }

    /// Identity of a type nothing describes.
    ///
    /// Metadata lookups for such an identity produce a degenerate descriptor
    /// with no fields.
    pub const fn opaque<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
            layout: Layout::new::<T>(),
            description: None,
        }
    }

    /// The [`TypeId`] behind this identity
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// The compiler-provided name of the type, for diagnostics only
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Size and alignment of a value of this type
    #[inline]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// The static description of the type, if it has one
    #[inline]
    pub fn description(&self) -> Option<&'static TypeDescription> {
        self.description.map(|description| description())
    }

    /// Returns true if this identity names `T`
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }
}

fn description_of<T: Reflect>() -> &'static TypeDescription {
    T::DESCRIPTION
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeIdentity")
            .field(&self.type_name())
            .finish()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

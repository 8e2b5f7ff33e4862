use core::alloc::Layout;

use crate::{FieldDescriptor, Reflect, TypeIdentity, TypeKind, ValueVTable};

/// Writes the display name of a type
pub type TypeNameFn = fn(f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result;

/// What a type declares about itself: the raw material the metadata cache
/// resolves into a [`crate::TypeDescriptor`].
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct TypeDescription {
    /// Identity of the described type
    pub identity: TypeIdentity,

    /// Representation class of the type
    pub kind: TypeKind,

    /// Display name, with generic parameters
    pub name: TypeNameFn,

    /// Layout of a slot holding a value of this type
    pub layout: Layout,

    /// Layout of the storage `fields` offsets are relative to.
    ///
    /// Same as `layout` for value records; the heap payload for reference records.
    pub payload_layout: Layout,

    /// The type whose fields this one inherits. The base must sit at offset 0 of the payload.
    pub base: Option<TypeIdentity>,

    /// Fields declared by this type itself, in declaration order
    pub fields: &'static [FieldDescriptor],

    /// Clone-out and assign-in operations
    pub vtable: ValueVTable,
}

impl TypeDescription {
    /// Returns a builder for the description of `T`
    pub const fn builder<T: Reflect>() -> TypeDescriptionBuilder {
        TypeDescriptionBuilder::new::<T>()
    }

    /// Returns a displayable version of the type name
    pub fn display_name(&self) -> impl core::fmt::Display + '_ {
        struct DisplayName(TypeNameFn);

        impl core::fmt::Display for DisplayName {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                (self.0)(f)
            }
        }

        DisplayName(self.name)
    }
}

/// Builder for [`TypeDescription`]
pub struct TypeDescriptionBuilder {
    identity: TypeIdentity,
    kind: Option<TypeKind>,
    name: Option<TypeNameFn>,
    layout: Layout,
    payload_layout: Option<Layout>,
    base: Option<TypeIdentity>,
    fields: &'static [FieldDescriptor],
    vtable: ValueVTable,
}

impl TypeDescriptionBuilder {
    /// Creates a builder with the identity, layout and vtable of `T`
    pub const fn new<T: Reflect>() -> Self {
        Self {
            identity: TypeIdentity::of::<T>(),
            kind: None,
            name: None,
            layout: Layout::new::<T>(),
            payload_layout: None,
            base: None,
            fields: &[],
            vtable: ValueVTable::of::<T>(),
        }
    }

    /// Sets the representation class
    pub const fn kind(mut self, kind: TypeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Shorthand for `kind(TypeKind::ValueRecord)`
    pub const fn value_record(self) -> Self {
        self.kind(TypeKind::ValueRecord)
    }

    /// Shorthand for `kind(TypeKind::ReferenceRecord)`
    pub const fn reference_record(self) -> Self {
        self.kind(TypeKind::ReferenceRecord)
    }

    /// Shorthand for `kind(TypeKind::PolymorphicContainer)`
    pub const fn polymorphic_container(self) -> Self {
        self.kind(TypeKind::PolymorphicContainer)
    }

    /// Sets the display name function
    pub const fn name(mut self, name: TypeNameFn) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the layout of the storage field offsets are relative to
    pub const fn payload_layout(mut self, layout: Layout) -> Self {
        self.payload_layout = Some(layout);
        self
    }

    /// Sets the base type
    pub const fn base(mut self, base: Option<TypeIdentity>) -> Self {
        self.base = base;
        self
    }

    /// Sets the fields declared by the type itself
    pub const fn fields(mut self, fields: &'static [FieldDescriptor]) -> Self {
        self.fields = fields;
        self
    }

    /// Builds the TypeDescription
    pub const fn build(self) -> TypeDescription {
        TypeDescription {
            identity: self.identity,
            kind: self.kind.expect("type kind is required"),
            name: self.name.expect("type name is required"),
            layout: self.layout,
            payload_layout: match self.payload_layout {
                Some(layout) => layout,
                None => self.layout,
            },
            base: self.base,
            fields: self.fields,
            vtable: self.vtable,
        }
    }
}

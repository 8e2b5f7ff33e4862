use bitflags::bitflags;

use crate::TypeIdentity;

/// Describes a stored field of a record
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub struct FieldDescriptor {
    /// name of the field, unique within the type that declares it
    pub name: &'static str,

    /// offset of the field from the start of the payload (obtained through `core::mem::offset_of`)
    pub offset: usize,

    /// identity of the field's type.
    ///
    /// This is a lookup key only: the field's own descriptor is resolved lazily
    /// through the metadata cache, so recursive type graphs never need eager resolution.
    pub field_type: TypeIdentity,

    /// how the field holds on to a referenced record
    pub ownership: Ownership,

    /// flags for the field (mutability, inheritance)
    pub flags: FieldFlags,
}

impl FieldDescriptor {
    /// Returns a builder for FieldDescriptor
    pub const fn builder() -> FieldDescriptorBuilder {
        FieldDescriptorBuilder::new()
    }

    /// Returns true if the field is declared as writable.
    ///
    /// The accessor writes read-only fields too; this only states intent.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        self.flags.contains(FieldFlags::MUTABLE)
    }

    /// Returns true if the field was copied from a base type during resolution
    #[inline]
    pub fn is_inherited(&self) -> bool {
        self.flags.contains(FieldFlags::INHERITED)
    }

    /// Returns true if the field owns its referent
    #[inline]
    pub fn is_strong(&self) -> bool {
        self.ownership == Ownership::Strong
    }

    /// Same field, marked as inherited from a base type
    pub const fn inherited(mut self) -> Self {
        self.flags = self.flags.union(FieldFlags::INHERITED);
        self
    }
}

/// Ownership strength of a field that refers to a reference record
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[non_exhaustive]
pub enum Ownership {
    /// The field shares ownership of its referent
    #[default]
    Strong,
    /// The field observes its referent without keeping it alive, and may observe its absence
    Weak,
    /// The field observes its referent without keeping it alive, and assumes it is alive
    Unowned,
}

bitflags! {
    /// Flags that can be applied to fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// An empty set of flags
        const EMPTY = 0;

        /// The field is declared writable
        const MUTABLE = 1 << 0;

        /// The field belongs to a base type and was merged into a derived descriptor
        const INHERITED = 1 << 1;
    }
}

impl Default for FieldFlags {
    #[inline(always)]
    fn default() -> Self {
        Self::MUTABLE
    }
}

impl core::fmt::Display for FieldFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let flags = [
            (FieldFlags::MUTABLE, "mutable"),
            (FieldFlags::INHERITED, "inherited"),
        ];

        let mut is_first = true;
        for (flag, name) in flags {
            if self.contains(flag) {
                if !is_first {
                    write!(f, ", ")?;
                }
                is_first = false;
                write!(f, "{name}")?;
            }
        }

        Ok(())
    }
}

/// Builder for FieldDescriptor
pub struct FieldDescriptorBuilder {
    name: Option<&'static str>,
    offset: Option<usize>,
    field_type: Option<TypeIdentity>,
    ownership: Ownership,
    flags: FieldFlags,
}

impl FieldDescriptorBuilder {
    /// Creates a new FieldDescriptorBuilder for a mutable, strong field
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            name: None,
            offset: None,
            field_type: None,
            ownership: Ownership::Strong,
            flags: FieldFlags::MUTABLE,
        }
    }

    /// Sets the name for the field
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the offset for the field
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the type identity of the field
    pub const fn field_type(mut self, field_type: TypeIdentity) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the ownership strength of the field
    pub const fn ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Marks the field as read-only
    pub const fn readonly(mut self) -> Self {
        self.flags = self.flags.difference(FieldFlags::MUTABLE);
        self
    }

    /// Marks the field as a weak reference
    pub const fn weak(self) -> Self {
        self.ownership(Ownership::Weak)
    }

    /// Marks the field as an unowned reference
    pub const fn unowned(self) -> Self {
        self.ownership(Ownership::Unowned)
    }

    /// Builds the FieldDescriptor
    pub const fn build(self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name.expect("field name is required"),
            offset: self.offset.expect("field offset is required"),
            field_type: self.field_type.expect("field type is required"),
            ownership: self.ownership,
            flags: self.flags,
        }
    }
}

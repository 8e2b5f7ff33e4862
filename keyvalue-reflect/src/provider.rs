use keyvalue_core::{TypeDescription, TypeIdentity};

/// Supplies the static description of a type, the raw material of a
/// [`crate::TypeDescriptor`].
///
/// A provider that returns `None` makes the cache fall back to a degenerate
/// descriptor: no fields, kind guessed from the type name.
pub trait DescriptorProvider: Send + Sync {
    /// Describes the type behind `identity`, if it can
    fn describe(&self, identity: TypeIdentity) -> Option<&'static TypeDescription>;
}

/// Follows the link every [`keyvalue_core::Reflect`] identity carries to its
/// type's `DESCRIPTION`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticProvider;

impl DescriptorProvider for StaticProvider {
    fn describe(&self, identity: TypeIdentity) -> Option<&'static TypeDescription> {
        identity.description()
    }
}

impl<P: DescriptorProvider + ?Sized> DescriptorProvider for alloc::sync::Arc<P> {
    fn describe(&self, identity: TypeIdentity) -> Option<&'static TypeDescription> {
        (**self).describe(identity)
    }
}

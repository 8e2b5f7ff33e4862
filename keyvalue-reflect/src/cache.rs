use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::any::TypeId;
use std::sync::{LazyLock, OnceLock};

use dashmap::DashMap;
use keyvalue_core::{FieldDescriptor, TypeDescription, TypeDescriptor, TypeIdentity};

use crate::{DescriptorProvider, StaticProvider};

type Slot = Arc<OnceLock<&'static TypeDescriptor>>;

/// Resolves type identities into [`TypeDescriptor`]s, once per identity.
///
/// Descriptors are leaked on first resolution and live for the rest of the
/// process, so the references handed out never dangle. Lookups for different
/// identities proceed in parallel; concurrent lookups for the same identity
/// wait for a single resolution.
pub struct MetadataCache {
    provider: Box<dyn DescriptorProvider>,
    slots: DashMap<TypeId, Slot>,
}

impl MetadataCache {
    /// A cache over the [`StaticProvider`]
    pub fn new() -> Self {
        Self::with_provider(StaticProvider)
    }

    /// A cache over a custom provider
    pub fn with_provider(provider: impl DescriptorProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            slots: DashMap::new(),
        }
    }

    /// The process-wide cache used by the free functions of this crate
    pub fn shared() -> &'static MetadataCache {
        static SHARED: LazyLock<MetadataCache> = LazyLock::new(MetadataCache::new);
        &SHARED
    }

    /// Returns the descriptor of `identity`, resolving it on first request.
    ///
    /// Never fails: a type the provider cannot describe gets a degenerate
    /// descriptor.
    pub fn resolve(&self, identity: TypeIdentity) -> &'static TypeDescriptor {
        // the shard lock is released before the slot is initialized, so
        // resolving a base type from inside a resolution cannot deadlock
        let slot: Slot = self
            .slots
            .entry(identity.type_id())
            .or_default()
            .value()
            .clone();
        *slot.get_or_init(|| self.compute(identity))
    }

    /// Number of identities requested so far
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing was requested yet
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn compute(&self, identity: TypeIdentity) -> &'static TypeDescriptor {
        let descriptor = match self.provider.describe(identity) {
            Some(description) => {
                let fields = self.merge_fields(description);
                let descriptor = TypeDescriptor::new(description, fields);
                debug!(
                    "resolved {} ({}, {} fields)",
                    descriptor.name,
                    descriptor.kind,
                    descriptor.fields.len()
                );
                descriptor
            }
            None => {
                let descriptor = TypeDescriptor::degenerate(identity);
                debug!(
                    "no description for {}, treating it as a fieldless {}",
                    identity, descriptor.kind
                );
                descriptor
            }
        };
        Box::leak(Box::new(descriptor))
    }

    /// Inherited fields first, then the type's own fields that lie within its payload
    fn merge_fields(&self, description: &TypeDescription) -> Vec<FieldDescriptor> {
        let mut fields = Vec::with_capacity(description.fields.len());

        if let Some(base) = description.base {
            let base = self.resolve(base);
            fields.extend(base.fields.iter().map(|field| field.inherited()));
        }

        let payload_size = description.payload_layout.size();
        fields.extend(description.fields.iter().copied().filter(|field| {
            let fits = field
                .offset
                .checked_add(field.field_type.layout().size())
                .is_some_and(|end| end <= payload_size);
            if !fits {
                debug!(
                    "dropping field {} of {}: offset {} is outside the payload",
                    field.name,
                    description.display_name(),
                    field.offset
                );
            }
            fits
        }));

        fields
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("resolved", &self.slots.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyvalue_core::{TypeKind, reflect};

    #[derive(Clone)]
    struct Point {
        x: i32,
        y: i32,
    }

    reflect!(Point { x, y });

    #[test]
    fn resolves_once_per_identity() {
        let cache = MetadataCache::new();
        let first = cache.resolve(TypeIdentity::of::<Point>());
        let second = cache.resolve(TypeIdentity::of::<Point>());
        assert!(core::ptr::eq(first, second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.kind, TypeKind::ValueRecord);
        assert_eq!(first.fields.len(), 2);
        assert_eq!(first.name, "Point");
    }

    #[test]
    fn drops_fields_outside_the_payload() {
        static OUT_OF_RANGE: [FieldDescriptor; 2] = [
            FieldDescriptor::builder()
                .name("x")
                .offset(0)
                .field_type(TypeIdentity::of::<i32>())
                .build(),
            FieldDescriptor::builder()
                .name("z")
                .offset(64)
                .field_type(TypeIdentity::of::<i32>())
                .build(),
        ];
        let description = TypeDescription::builder::<Point>()
            .name(|f| f.write_str("Point"))
            .value_record()
            .fields(&OUT_OF_RANGE)
            .build();

        let cache = MetadataCache::new();
        let fields = cache.merge_fields(&description);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "x");
    }

    #[test]
    fn undescribed_identity_is_degenerate() {
        let cache = MetadataCache::new();
        let descriptor = cache.resolve(TypeIdentity::opaque::<std::sync::Arc<u8>>());
        assert!(!descriptor.is_described());
        assert!(descriptor.fields.is_empty());
        assert_eq!(descriptor.kind, TypeKind::ReferenceRecord);
    }
}

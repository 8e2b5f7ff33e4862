use std::sync::{
    Arc, Barrier,
    atomic::{AtomicUsize, Ordering},
};

use keyvalue_core::{Erased, Obj, TypeDescription, TypeIdentity, TypeKind, reflect};
use keyvalue_reflect::{DescriptorProvider, MetadataCache, StaticProvider};

#[derive(Clone)]
struct Account {
    id: i64,
    owner: String,
}

reflect!(Account { id, owner });

#[derive(Clone)]
#[repr(C)]
struct Premium {
    account: Account,
    owner: Option<String>,
    promo_code: i64,
}

reflect!(Premium extends Account as account { owner, promo_code });

/// Counts how often each resolution reaches the provider
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

impl DescriptorProvider for CountingProvider {
    fn describe(&self, identity: TypeIdentity) -> Option<&'static TypeDescription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StaticProvider.describe(identity)
    }
}

#[keyvalue_testhelpers::test(log = debug)]
fn concurrent_requests_resolve_once() {
    const THREADS: usize = 8;

    let provider = Arc::new(CountingProvider::default());
    let cache = MetadataCache::with_provider(Arc::clone(&provider));
    let barrier = Barrier::new(THREADS);

    let descriptors: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    let descriptor = cache.resolve(TypeIdentity::of::<Account>());
                    core::ptr::from_ref(descriptor) as usize
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert!(descriptors.windows(2).all(|pair| pair[0] == pair[1]));
}

#[keyvalue_testhelpers::test]
fn distinct_types_resolve_independently() {
    let provider = Arc::new(CountingProvider::default());
    let cache = MetadataCache::with_provider(Arc::clone(&provider));

    std::thread::scope(|scope| {
        scope.spawn(|| cache.resolve(TypeIdentity::of::<Account>()));
        scope.spawn(|| cache.resolve(TypeIdentity::of::<i64>()));
        scope.spawn(|| cache.resolve(TypeIdentity::of::<String>()));
    });

    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len(), 3);
}

#[keyvalue_testhelpers::test]
fn inherited_fields_come_first() {
    let cache = MetadataCache::new();
    let descriptor = cache.resolve(TypeIdentity::of::<Premium>());

    let names: Vec<&str> = descriptor.fields.iter().map(|field| field.name).collect();
    assert_eq!(names, ["id", "owner", "owner", "promo_code"]);
    assert!(descriptor.fields[0].is_inherited());
    assert!(descriptor.fields[1].is_inherited());
    assert!(!descriptor.fields[2].is_inherited());
}

#[keyvalue_testhelpers::test]
fn most_derived_field_wins() {
    let cache = MetadataCache::new();
    let descriptor = cache.resolve(TypeIdentity::of::<Premium>());

    let owner = descriptor.field("owner").unwrap();
    assert!(!owner.is_inherited());
    assert_eq!(owner.field_type, TypeIdentity::of::<Option<String>>());
}

#[keyvalue_testhelpers::test]
fn handles_resolve_with_payload_fields() {
    let cache = MetadataCache::new();
    let descriptor = cache.resolve(TypeIdentity::of::<Obj<Premium>>());

    assert_eq!(descriptor.kind, TypeKind::ReferenceRecord);
    assert_eq!(descriptor.size, size_of::<usize>());
    assert_eq!(descriptor.payload_size, size_of::<Premium>());
    assert_eq!(descriptor.fields.len(), 4);
    assert_eq!(descriptor.name, "Obj<Premium>");
}

#[keyvalue_testhelpers::test]
fn handles_to_handles_keep_their_fields_behind_the_inner_handle() {
    let cache = MetadataCache::new();

    let nested = cache.resolve(TypeIdentity::of::<Obj<Obj<Premium>>>());
    assert_eq!(nested.kind, TypeKind::ReferenceRecord);
    assert_eq!(nested.payload_size, size_of::<Obj<Premium>>());
    assert!(nested.fields.is_empty());

    let boxed = cache.resolve(TypeIdentity::of::<Obj<Erased>>());
    assert_eq!(boxed.payload_size, size_of::<Erased>());
    assert!(boxed.fields.is_empty());
}

#[keyvalue_testhelpers::test]
fn shared_cache_is_one_instance() {
    assert!(core::ptr::eq(MetadataCache::shared(), MetadataCache::shared()));
    let first = MetadataCache::shared().resolve(TypeIdentity::of::<Account>());
    let second = keyvalue_reflect::metadata_of::<Account>();
    assert!(core::ptr::eq(first, second));
}

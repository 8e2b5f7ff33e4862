use keyvalue_core::{Erased, INLINE_CAPACITY, Obj, PayloadStorage, TypeIdentity, Value, Reflect};

#[derive(Clone, Debug, PartialEq)]
struct Small {
    a: u64,
    b: u64,
}

#[derive(Clone, Debug, PartialEq)]
struct Large {
    words: [u64; 8],
}

keyvalue_core::reflect!(Small { a, b });

unsafe impl Reflect for Large {
    const DESCRIPTION: &'static keyvalue_core::TypeDescription = &const {
        keyvalue_core::TypeDescription::builder::<Self>()
            .name(|f| f.write_str("Large"))
            .value_record()
            .build()
    };
}

#[keyvalue_testhelpers::test]
fn representation_follows_size() {
    assert_eq!(INLINE_CAPACITY, 3 * size_of::<usize>());

    let small = Erased::new(Small { a: 1, b: 2 });
    assert!(small.is_inline());
    assert!(matches!(small.storage(), PayloadStorage::Inline(_)));

    let large = Erased::new(Large { words: [3; 8] });
    assert!(!large.is_inline());
    assert!(matches!(large.storage(), PayloadStorage::Indirect(_)));

    // the same wrapped type always picks the same representation
    assert_eq!(
        Erased::new(Large { words: [0; 8] }).is_inline(),
        large.is_inline()
    );
}

#[keyvalue_testhelpers::test]
fn downcast_checks_the_tag() {
    let erased = Erased::new(Large { words: [5; 8] });
    assert_eq!(erased.type_identity(), TypeIdentity::of::<Large>());
    assert_eq!(erased.downcast_ref::<Large>().map(|l| l.words[7]), Some(5));
    assert!(erased.downcast_ref::<Small>().is_none());
}

#[keyvalue_testhelpers::test]
fn clones_copy_inline_and_share_boxed_payloads() {
    let small = Erased::new(Small { a: 1, b: 2 });
    let small_copy = small.clone();
    assert_ne!(
        small.payload_ptr().as_byte_ptr(),
        small_copy.payload_ptr().as_byte_ptr()
    );
    assert_eq!(small_copy.downcast_ref::<Small>(), Some(&Small { a: 1, b: 2 }));

    let large = Erased::new(Large { words: [1; 8] });
    let large_copy = large.clone();
    assert_eq!(
        large.payload_ptr().as_byte_ptr(),
        large_copy.payload_ptr().as_byte_ptr()
    );
}

#[keyvalue_testhelpers::test]
fn drops_inline_payloads() {
    let object = Obj::new(Small { a: 1, b: 1 });
    let erased = Erased::new(object.clone());
    assert!(erased.is_inline());
    assert_eq!(Obj::strong_count(&object), 2);

    drop(erased);
    assert_eq!(Obj::strong_count(&object), 1);
}

#[keyvalue_testhelpers::test]
fn assignment_wraps_any_value() {
    let mut slot = Erased::new(0_i64);

    Erased::assign_from(&mut slot, Value::new("hello".to_string())).unwrap();
    assert_eq!(slot.downcast_ref::<String>().map(String::as_str), Some("hello"));

    Erased::assign_from(&mut slot, Value::new(Erased::new(true))).unwrap();
    assert_eq!(slot.downcast_ref::<bool>(), Some(&true));
}

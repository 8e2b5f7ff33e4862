use keyvalue_core::{Obj, Reflect, TypeIdentity, TypeKind, reflect};

#[derive(Clone, Debug, PartialEq)]
struct Account {
    id: u64,
    owner: String,
}

reflect!(Account { #[readonly] id, owner });

#[derive(Clone, Debug, PartialEq)]
#[repr(C)]
struct Premium {
    account: Account,
    promo_code: Option<String>,
}

reflect!(Premium extends Account as account { promo_code });

fn premium() -> Premium {
    Premium {
        account: Account {
            id: 7,
            owner: "ada".to_string(),
        },
        promo_code: None,
    }
}

#[keyvalue_testhelpers::test]
fn clones_share_one_object() {
    let first = Obj::new(Account {
        id: 1,
        owner: "ada".to_string(),
    });
    let second = first.clone();

    assert!(Obj::ptr_eq(&first, &second));
    assert_eq!(Obj::strong_count(&first), 2);

    drop(second);
    assert_eq!(Obj::strong_count(&first), 1);
}

#[keyvalue_testhelpers::test]
fn header_records_dynamic_identity() {
    let object = Obj::new(premium());
    assert_eq!(object.dynamic_identity(), TypeIdentity::of::<Obj<Premium>>());

    let base: Obj<Account> = object.upcast();
    assert_eq!(base.dynamic_identity(), TypeIdentity::of::<Obj<Premium>>());
    assert_eq!(base.owner, "ada");
    assert_eq!(base.id, 7);
}

#[keyvalue_testhelpers::test]
fn payload_starts_past_the_header() {
    let object = Obj::new(premium());
    let header = object.as_raw().header();
    assert!(header.payload_offset() >= size_of::<usize>());

    let payload = object.as_raw().payload();
    let reread = unsafe { payload.as_const().get::<Premium>() };
    assert_eq!(reread, &*object);
}

#[keyvalue_testhelpers::test]
fn handle_description_mirrors_payload() {
    let description = <Obj<Premium> as Reflect>::DESCRIPTION;
    assert_eq!(description.kind, TypeKind::ReferenceRecord);
    assert_eq!(description.layout.size(), size_of::<usize>());
    assert_eq!(description.payload_layout.size(), size_of::<Premium>());
    assert_eq!(description.base, Some(TypeIdentity::of::<Account>()));
    assert_eq!(description.fields.len(), 1);
    assert_eq!(description.fields[0].name, "promo_code");
    assert_eq!(description.display_name().to_string(), "Obj<Premium>");
}

#[keyvalue_testhelpers::test]
fn field_modifiers_are_recorded() {
    let fields = Account::DESCRIPTION.fields;
    assert_eq!(fields[0].name, "id");
    assert!(!fields[0].is_mutable());
    assert_eq!(fields[0].field_type, TypeIdentity::of::<u64>());
    assert_eq!(fields[1].name, "owner");
    assert!(fields[1].is_mutable());
    assert!(fields[1].is_strong());
}

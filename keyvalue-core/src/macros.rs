/// Implements [`crate::Reflect`] for a struct, describing it as a value record.
///
/// List the fields that key-value paths may reach, in declaration order. Each
/// field may carry modifiers: `#[readonly]`, `#[weak]`, `#[unowned]`.
///
/// A type without reachable fields, such as a fieldless enum, is declared by
/// name alone: `reflect!(Status)`.
///
/// A struct that embeds a base record at offset 0 inherits the base's fields
/// with `Derived extends Base as base_field { .. }`; the placement is checked
/// at compile time, so such structs want `#[repr(C)]`.
///
/// # Example
///
/// ```
/// use keyvalue_core::{Reflect, reflect};
///
/// #[derive(Clone)]
/// struct Account {
///     id: u64,
///     owner: String,
/// }
///
/// reflect!(Account { #[readonly] id, owner });
///
/// #[derive(Clone)]
/// #[repr(C)]
/// struct Premium {
///     account: Account,
///     promo_code: Option<String>,
/// }
///
/// reflect!(Premium extends Account as account { promo_code });
///
/// assert_eq!(Account::DESCRIPTION.fields.len(), 2);
/// assert!(Premium::DESCRIPTION.base.is_some());
/// ```
#[macro_export]
macro_rules! reflect {
    (@impl $ty:ident, $base:expr, { $($(#[$modifier:ident])* $field:ident),* }) => {
        unsafe impl $crate::Reflect for $ty {
            const DESCRIPTION: &'static $crate::TypeDescription = &const {
                $crate::TypeDescription::builder::<Self>()
                    .name(|f| f.write_str(stringify!($ty)))
                    .value_record()
                    .base($base)
                    .fields(&const {
                        [$(
                            $crate::FieldDescriptor::builder()
                                .name(stringify!($field))
                                .offset(::core::mem::offset_of!($ty, $field))
                                .field_type($crate::identity_of(&|value: &$ty| &value.$field))
                                $(.$modifier())*
                                .build()
                        ),*]
                    })
                    .build()
            };
        }
    };

    ($ty:ident extends $base:ty as $base_field:ident { $($(#[$modifier:ident])* $field:ident),* $(,)? }) => {
        const _: () = ::core::assert!(
            ::core::mem::offset_of!($ty, $base_field) == 0,
            concat!(stringify!($ty), " must store its base at offset 0"),
        );
        const _: fn(&$ty) -> &$base = |value| &value.$base_field;

        unsafe impl $crate::Extends<$base> for $ty {}

        $crate::reflect!(@impl $ty, ::core::option::Option::Some($crate::TypeIdentity::of::<$base>()), {
            $($(#[$modifier])* $field),*
        });
    };

    ($ty:ident) => {
        unsafe impl $crate::Reflect for $ty {
            const DESCRIPTION: &'static $crate::TypeDescription = &const {
                $crate::TypeDescription::builder::<Self>()
                    .name(|f| f.write_str(stringify!($ty)))
                    .value_record()
                    .build()
            };
        }
    };

    ($ty:ident { $($(#[$modifier:ident])* $field:ident),* $(,)? }) => {
        $crate::reflect!(@impl $ty, ::core::option::Option::None, {
            $($(#[$modifier])* $field),*
        });
    };
}

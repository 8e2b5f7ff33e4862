//! Free functions over the process-wide [`MetadataCache`]

use keyvalue_core::{PtrConst, Reflect, TypeDescriptor, TypeIdentity, Value};

use crate::{AsKeyPath, KeyValueError, MetadataCache, payload_address};

/// Metadata of the type `T` as declared
pub fn metadata_of<T: Reflect>() -> &'static TypeDescriptor {
    MetadataCache::shared().resolve(TypeIdentity::of::<T>())
}

/// Metadata of the dynamic type of `value`.
///
/// For a reference record this is the type the object was created as, which
/// may derive from `T`; for a polymorphic container it is the type of the
/// wrapped value.
pub fn metadata_of_val<T: Reflect>(value: &T) -> &'static TypeDescriptor {
    let cache = MetadataCache::shared();
    let declared = cache.resolve(TypeIdentity::of::<T>());
    let address = PtrConst::new(core::ptr::from_ref(value));
    match unsafe { payload_address(cache, address, declared) } {
        Ok((_, dynamic)) => dynamic,
        Err(_) => declared,
    }
}

/// Returns the value of the field `key` names in `instance`.
///
/// `key` is a field name, or a dotted path through nested fields such as
/// `"department.manager.last_name"`. Returns `None` when no such field exists.
///
/// ```
/// use keyvalue_core::reflect;
/// use keyvalue_reflect::get_value;
///
/// #[derive(Clone)]
/// struct Song {
///     name: String,
/// }
///
/// reflect!(Song { name });
///
/// let song = Song { name: "Blue Suede Shoes".to_string() };
/// let name = get_value(&song, "name").and_then(|value| value.downcast::<String>().ok());
/// assert_eq!(name.as_deref(), Some("Blue Suede Shoes"));
/// assert!(get_value(&song, "artist").is_none());
/// ```
pub fn get_value<T: Reflect>(instance: &T, key: impl AsKeyPath<T>) -> Option<Value> {
    MetadataCache::shared().get_value(instance, key)
}

/// Sets the field `key` names in `instance` to `value`.
///
/// Unknown keys and values the field cannot hold are ignored.
pub fn set_value<T: Reflect>(value: impl Into<Value>, instance: &mut T, key: impl AsKeyPath<T>) {
    MetadataCache::shared().set_value(value, instance, key)
}

/// Like [`get_value`], but says why no value was found
pub fn try_get_value<T: Reflect>(
    instance: &T,
    key: impl AsKeyPath<T>,
) -> Result<Value, KeyValueError> {
    MetadataCache::shared().try_get_value(instance, key)
}

/// Like [`set_value`], but says why nothing was written
pub fn try_set_value<T: Reflect>(
    value: impl Into<Value>,
    instance: &mut T,
    key: impl AsKeyPath<T>,
) -> Result<(), KeyValueError> {
    MetadataCache::shared().try_set_value(value, instance, key)
}

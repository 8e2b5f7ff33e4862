#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

pub use keyvalue_core::*;
pub use keyvalue_reflect::*;

/// Key-value access as methods, for every reflected type.
///
/// ```
/// use keyvalue::{KeyValueCoding, reflect};
///
/// #[derive(Clone)]
/// struct Book {
///     title: String,
///     isbn: u64,
/// }
///
/// reflect!(Book { title, isbn });
///
/// let mut book = Book { title: String::new(), isbn: 0 };
/// book.set("title", "Dune".to_string());
/// book.set_value(9780441013593_u64, "isbn");
///
/// assert_eq!(book.get::<String>("title").as_deref(), Some("Dune"));
/// assert_eq!(book.isbn, 9780441013593);
/// assert!(book.value("author").is_none());
/// ```
pub trait KeyValueCoding: Reflect {
    /// Metadata of this value's dynamic type
    fn metadata(&self) -> &'static TypeDescriptor {
        metadata_of_val(self)
    }

    /// Returns the value of the field `key` names, if there is one
    fn value(&self, key: impl AsKeyPath<Self>) -> Option<Value> {
        get_value(self, key)
    }

    /// Sets the field `key` names to `value`. Unknown keys and values the
    /// field cannot hold are ignored.
    fn set_value(&mut self, value: impl Into<Value>, key: impl AsKeyPath<Self>) {
        keyvalue_reflect::set_value(value, self, key)
    }

    /// Returns the value of the field `key` names, if there is one and it is a `V`
    fn get<V: 'static>(&self, key: impl AsKeyPath<Self>) -> Option<V> {
        self.value(key)?.downcast::<V>().ok()
    }

    /// Sets the field `key` names to `value`, like [`KeyValueCoding::set_value`]
    fn set(&mut self, key: impl AsKeyPath<Self>, value: impl Into<Value>) {
        self.set_value(value, key)
    }
}

impl<T: Reflect> KeyValueCoding for T {}

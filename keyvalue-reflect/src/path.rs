use alloc::{string::String, vec::Vec};
use core::{fmt, marker::PhantomData};

use keyvalue_core::Obj;

/// A dotted chain of field names, such as `"department.manager.last_name"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(String);

impl KeyPath {
    /// Separates the segments of a key path
    pub const SEPARATOR: char = '.';

    /// Wraps a dotted key
    pub fn new(key: impl Into<String>) -> Self {
        KeyPath(key.into())
    }

    /// Joins field names into a key path
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut key = String::new();
        for (index, segment) in segments.into_iter().enumerate() {
            if index > 0 {
                key.push(Self::SEPARATOR);
            }
            key.push_str(segment);
        }
        KeyPath(key)
    }

    /// The dotted key
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The field names, first to last. An empty key path has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        segments_of(&self.0)
    }

    /// Returns true if the key path has no segments
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This key path followed by `other`
    pub fn appending(&self, other: &str) -> Self {
        if self.is_empty() {
            return KeyPath::new(other);
        }
        let mut key = self.0.clone();
        key.push(Self::SEPARATOR);
        key.push_str(other);
        KeyPath(key)
    }
}

fn segments_of(key: &str) -> impl Iterator<Item = &str> {
    // an empty key has no segments rather than one empty segment
    key.split(KeyPath::SEPARATOR)
        .filter(move |_| !key.is_empty())
}

/// The accessor walks segments as a stack: the first segment is popped first.
pub(crate) fn segment_stack(key: &str) -> Vec<&str> {
    let mut stack: Vec<&str> = segments_of(key).collect();
    stack.reverse();
    stack
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        KeyPath::new(key)
    }
}

impl From<String> for KeyPath {
    fn from(key: String) -> Self {
        KeyPath(key)
    }
}

impl core::str::FromStr for KeyPath {
    type Err = core::convert::Infallible;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Ok(KeyPath::new(key))
    }
}

/// A key path checked against the fields of `Root` at compile time.
///
/// Built by [`crate::key_path!`]. It renders as the root type's name followed
/// by the field names (`"User.info.phone"`); the key it stands for is that
/// rendering with everything up to and including the first `.` dropped.
pub struct TypedKeyPath<Root> {
    rendered: &'static str,
    root: PhantomData<fn(&Root)>,
}

impl<Root> TypedKeyPath<Root> {
    #[doc(hidden)]
    pub const fn new_unchecked(rendered: &'static str) -> Self {
        Self {
            rendered,
            root: PhantomData,
        }
    }

    /// The full rendering, root type included
    #[inline]
    pub fn rendered(&self) -> &'static str {
        self.rendered
    }

    /// The key this path stands for
    pub fn key(&self) -> &'static str {
        self.rendered
            .split_once(KeyPath::SEPARATOR)
            .map_or("", |(_, key)| key)
    }

    /// The key as an untyped [`KeyPath`]
    pub fn to_key_path(&self) -> KeyPath {
        KeyPath::new(self.key())
    }
}

impl<Root> Clone for TypedKeyPath<Root> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Root> Copy for TypedKeyPath<Root> {}

impl<Root> fmt::Debug for TypedKeyPath<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedKeyPath").field(&self.rendered).finish()
    }
}

impl<Root> fmt::Display for TypedKeyPath<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rendered)
    }
}

/// Anything that names a (possibly nested) field of a `Root`
pub trait AsKeyPath<Root> {
    /// The dotted key
    fn as_key(&self) -> &str;
}

impl<Root> AsKeyPath<Root> for str {
    fn as_key(&self) -> &str {
        self
    }
}

impl<Root> AsKeyPath<Root> for String {
    fn as_key(&self) -> &str {
        self
    }
}

impl<Root> AsKeyPath<Root> for KeyPath {
    fn as_key(&self) -> &str {
        self.as_str()
    }
}

impl<Root> AsKeyPath<Root> for TypedKeyPath<Root> {
    fn as_key(&self) -> &str {
        self.key()
    }
}

// a path typed against a record also walks the record behind a shared handle
impl<Root> AsKeyPath<Obj<Root>> for TypedKeyPath<Root> {
    fn as_key(&self) -> &str {
        self.key()
    }
}

impl<Root, K: AsKeyPath<Root> + ?Sized> AsKeyPath<Root> for &K {
    fn as_key(&self) -> &str {
        (**self).as_key()
    }
}

/// Builds a [`TypedKeyPath`] from a root type and a chain of field names,
/// refusing to compile if the fields do not exist.
///
/// ```
/// use keyvalue_reflect::key_path;
///
/// struct Department {
///     name: String,
/// }
///
/// struct Employee {
///     department: Department,
/// }
///
/// let path = key_path!(Employee.department.name);
/// assert_eq!(path.rendered(), "Employee.department.name");
/// assert_eq!(path.key(), "department.name");
/// ```
#[macro_export]
macro_rules! key_path {
    ($root:ident $(. $field:ident)+) => {{
        let _ = |root: &$root| {
            let _ = &root $(.$field)+;
        };
        $crate::TypedKeyPath::<$root>::new_unchecked(::core::concat!(
            ::core::stringify!($root)
            $(, ".", ::core::stringify!($field))+
        ))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_on_dots() {
        let path = KeyPath::new("department.manager.last_name");
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, ["department", "manager", "last_name"]);
        assert_eq!(segment_stack(path.as_str()), ["last_name", "manager", "department"]);
    }

    #[test]
    fn empty_key_has_no_segments() {
        assert_eq!(KeyPath::default().segments().count(), 0);
        assert!(segment_stack("").is_empty());
        // empty segments in the middle are kept, and never match a field
        assert_eq!(segment_stack("a..b"), ["b", "", "a"]);
    }

    #[test]
    fn joins_and_appends() {
        let path = KeyPath::from_segments(["info", "phone"]);
        assert_eq!(path.as_str(), "info.phone");
        assert_eq!(KeyPath::default().appending("id").as_str(), "id");
        assert_eq!(path.appending("len").to_string(), "info.phone.len");
    }

    #[test]
    fn typed_key_drops_the_root() {
        let path = TypedKeyPath::<()>::new_unchecked("Book.title");
        assert_eq!(path.key(), "title");
        assert_eq!(path.to_key_path(), KeyPath::new("title"));

        let bare = TypedKeyPath::<()>::new_unchecked("Book");
        assert_eq!(bare.key(), "");
    }
}

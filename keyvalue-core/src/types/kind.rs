/// How values of a type are laid out and shared
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TypeKind {
    /// Copied by value; the fields live inline in the slot itself.
    ValueRecord,

    /// Heap-allocated and shared by identity; the slot holds one pointer to the object,
    /// whose dynamic type may be more derived than the declared one.
    ReferenceRecord,

    /// A type-erased wrapper carrying a type tag plus its payload, inline when
    /// small enough and boxed otherwise.
    PolymorphicContainer,
}

impl TypeKind {
    /// Best-effort classification of a type nothing describes, from its name alone
    pub fn guess(type_name: &str) -> Self {
        const SHARED: &[&str] = &[
            "alloc::rc::Rc<",
            "alloc::sync::Arc<",
            "alloc::boxed::Box<",
            "keyvalue_core::obj::Obj<",
        ];
        if type_name.contains("dyn ") {
            TypeKind::PolymorphicContainer
        } else if SHARED.iter().any(|prefix| type_name.starts_with(prefix)) {
            TypeKind::ReferenceRecord
        } else {
            TypeKind::ValueRecord
        }
    }
}

impl core::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TypeKind::ValueRecord => write!(f, "value record"),
            TypeKind::ReferenceRecord => write!(f, "reference record"),
            TypeKind::PolymorphicContainer => write!(f, "polymorphic container"),
        }
    }
}

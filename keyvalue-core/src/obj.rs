//! Heap objects shared by identity
//!
//! A heap object is a single allocation laid out as `[ObjHeader | payload]`.
//! The header records the object's dynamic type and where its payload starts,
//! so code holding nothing but a pointer to the header can find and describe
//! the payload. [`Obj<T>`] is the typed, reference-counted handle to such an
//! object; [`RawObj`] is the same handle with the payload type erased.

use alloc::boxed::Box;
use core::{alloc::Layout, cell::Cell, cell::UnsafeCell, marker::PhantomData, ptr::NonNull};

use crate::{PtrMut, Reflect, TypeDescription, TypeIdentity, TypeKind};

/// Header at the start of every heap object
#[repr(C)]
pub struct ObjHeader {
    strong: Cell<usize>,
    identity: TypeIdentity,
    payload_offset: usize,
    release: unsafe fn(NonNull<ObjHeader>),
}

impl ObjHeader {
    /// Identity stamped on the object when it was allocated.
    ///
    /// This is the dynamic type: it stays the same when a handle is upcast.
    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    /// Distance in bytes from the start of the header to the payload
    #[inline]
    pub fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    /// Number of handles currently keeping the object alive
    #[inline]
    pub fn strong_count(&self) -> usize {
        self.strong.get()
    }
}

#[repr(C)]
struct ObjAlloc<T> {
    header: ObjHeader,
    payload: UnsafeCell<T>,
}

unsafe fn release<T>(header: NonNull<ObjHeader>) {
    drop(unsafe { Box::from_raw(header.as_ptr().cast::<ObjAlloc<T>>()) });
}

/// A strong, type-erased handle to a heap object
#[repr(transparent)]
pub struct RawObj(NonNull<ObjHeader>);

impl RawObj {
    /// Moves `value` into a new heap object stamped with `identity`
    pub fn new<T: 'static>(value: T, identity: TypeIdentity) -> Self {
        let alloc = Box::new(ObjAlloc {
            header: ObjHeader {
                strong: Cell::new(1),
                identity,
                payload_offset: core::mem::offset_of!(ObjAlloc<T>, payload),
                release: release::<T>,
            },
            payload: UnsafeCell::new(value),
        });
        let ptr = NonNull::from(Box::leak(alloc)).cast::<ObjHeader>();
        RawObj(ptr)
    }

    /// The object's header
    #[inline]
    pub fn header(&self) -> &ObjHeader {
        unsafe { self.0.as_ref() }
    }

    /// Pointer to the object's header
    #[inline]
    pub fn as_header_ptr(&self) -> NonNull<ObjHeader> {
        self.0
    }

    /// Pointer to the object's payload.
    ///
    /// Writes through this pointer are visible through every handle to the
    /// object; see [`Obj`] for the aliasing rules.
    #[inline]
    pub fn payload(&self) -> PtrMut<'_> {
        let offset = self.header().payload_offset;
        PtrMut::new(unsafe { self.0.as_ptr().cast::<u8>().add(offset) })
    }

    /// Returns true if both handles refer to the same object
    #[inline]
    pub fn ptr_eq(&self, other: &RawObj) -> bool {
        self.0 == other.0
    }
}

impl Clone for RawObj {
    fn clone(&self) -> Self {
        let strong = &self.header().strong;
        strong.set(strong.get() + 1);
        RawObj(self.0)
    }
}

impl Drop for RawObj {
    fn drop(&mut self) {
        let header = self.header();
        let remaining = header.strong.get() - 1;
        header.strong.set(remaining);
        if remaining == 0 {
            let release = header.release;
            unsafe { release(self.0) };
        }
    }
}

impl core::fmt::Debug for RawObj {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RawObj<{}>@{:p}", self.header().identity, self.0)
    }
}

/// A reference record: a pointer-sized, reference-counted handle to a heap
/// object whose payload is (or starts with) a `T`.
///
/// Cloning an `Obj` shares the object. Key-value writes reached through any
/// handle mutate the shared payload in place, so they are visible through
/// every other handle.
///
/// # Aliasing
///
/// Borrows obtained through [`Deref`](core::ops::Deref) must not be held
/// across a key-value write that reaches the same object through another
/// handle. `Obj` is neither `Send` nor `Sync`, so such writes can only come
/// from the current thread.
#[repr(transparent)]
pub struct Obj<T> {
    raw: RawObj,
    marker: PhantomData<T>,
}

impl<T: Reflect> Obj<T> {
    /// Moves `value` into a new heap object
    pub fn new(value: T) -> Self {
        Obj {
            raw: RawObj::new(value, TypeIdentity::of::<Obj<T>>()),
            marker: PhantomData,
        }
    }
}

impl<T> Obj<T> {
    /// Views this object through the handle type of one of its bases.
    ///
    /// The object keeps its dynamic identity, so metadata lookups through the
    /// returned handle still see every field of `T`.
    pub fn upcast<Base>(self) -> Obj<Base>
    where
        T: Extends<Base>,
    {
        Obj {
            raw: self.raw,
            marker: PhantomData,
        }
    }

    /// The type-erased handle
    #[inline]
    pub fn as_raw(&self) -> &RawObj {
        &self.raw
    }

    /// Identity of the object's dynamic type
    #[inline]
    pub fn dynamic_identity(&self) -> TypeIdentity {
        self.raw.header().identity
    }

    /// Returns true if both handles refer to the same object
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.raw.ptr_eq(&other.raw)
    }

    /// Number of handles keeping the object alive
    #[inline]
    pub fn strong_count(this: &Self) -> usize {
        this.raw.header().strong_count()
    }
}

impl<T> core::ops::Deref for Obj<T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { self.raw.payload().as_const().get::<T>() }
    }
}

impl<T> Clone for Obj<T> {
    fn clone(&self) -> Self {
        Obj {
            raw: self.raw.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: PartialEq> PartialEq for Obj<T> {
    fn eq(&self, other: &Self) -> bool {
        Obj::ptr_eq(self, other) || **self == **other
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Obj<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}

/// Declares that `Self` begins with a `Base` at offset 0, so a pointer to a
/// `Self` payload is also a valid pointer to a `Base` payload.
///
/// # Safety
///
/// `Self` must store a `Base` at offset 0. The `reflect!` macro checks this at
/// compile time when a type is declared with `extends`.
pub unsafe trait Extends<Base> {}

unsafe impl<T: Reflect> Reflect for Obj<T> {
    const DESCRIPTION: &'static TypeDescription = &const {
        let builder = TypeDescription::builder::<Self>()
            .name(|f| write!(f, "Obj<{}>", T::DESCRIPTION.display_name()))
            .reference_record()
            .payload_layout(Layout::new::<T>());
        // a nested handle or container keeps its fields behind another
        // indirection, not in this payload
        match T::DESCRIPTION.kind {
            TypeKind::ValueRecord => builder
                .base(T::DESCRIPTION.base)
                .fields(T::DESCRIPTION.fields)
                .build(),
            TypeKind::ReferenceRecord | TypeKind::PolymorphicContainer => builder.build(),
        }
    };
}

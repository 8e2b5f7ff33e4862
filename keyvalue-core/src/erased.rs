//! Polymorphic containers
//!
//! An [`Erased`] holds a value of any reflected type together with that
//! type's identity. Small values live in an inline buffer; anything else is
//! moved into a heap object with the same `[ObjHeader | payload]` layout
//! [`crate::Obj`] uses, so the payload is always found past the header.

use core::{alloc::Layout, mem::MaybeUninit};

use crate::{PtrConst, PtrMut, RawObj, Reflect, TypeDescription, TypeIdentity, Value};

/// Size in bytes of the inline buffer of an [`Erased`]: three machine words
pub const INLINE_CAPACITY: usize = 3 * size_of::<usize>();

/// Word-aligned inline storage of an [`Erased`]
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct InlineBuffer([MaybeUninit<usize>; 3]);

impl InlineBuffer {
    const fn uninit() -> Self {
        InlineBuffer([MaybeUninit::uninit(); 3])
    }

    /// Pointer to the start of the buffer
    #[inline]
    pub fn as_ptr(&self) -> PtrConst<'_> {
        PtrConst::new(self.0.as_ptr())
    }

    /// Mutable pointer to the start of the buffer
    #[inline]
    pub fn as_mut_ptr(&mut self) -> PtrMut<'_> {
        PtrMut::new(self.0.as_mut_ptr())
    }
}

/// Where an [`Erased`] keeps its payload
pub enum PayloadStorage {
    /// The payload sits at the start of the buffer
    Inline(InlineBuffer),

    /// The payload sits in a heap object, past its header
    Indirect(RawObj),
}

/// A value of any reflected type, tagged with that type's identity.
///
/// Where the payload lives decides what a clone sees. Values that
/// [fit inline](Erased::fits_inline) are copied by [`Clone`], so writing to
/// a field through one container leaves its clones untouched. Larger values
/// are boxed, and the box is shared by every clone, so a write through one
/// container is visible through all of them. The choice depends only on the
/// wrapped type's layout; growing a type past [`INLINE_CAPACITY`] turns copy
/// semantics into shared semantics.
pub struct Erased {
    storage: PayloadStorage,
    identity: TypeIdentity,
    clone_inline: unsafe fn(&InlineBuffer) -> InlineBuffer,
    drop_inline: unsafe fn(&mut InlineBuffer),
}

impl Erased {
    /// Wraps `value`, inline if [`Erased::fits_inline`] allows it
    pub fn new<T: Reflect>(value: T) -> Self {
        let identity = TypeIdentity::of::<T>();
        let storage = if Self::fits_inline(Layout::new::<T>()) {
            let mut buffer = InlineBuffer::uninit();
            unsafe { buffer.as_mut_ptr().as_mut_byte_ptr().cast::<T>().write(value) };
            PayloadStorage::Inline(buffer)
        } else {
            PayloadStorage::Indirect(RawObj::new(value, identity))
        };
        Self {
            storage,
            identity,
            clone_inline: clone_inline::<T>,
            drop_inline: drop_inline::<T>,
        }
    }

    /// Returns true if values of this layout are stored inline
    #[inline]
    pub const fn fits_inline(layout: Layout) -> bool {
        layout.size() <= INLINE_CAPACITY && layout.align() <= align_of::<usize>()
    }

    /// Identity of the wrapped value's type
    #[inline]
    pub fn type_identity(&self) -> TypeIdentity {
        self.identity
    }

    /// Where the payload is kept
    #[inline]
    pub fn storage(&self) -> &PayloadStorage {
        &self.storage
    }

    /// Returns true if the payload sits in the inline buffer
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, PayloadStorage::Inline(_))
    }

    /// Pointer to the wrapped value
    pub fn payload_ptr(&self) -> PtrConst<'_> {
        match &self.storage {
            PayloadStorage::Inline(buffer) => buffer.as_ptr(),
            PayloadStorage::Indirect(raw) => raw.payload().as_const(),
        }
    }

    /// Mutable pointer to the wrapped value.
    ///
    /// A boxed payload is shared with every clone of this container, and
    /// writes through the pointer reach all of them.
    pub fn payload_ptr_mut(&mut self) -> PtrMut<'_> {
        match &mut self.storage {
            PayloadStorage::Inline(buffer) => buffer.as_mut_ptr(),
            PayloadStorage::Indirect(raw) => raw.payload(),
        }
    }

    /// Borrows the wrapped value as a `T`, if it is one
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.identity.is::<T>() {
            Some(unsafe { self.payload_ptr().get::<T>() })
        } else {
            None
        }
    }
}

unsafe fn clone_inline<T: Clone>(buffer: &InlineBuffer) -> InlineBuffer {
    let mut copy = InlineBuffer::uninit();
    let value = unsafe { buffer.as_ptr().get::<T>() }.clone();
    unsafe { copy.as_mut_ptr().as_mut_byte_ptr().cast::<T>().write(value) };
    copy
}

unsafe fn drop_inline<T>(buffer: &mut InlineBuffer) {
    unsafe { core::ptr::drop_in_place(buffer.as_mut_ptr().as_mut_byte_ptr().cast::<T>()) };
}

impl Clone for Erased {
    fn clone(&self) -> Self {
        let storage = match &self.storage {
            PayloadStorage::Inline(buffer) => {
                PayloadStorage::Inline(unsafe { (self.clone_inline)(buffer) })
            }
            PayloadStorage::Indirect(raw) => PayloadStorage::Indirect(raw.clone()),
        };
        Self {
            storage,
            identity: self.identity,
            clone_inline: self.clone_inline,
            drop_inline: self.drop_inline,
        }
    }
}

impl Drop for Erased {
    fn drop(&mut self) {
        if let PayloadStorage::Inline(buffer) = &mut self.storage {
            unsafe { (self.drop_inline)(buffer) };
        }
    }
}

impl core::fmt::Debug for Erased {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let place = if self.is_inline() { "inline" } else { "boxed" };
        write!(f, "Erased<{}>({place})", self.identity)
    }
}

unsafe impl Reflect for Erased {
    const DESCRIPTION: &'static TypeDescription = &const {
        TypeDescription::builder::<Self>()
            .name(|f| f.write_str("Erased"))
            .polymorphic_container()
            .build()
    };

    fn assign_from(slot: &mut Self, value: Value) -> Result<(), Value> {
        *slot = match value.downcast::<Erased>() {
            Ok(erased) => erased,
            Err(value) => value.into_erased(),
        };
        Ok(())
    }
}

use alloc::boxed::Box;
use core::any::Any;

use crate::{Erased, PtrMut, Reflect, TypeIdentity};

/// A boxed, dynamically typed value, tagged with the identity of its type.
///
/// This is what key-value reads hand out and what key-value writes consume.
pub struct Value {
    inner: Box<dyn Any>,
    identity: TypeIdentity,
    erase: fn(Box<dyn Any>) -> Erased,
}

impl Value {
    /// Boxes a reflected value
    pub fn new<T: Reflect>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            identity: TypeIdentity::of::<T>(),
            erase: erase::<T>,
        }
    }

    /// Identity of the boxed value's type
    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    /// Returns true if the boxed value is a `T`
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrows the boxed value as a `T`, if it is one
    #[inline]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Mutably borrows the boxed value as a `T`, if it is one
    #[inline]
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut()
    }

    /// Unboxes the value as a `T`, handing it back unchanged if it is something else
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        let Self {
            inner,
            identity,
            erase,
        } = self;
        match inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self {
                inner,
                identity,
                erase,
            }),
        }
    }

    /// Moves the value into a polymorphic container
    pub fn into_erased(self) -> Erased {
        (self.erase)(self.inner)
    }

    /// Pointer to the boxed value itself
    #[inline]
    pub fn as_mut_ptr(&mut self) -> PtrMut<'_> {
        PtrMut::new(&mut *self.inner as *mut dyn Any as *mut u8)
    }
}

fn erase<T: Reflect>(inner: Box<dyn Any>) -> Erased {
    let Ok(value) = inner.downcast::<T>() else {
        unreachable!("value boxed under a foreign type identity")
    };
    Erased::new(*value)
}

impl<T: Reflect> From<T> for Value {
    fn from(value: T) -> Self {
        Value::new(value)
    }
}

impl core::fmt::Debug for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Value<{}>", self.identity)
    }
}

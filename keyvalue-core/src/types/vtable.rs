use crate::{PtrConst, PtrMut, Reflect, Value};

/// Copies the value behind the pointer out into a fresh [`Value`]
///
/// # Safety
///
/// The pointer must point to an initialized value of the vtable's type.
pub type CloneValueFn = for<'mem> unsafe fn(value: PtrConst<'mem>) -> Value;

/// Overwrites the value behind the pointer if `value` is assignment-compatible,
/// handing `value` back untouched otherwise.
///
/// # Safety
///
/// The pointer must point to an initialized value of the vtable's type.
pub type AssignFn = for<'mem> unsafe fn(target: PtrMut<'mem>, value: Value) -> Result<(), Value>;

/// Type-erased operations on values of one type
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct ValueVTable {
    /// cf. [`CloneValueFn`]
    pub clone_value: CloneValueFn,

    /// cf. [`AssignFn`]
    pub assign: AssignFn,
}

impl ValueVTable {
    /// The vtable of a reflected type
    pub const fn of<T: Reflect>() -> Self {
        Self {
            clone_value: clone_value::<T>,
            assign: assign::<T>,
        }
    }
}

unsafe fn clone_value<T: Reflect>(value: PtrConst<'_>) -> Value {
    Value::new(unsafe { value.get::<T>() }.clone())
}

unsafe fn assign<T: Reflect>(target: PtrMut<'_>, value: Value) -> Result<(), Value> {
    T::assign_from(unsafe { target.as_mut::<T>() }, value)
}

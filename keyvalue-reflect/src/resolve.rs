//! Finding the payload a value's fields are laid out in
//!
//! A value record's fields sit in the slot itself. A reference record's slot
//! holds one pointer to an object header, and the fields sit in the payload
//! past that header. A polymorphic container wraps either of the above, inline
//! or boxed. The functions here peel those layers off.

use alloc::string::ToString;
use core::ptr::NonNull;

use keyvalue_core::{Erased, ObjHeader, PtrConst, PtrMut, TypeDescriptor, TypeKind};

use crate::{KeyValueError, MetadataCache};

/// Maps the slot at `address`, declared as `descriptor`, to the address its
/// fields are relative to and the descriptor of its dynamic type.
///
/// Undescribed types are returned unchanged: no indirection is ever followed
/// through a type nothing describes.
///
/// # Safety
///
/// `address` must point to an initialized value of the type `descriptor`
/// describes. Reference record slots must hold an `Obj` handle and container
/// slots an [`Erased`].
pub unsafe fn payload_address<'mem>(
    cache: &MetadataCache,
    address: PtrConst<'mem>,
    descriptor: &'static TypeDescriptor,
) -> Result<(PtrConst<'mem>, &'static TypeDescriptor), KeyValueError> {
    if !descriptor.is_described() {
        return Ok((address, descriptor));
    }

    match descriptor.kind {
        TypeKind::ValueRecord => Ok((address, descriptor)),
        TypeKind::ReferenceRecord => {
            let header = unsafe { address.read::<Option<NonNull<ObjHeader>>>() };
            let (payload, dynamic) = unsafe { object_payload(cache, header, descriptor) }?;
            Ok((PtrConst::new(payload), dynamic))
        }
        TypeKind::PolymorphicContainer => {
            if !descriptor.is_type::<Erased>() {
                return Ok((address, descriptor));
            }
            let container = unsafe { address.get::<Erased>() };
            let wrapped = cache.resolve(container.type_identity());
            unsafe { payload_address(cache, container.payload_ptr(), wrapped) }
        }
    }
}

/// [`payload_address`] for a slot about to be written through.
///
/// # Safety
///
/// Same contract as [`payload_address`], and `address` must be valid for writes.
pub unsafe fn payload_address_mut<'mem>(
    cache: &MetadataCache,
    address: PtrMut<'mem>,
    descriptor: &'static TypeDescriptor,
) -> Result<(PtrMut<'mem>, &'static TypeDescriptor), KeyValueError> {
    if !descriptor.is_described() {
        return Ok((address, descriptor));
    }

    match descriptor.kind {
        TypeKind::ValueRecord => Ok((address, descriptor)),
        TypeKind::ReferenceRecord => {
            let header = unsafe { address.read::<Option<NonNull<ObjHeader>>>() };
            let (payload, dynamic) = unsafe { object_payload(cache, header, descriptor) }?;
            Ok((PtrMut::new(payload), dynamic))
        }
        TypeKind::PolymorphicContainer => {
            if !descriptor.is_type::<Erased>() {
                return Ok((address, descriptor));
            }
            let container = unsafe { address.as_mut::<Erased>() };
            let wrapped = cache.resolve(container.type_identity());
            let payload = container.payload_ptr_mut();
            unsafe { payload_address_mut(cache, payload, wrapped) }
        }
    }
}

/// Follows a handle to the payload of the object it points to
unsafe fn object_payload(
    cache: &MetadataCache,
    header: Option<NonNull<ObjHeader>>,
    descriptor: &'static TypeDescriptor,
) -> Result<(*mut u8, &'static TypeDescriptor), KeyValueError> {
    let Some(header) = header else {
        return Err(KeyValueError::NullReference {
            type_name: descriptor.name.to_string(),
        });
    };
    let header_ref = unsafe { header.as_ref() };
    let dynamic = cache.resolve(header_ref.identity());
    if dynamic.identity != descriptor.identity {
        trace!("{} holds a {}", descriptor, dynamic);
    }
    let payload = unsafe { header.as_ptr().cast::<u8>().byte_add(header_ref.payload_offset()) };
    Ok((payload, dynamic))
}

/// The representation of the value at `address`, after unwrapping polymorphic
/// containers: whether writing to a copy of it needs a write-back.
///
/// # Safety
///
/// Same contract as [`payload_address`].
pub unsafe fn representation(
    cache: &MetadataCache,
    address: PtrConst<'_>,
    descriptor: &'static TypeDescriptor,
) -> TypeKind {
    match descriptor.kind {
        TypeKind::PolymorphicContainer
            if descriptor.is_described() && descriptor.is_type::<Erased>() =>
        {
            let container = unsafe { address.get::<Erased>() };
            let wrapped = cache.resolve(container.type_identity());
            unsafe { representation(cache, container.payload_ptr(), wrapped) }
        }
        kind => kind,
    }
}

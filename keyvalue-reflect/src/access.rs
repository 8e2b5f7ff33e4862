use alloc::{string::ToString, vec::Vec};

use keyvalue_core::{
    FieldDescriptor, PtrConst, PtrMut, Reflect, TypeDescriptor, TypeIdentity, TypeKind, Value,
    ValueVTable,
};

use crate::{
    AsKeyPath, KeyValueError, MetadataCache, payload_address, payload_address_mut,
    representation, segment_stack,
};

impl MetadataCache {
    /// Reads the field `key` names, explaining why when there is nothing to read
    pub fn try_get_value<T: Reflect>(
        &self,
        instance: &T,
        key: impl AsKeyPath<T>,
    ) -> Result<Value, KeyValueError> {
        let mut path = segment_stack(key.as_key());
        let root = PtrConst::new(core::ptr::from_ref(instance));
        unsafe { self.read(root, self.resolve(TypeIdentity::of::<T>()), &mut path) }
    }

    /// Writes the field `key` names, explaining why when nothing was written
    pub fn try_set_value<T: Reflect>(
        &self,
        value: impl Into<Value>,
        instance: &mut T,
        key: impl AsKeyPath<T>,
    ) -> Result<(), KeyValueError> {
        let mut path = segment_stack(key.as_key());
        let root = PtrMut::new(core::ptr::from_mut(instance));
        let declared = self.resolve(TypeIdentity::of::<T>());
        unsafe { self.write(root, declared, &mut path, value.into()) }
    }

    /// Reads the field `key` names, if there is one
    pub fn get_value<T: Reflect>(&self, instance: &T, key: impl AsKeyPath<T>) -> Option<Value> {
        self.try_get_value(instance, key).ok()
    }

    /// Writes the field `key` names. Unknown fields and values of the wrong
    /// type are ignored.
    pub fn set_value<T: Reflect>(
        &self,
        value: impl Into<Value>,
        instance: &mut T,
        key: impl AsKeyPath<T>,
    ) {
        let _ = self.try_set_value(value, instance, key);
    }

    /// The field `segment` names in values described by `descriptor`, with
    /// the descriptor and value operations of its type
    fn field_of(
        &self,
        descriptor: &'static TypeDescriptor,
        segment: &str,
    ) -> Result<
        (
            &'static FieldDescriptor,
            &'static TypeDescriptor,
            &'static ValueVTable,
        ),
        KeyValueError,
    > {
        let Some(field) = descriptor.field(segment) else {
            return Err(KeyValueError::NoSuchField {
                type_name: descriptor.name.clone(),
                field: segment.to_string(),
            });
        };
        let field_descriptor = self.resolve(field.field_type);
        let Some(vtable) = field_descriptor.vtable.as_ref() else {
            return Err(KeyValueError::Undescribed {
                type_name: field_descriptor.name.clone(),
            });
        };
        trace!(
            "{}.{}: {} at offset {}",
            descriptor, field.name, field_descriptor, field.offset
        );
        Ok((field, field_descriptor, vtable))
    }

    /// Pops one segment off `path` and reads on from the value at `address`.
    /// Intermediates are walked in place; only the leaf is cloned.
    unsafe fn read(
        &self,
        address: PtrConst<'_>,
        declared: &'static TypeDescriptor,
        path: &mut Vec<&str>,
    ) -> Result<Value, KeyValueError> {
        let Some(segment) = path.pop() else {
            return Err(KeyValueError::EmptyPath);
        };

        let (payload, descriptor) = unsafe { payload_address(self, address, declared) }?;
        let (field, field_descriptor, vtable) = self.field_of(descriptor, segment)?;
        let slot = unsafe { payload.field(field.offset) };

        if path.is_empty() {
            Ok(unsafe { (vtable.clone_value)(slot) })
        } else {
            unsafe { self.read(slot, field_descriptor, path) }
        }
    }

    /// Pops one segment off `path` and writes on into the value at `address`
    unsafe fn write(
        &self,
        address: PtrMut<'_>,
        declared: &'static TypeDescriptor,
        path: &mut Vec<&str>,
        value: Value,
    ) -> Result<(), KeyValueError> {
        let Some(segment) = path.pop() else {
            return Err(KeyValueError::EmptyPath);
        };

        let (payload, descriptor) = unsafe { payload_address_mut(self, address, declared) }?;
        let (field, field_descriptor, vtable) = self.field_of(descriptor, segment)?;
        let slot = unsafe { payload.field(field.offset) };

        if path.is_empty() {
            return unsafe { self.assign(slot, field_descriptor, vtable, value) };
        }

        let mut nested = unsafe { (vtable.clone_value)(slot.as_const()) };
        unsafe { self.write(nested.as_mut_ptr(), field_descriptor, path, value) }?;

        // a modified copy of a value record has to be stored back; references
        // and boxed containers were modified in place
        if unsafe { representation(self, nested.as_mut_ptr().as_const(), field_descriptor) }
            == TypeKind::ValueRecord
        {
            trace!("writing {} back into {}.{}", field_descriptor, descriptor, field.name);
            unsafe { self.assign(slot, field_descriptor, vtable, nested) }?;
        }

        Ok(())
    }

    unsafe fn assign(
        &self,
        slot: PtrMut<'_>,
        field_descriptor: &'static TypeDescriptor,
        vtable: &ValueVTable,
        value: Value,
    ) -> Result<(), KeyValueError> {
        unsafe { (vtable.assign)(slot, value) }.map_err(|rejected| KeyValueError::TypeMismatch {
            expected: field_descriptor.name.clone(),
            actual: self.resolve(rejected.identity()).name.clone(),
        })
    }
}

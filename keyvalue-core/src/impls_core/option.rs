use crate::{Reflect, TypeDescription, Value};

// Options are opaque: they expose no fields, so paths never look inside them.
unsafe impl<T: Reflect> Reflect for Option<T> {
    const DESCRIPTION: &'static TypeDescription = &const {
        TypeDescription::builder::<Self>()
            .name(|f| write!(f, "Option<{}>", T::DESCRIPTION.display_name()))
            .value_record()
            .build()
    };

    /// Accepts an `Option<T>`, or a bare `T` which is stored as `Some`
    fn assign_from(slot: &mut Self, value: Value) -> Result<(), Value> {
        *slot = match value.downcast::<Option<T>>() {
            Ok(option) => option,
            Err(value) => Some(value.downcast::<T>()?),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Reflect, Value};

    #[test]
    fn bare_value_assigns_into_option() {
        let mut slot: Option<i64> = None;
        assert!(Option::<i64>::assign_from(&mut slot, Value::new(7_i64)).is_ok());
        assert_eq!(slot, Some(7));

        assert!(Option::<i64>::assign_from(&mut slot, Value::new(None::<i64>)).is_ok());
        assert_eq!(slot, None);
    }

    #[test]
    fn foreign_value_is_handed_back() {
        let mut slot: Option<i64> = Some(1);
        let rejected = Option::<i64>::assign_from(&mut slot, Value::new(1_u8)).unwrap_err();
        assert!(rejected.is::<u8>());
        assert_eq!(slot, Some(1));
    }

    #[test]
    fn name_includes_parameter() {
        let name = alloc::format!("{}", Option::<bool>::DESCRIPTION.display_name());
        assert_eq!(name, "Option<bool>");
    }
}

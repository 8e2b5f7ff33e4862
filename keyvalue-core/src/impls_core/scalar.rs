use crate::{Reflect, TypeDescription};

macro_rules! impl_reflect_for_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            unsafe impl Reflect for $ty {
                const DESCRIPTION: &'static TypeDescription = &const {
                    TypeDescription::builder::<Self>()
                        .name(|f| f.write_str(stringify!($ty)))
                        .value_record()
                        .build()
                };
            }
        )*
    };
}

impl_reflect_for_scalar!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

#[cfg(test)]
mod tests {
    use crate::{Reflect, TypeKind};

    #[test]
    fn scalars_are_fieldless_value_records() {
        let description = <i64 as Reflect>::DESCRIPTION;
        assert_eq!(description.kind, TypeKind::ValueRecord);
        assert!(description.fields.is_empty());
        assert!(description.base.is_none());
        assert_eq!(alloc::format!("{}", description.display_name()), "i64");
    }
}

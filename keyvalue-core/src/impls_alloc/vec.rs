use alloc::vec::Vec;

use crate::{Reflect, TypeDescription};

unsafe impl<T: Reflect> Reflect for Vec<T> {
    const DESCRIPTION: &'static TypeDescription = &const {
        TypeDescription::builder::<Self>()
            .name(|f| write!(f, "Vec<{}>", T::DESCRIPTION.display_name()))
            .value_record()
            .build()
    };
}

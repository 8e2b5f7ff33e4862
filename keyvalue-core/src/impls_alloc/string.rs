use alloc::string::String;

use crate::{Reflect, TypeDescription};

unsafe impl Reflect for String {
    const DESCRIPTION: &'static TypeDescription = &const {
        TypeDescription::builder::<Self>()
            .name(|f| f.write_str("String"))
            .value_record()
            .build()
    };
}

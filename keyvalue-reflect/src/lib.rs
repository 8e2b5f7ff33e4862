#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

extern crate alloc;

#[cfg(feature = "log")]
macro_rules! trace {
    ($($tt:tt)*) => {
        ::log::trace!($($tt)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($tt:tt)*) => {
        ::log::debug!($($tt)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

mod error;
pub use error::*;

mod provider;
pub use provider::*;

mod cache;
pub use cache::*;

mod resolve;
pub use resolve::*;

mod path;
pub use path::*;

mod access;

mod api;
pub use api::*;

use alloc::string::String;
use owo_colors::OwoColorize;

/// Why a key-value access did nothing.
///
/// Only the strict `try_*` functions report these; the lenient API turns every
/// one of them into an absent value or a no-op.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum KeyValueError {
    /// The key path has no segments
    EmptyPath,

    /// No field of the value's dynamic type has this name
    NoSuchField {
        /// Name of the type that was searched
        type_name: String,
        /// The segment that did not match
        field: String,
    },

    /// The field refused the value because of its type
    TypeMismatch {
        /// Name of the field's declared type
        expected: String,
        /// Name of the offered value's type
        actual: String,
    },

    /// A reference record slot held no object
    NullReference {
        /// Name of the reference record type
        type_name: String,
    },

    /// The field's type has no description, so its value can be neither read nor written
    Undescribed {
        /// Name of the undescribed type
        type_name: String,
    },
}

impl core::fmt::Display for KeyValueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeyValueError::EmptyPath => write!(f, "Key path is empty"),
            KeyValueError::NoSuchField { type_name, field } => {
                write!(
                    f,
                    "No field '{}' in {}",
                    field.yellow(),
                    type_name.blue()
                )
            }
            KeyValueError::TypeMismatch { expected, actual } => {
                write!(
                    f,
                    "Type mismatch: field holds {}, but got {}",
                    expected.green(),
                    actual.red()
                )
            }
            KeyValueError::NullReference { type_name } => {
                write!(f, "Reference of type {} points to nothing", type_name.red())
            }
            KeyValueError::Undescribed { type_name } => {
                write!(f, "Type {} is not described", type_name.red())
            }
        }
    }
}

impl core::error::Error for KeyValueError {}

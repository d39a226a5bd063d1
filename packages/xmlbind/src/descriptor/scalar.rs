//! Scalar descriptors and text-to-value conversion.
//!
//! Conversion leans entirely on the `FromStr` implementations of Rust
//! primitives and `String`, so any parseable type can serve as a
//! scalar without a per-type conversion table.

use std::any::Any;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use super::{short_type_name, DisplayFn, ParseFn, Shape, TypeDesc, Value};
use crate::error::{BindError, Result};

/// Parse-from-string capability plus a display form for the dump.
pub struct ScalarShape {
    pub(crate) parse: ParseFn,
    pub(crate) display: DisplayFn,
}

impl TypeDesc {
    /// Build a scalar descriptor for any `FromStr + Display` type.
    ///
    /// Covers all integer and floating widths, `bool`, `char` and
    /// `String` (whose `FromStr` is infallible).
    #[must_use]
    pub fn scalar<T>() -> Arc<TypeDesc>
    where
        T: FromStr + Display + Any,
        T::Err: Display,
    {
        let parse: ParseFn = Box::new(|text: &str| {
            text.parse::<T>()
                .map(|v| Box::new(v) as Value)
                .map_err(|e| e.to_string())
        });
        let display: DisplayFn = Box::new(|value: &dyn Any| {
            value
                .downcast_ref::<T>()
                .map(ToString::to_string)
                .unwrap_or_else(|| "?".to_string())
        });
        Arc::new(TypeDesc::from_shape(
            short_type_name::<T>(),
            Shape::Scalar(ScalarShape { parse, display }),
        ))
    }
}

/// Convert a single text value into a typed scalar.
///
/// `tag` is the element name the text came from, carried into the error
/// for diagnostics. Fails when the descriptor has no parse-from-string
/// capability (non-scalar shape) or when parsing rejects the text; both
/// cases are non-fatal to the overall load.
pub fn convert(text: &str, desc: &TypeDesc, tag: &str) -> Result<Value> {
    match desc.shape() {
        Shape::Scalar(shape) => (shape.parse)(text).map_err(|message| BindError::Conversion {
            tag: tag.to_string(),
            type_name: desc.name().to_string(),
            text: text.to_string(),
            message,
        }),
        _ => Err(BindError::Conversion {
            tag: tag.to_string(),
            type_name: desc.name().to_string(),
            text: text.to_string(),
            message: "type has no parse-from-string capability".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_integer() {
        let desc = TypeDesc::scalar::<i64>();
        let value = convert("42", &desc, "x").unwrap();
        assert_eq!(*value.downcast::<i64>().unwrap(), 42);
    }

    #[test]
    fn test_convert_bool() {
        let desc = TypeDesc::scalar::<bool>();
        let value = convert("true", &desc, "flag").unwrap();
        assert!(*value.downcast::<bool>().unwrap());
    }

    #[test]
    fn test_convert_float() {
        let desc = TypeDesc::scalar::<f64>();
        let value = convert("2.5", &desc, "ratio").unwrap();
        assert_eq!(*value.downcast::<f64>().unwrap(), 2.5);
    }

    #[test]
    fn test_convert_char() {
        let desc = TypeDesc::scalar::<char>();
        let value = convert("z", &desc, "letter").unwrap();
        assert_eq!(*value.downcast::<char>().unwrap(), 'z');
    }

    #[test]
    fn test_convert_string_is_infallible() {
        let desc = TypeDesc::scalar::<String>();
        let value = convert("hello world", &desc, "title").unwrap();
        assert_eq!(*value.downcast::<String>().unwrap(), "hello world");
    }

    #[test]
    fn test_convert_malformed_numeric() {
        let desc = TypeDesc::scalar::<i32>();
        let err = convert("abc", &desc, "x").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("<x>"), "message should name the tag: {msg}");
        assert!(msg.contains("abc"), "message should carry the text: {msg}");
        assert!(msg.contains("i32"), "message should name the type: {msg}");
    }

    #[test]
    fn test_convert_rejects_non_scalar_descriptor() {
        let element = TypeDesc::scalar::<i64>();
        let desc = TypeDesc::collection::<Vec<i64>, i64>(Some(element));
        let err = convert("1", &desc, "items").unwrap_err();
        assert!(err.to_string().contains("parse-from-string"));
    }

    #[test]
    fn test_scalar_display() {
        let desc = TypeDesc::scalar::<u16>();
        let value: Value = Box::new(7u16);
        if let Shape::Scalar(shape) = desc.shape() {
            assert_eq!((shape.display)(value.as_ref()), "7");
        } else {
            unreachable!("scalar descriptor must have scalar shape");
        }
    }
}

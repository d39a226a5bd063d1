//! Runtime type descriptors.
//!
//! Every type the binder can materialize is described once, up front,
//! by a [`TypeDesc`] carrying its structural classification and the
//! closures needed to construct, populate and render it. Tag names in
//! the document drive dispatch; no introspection happens at load time.

mod aggregate;
mod container;
mod scalar;

use std::any::Any;

pub use aggregate::{AggregateBuilder, AggregateShape, Member, MemberResolution};
pub use container::{CollectionShape, MapPut, MapShape};
pub use scalar::{convert, ScalarShape};

/// A built instance in transit between the builders, the diagnostic
/// dump and the consumer callback.
pub type Value = Box<dyn Any>;

pub(crate) type ParseFn = Box<dyn Fn(&str) -> std::result::Result<Value, String> + Send + Sync>;
pub(crate) type DisplayFn = Box<dyn Fn(&dyn Any) -> String + Send + Sync>;
pub(crate) type ConstructFn = Box<dyn Fn() -> Value + Send + Sync>;
pub(crate) type SetFn =
    Box<dyn Fn(&mut dyn Any, Value) -> std::result::Result<(), String> + Send + Sync>;
pub(crate) type InsertFn =
    Box<dyn Fn(&mut dyn Any, Value, Value) -> std::result::Result<(), String> + Send + Sync>;
pub(crate) type GetFn = Box<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
pub(crate) type ItemsFn = Box<dyn for<'a> Fn(&'a dyn Any) -> Vec<&'a dyn Any> + Send + Sync>;
pub(crate) type EntriesFn =
    Box<dyn for<'a> Fn(&'a dyn Any) -> Vec<(String, &'a dyn Any)> + Send + Sync>;

/// Structural classification of a described type.
///
/// Exactly one variant applies per descriptor; the classification is
/// decided by which constructor built the descriptor, not by a declared
/// tag in the document.
pub enum Shape {
    /// Convertible directly from a single text value.
    Scalar(ScalarShape),
    /// Default-constructed container with a single-item add operation.
    Collection(CollectionShape),
    /// Default-constructed container with a key/value put operation.
    Map(MapShape),
    /// Default-constructed type populated field by field.
    Aggregate(AggregateShape),
}

/// Runtime handle to a bindable type.
pub struct TypeDesc {
    name: String,
    shape: Shape,
}

impl TypeDesc {
    pub(crate) fn from_shape(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Human-readable type name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The structural classification of this descriptor.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// `true` if this descriptor has a parse-from-string capability.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self.shape, Shape::Scalar(_))
    }
}

/// Strip module paths from a type name, keeping generic structure:
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub(crate) fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let mut out = String::new();
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name_plain() {
        assert_eq!(short_type_name::<i64>(), "i64");
        assert_eq!(short_type_name::<String>(), "String");
    }

    #[test]
    fn test_short_type_name_generic() {
        assert_eq!(short_type_name::<Vec<String>>(), "Vec<String>");
        assert_eq!(
            short_type_name::<std::collections::HashMap<String, i64>>(),
            "HashMap<String, i64>"
        );
    }

    #[test]
    fn test_is_scalar() {
        assert!(TypeDesc::scalar::<bool>().is_scalar());
    }
}

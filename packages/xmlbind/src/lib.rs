//! xmlbind - populate registered Rust types from XML documents.
//!
//! A [`TypeRegistry`] maps element tag names to type descriptors; a
//! [`Binder`] walks a parsed document and materializes statically-typed
//! values: scalars, collections, maps and nested aggregates. Errors are
//! accumulated, never thrown: one malformed entry does not abort the
//! rest of the load.
//!
//! # Example
//!
//! ```
//! use xmlbind::{Binder, TypeDesc, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let point = TypeDesc::aggregate::<Point>()
//!     .field("x", TypeDesc::scalar::<i32>(), |p| &p.x, |p, v| p.x = v)
//!     .field("y", TypeDesc::scalar::<i32>(), |p| &p.y, |p, v| p.y = v)
//!     .build();
//!
//! let mut registry = TypeRegistry::new();
//! registry.register("point", point).unwrap();
//!
//! let mut binder = Binder::new(registry);
//! binder.load_str("<point><x>3</x><y>4</y></point>");
//! assert!(!binder.is_error());
//! ```
//!
//! # Architecture
//!
//! - [`descriptor`]: runtime type descriptors (scalar, collection, map,
//!   aggregate) and the text-to-scalar converter
//! - [`registry`]: tag-to-binding registry with consumers and generic
//!   parameters
//! - [`binder`]: load entry points, root dispatch and the recursive
//!   builders
//! - [`dump`]: diagnostic rendering of built object graphs
//! - [`error`]: error taxonomy and Result alias
//! - [`xml`]: element tree navigation helpers

pub mod binder;
pub mod descriptor;
pub mod dump;
pub mod error;
pub mod registry;
pub mod xml;

// Re-export main entry points
pub use binder::Binder;
pub use descriptor::{convert, AggregateBuilder, MapPut, Shape, TypeDesc, Value};
pub use dump::dump;
pub use error::{BindError, Result};
pub use registry::{Binding, Consumer, TypeRegistry};

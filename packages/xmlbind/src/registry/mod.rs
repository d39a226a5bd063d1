//! Tag-to-type binding registry.
//!
//! A binding pairs a markup tag name with the descriptor of the type to
//! build, an optional consumer callback and, for bare container
//! registrations, the generic parameter descriptors the container type
//! itself cannot carry.

mod core;

pub use self::core::{Binding, Consumer, TypeRegistry};

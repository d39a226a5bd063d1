//! Dispatch driver and recursive builders.
//!
//! [`Binder`] owns the registry and the load entry points; the `build`
//! module materializes individual values; `context` carries the
//! call-scoped error accumulator.

mod build;
mod context;
mod loader;

pub use loader::Binder;

//! Diagnostic dump of built object graphs.
//!
//! Renders a fully-built instance as indented `name=value` lines at a
//! caller-chosen severity, for post-load verification. The level gate
//! is checked once before any traversal, so a suppressed dump costs
//! one comparison and touches nothing.

use std::any::Any;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::descriptor::{Shape, TypeDesc};
use crate::registry::Binding;

/// Hard recursion cap. Direct self-references render as `self`; this
/// cap is the backstop for indirect cycles reachable through shared
/// ownership the builders themselves never create.
const MAX_DEPTH: usize = 32;

/// Render an instance as indented `name=value` lines at `level`.
///
/// No-op when the logger's configured minimum level excludes `level`.
pub fn dump(level: Level, name: &str, value: &dyn Any, desc: &TypeDesc) {
    if level > LevelFilter::current() {
        return;
    }
    dump_value(level, name, value, desc, 0, &[]);
}

/// Dump entry for a freshly built top-level binding: bare container
/// registrations take their item descriptors from the binding's
/// generic parameters.
pub(crate) fn dump_binding(level: Level, name: &str, value: &dyn Any, binding: &Binding) {
    if level > LevelFilter::current() {
        return;
    }
    dump_value(level, name, value, binding.type_desc(), 0, binding.params());
}

fn dump_value(
    level: Level,
    name: &str,
    value: &dyn Any,
    desc: &TypeDesc,
    depth: usize,
    params: &[Arc<TypeDesc>],
) {
    if depth > MAX_DEPTH {
        emit(level, depth, &format!("{name}=<max depth exceeded>"));
        return;
    }
    match desc.shape() {
        Shape::Scalar(shape) => {
            emit(level, depth, &format!("{name}={}", (shape.display)(value)));
        }
        Shape::Collection(shape) => {
            emit(level, depth, &format!("{name}:collection"));
            let element = params.first().or(shape.element.as_ref());
            for (index, item) in (shape.items)(value).into_iter().enumerate() {
                match element {
                    Some(element) => {
                        dump_value(level, &index.to_string(), item, element, depth + 1, &[]);
                    }
                    None => emit(level, depth + 1, &format!("{index}=?")),
                }
            }
        }
        Shape::Map(shape) => {
            emit(level, depth, &format!("{name}:map"));
            let value_desc = params.get(1).or(shape.value.as_ref());
            for (key, entry) in (shape.entries)(value) {
                match value_desc {
                    Some(value_desc) => dump_value(level, &key, entry, value_desc, depth + 1, &[]),
                    None => emit(level, depth + 1, &format!("{key}=?")),
                }
            }
        }
        Shape::Aggregate(shape) => {
            emit(level, depth, &format!("{name}:{}", desc.name()));
            for field_name in &shape.field_order {
                let Some(member) = shape.fields.get(field_name) else {
                    continue;
                };
                // Setter-only members have no readable backing storage.
                let Some(get) = member.get.as_ref() else {
                    continue;
                };
                match get(value) {
                    Some(field_value) => {
                        if is_self_reference(field_value, value) {
                            emit(level, depth + 1, &format!("{field_name}=self"));
                        } else {
                            dump_value(level, field_name, field_value, &member.ty, depth + 1, &[]);
                        }
                    }
                    None => emit(level, depth + 1, &format!("{field_name}=?")),
                }
            }
        }
    }
}

/// A field is a self-reference when it is the very same object as its
/// enclosing instance: same address and same concrete type. The type
/// check keeps a first field at offset zero from false-matching.
fn is_self_reference(field: &dyn Any, instance: &dyn Any) -> bool {
    std::ptr::addr_eq(field as *const dyn Any, instance as *const dyn Any)
        && field.type_id() == instance.type_id()
}

// The event macros demand a const level, so a runtime level has to be
// dispatched by hand.
fn emit(level: Level, depth: usize, line: &str) {
    let pad = "   ".repeat(depth);
    match level {
        Level::TRACE => tracing::trace!("{pad}{line}"),
        Level::DEBUG => tracing::debug!("{pad}{line}"),
        Level::INFO => tracing::info!("{pad}{line}"),
        Level::WARN => tracing::warn!("{pad}{line}"),
        Level::ERROR => tracing::error!("{pad}{line}"),
    }
}

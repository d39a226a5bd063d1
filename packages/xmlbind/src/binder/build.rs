//! Recursive builders that materialize typed values from element trees.
//!
//! Each builder localizes failures to the smallest subtree possible:
//! a bad field, item or entry is recorded in the [`LoadContext`] and
//! skipped, and construction continues with the remaining siblings.
//! Only a missing default constructor aborts a subtree, and even that
//! leaves the enclosing document load running.

use std::sync::Arc;

use roxmltree::Node;

use super::context::LoadContext;
use crate::descriptor::{
    convert, AggregateShape, CollectionShape, MapShape, MemberResolution, Shape, TypeDesc, Value,
};
use crate::error::{BindError, Result};
use crate::registry::Binding;
use crate::xml::{element_children, get_tag_name, get_text};

/// Build one instance for a matched top-level binding.
///
/// Bare container registrations take their element/key/value
/// descriptors from the binding's generic parameters; everything else
/// routes straight to [`build_value`].
pub(crate) fn build_binding(
    node: Node<'_, '_>,
    binding: &Binding,
    context: &mut LoadContext,
) -> Result<Value> {
    let desc = binding.type_desc();
    match desc.shape() {
        Shape::Collection(shape) => {
            build_collection(node, desc, shape, binding.params().first(), context)
        }
        Shape::Map(shape) => build_map(
            node,
            desc,
            shape,
            binding.params().first(),
            binding.params().get(1),
            context,
        ),
        _ => build_value(node, desc, context),
    }
}

/// Build a value of the given descriptor from a node, recursing per the
/// descriptor's structural classification.
pub(crate) fn build_value(
    node: Node<'_, '_>,
    desc: &TypeDesc,
    context: &mut LoadContext,
) -> Result<Value> {
    match desc.shape() {
        Shape::Scalar(_) => convert(&get_text(node), desc, get_tag_name(node)),
        Shape::Collection(shape) => build_collection(node, desc, shape, None, context),
        Shape::Map(shape) => build_map(node, desc, shape, None, None, context),
        Shape::Aggregate(shape) => build_aggregate(node, desc, shape, context),
    }
}

/// Construct an aggregate and assign each matching child element to a
/// field or setter. Unmatched children and failed assignments are
/// recorded and skipped.
fn build_aggregate(
    node: Node<'_, '_>,
    desc: &TypeDesc,
    shape: &AggregateShape,
    context: &mut LoadContext,
) -> Result<Value> {
    let construct = shape
        .construct
        .as_ref()
        .ok_or_else(|| BindError::Construction {
            tag: get_tag_name(node).to_string(),
            type_name: desc.name().to_string(),
        })?;
    let mut instance = construct();

    for child in element_children(node) {
        let tag = get_tag_name(child);
        let member = match shape.resolve(tag) {
            MemberResolution::UseSetter(member) | MemberResolution::UseField(member) => member,
            MemberResolution::NotFound => {
                context.record(&BindError::FieldResolution {
                    tag: tag.to_string(),
                    type_name: desc.name().to_string(),
                });
                continue;
            }
        };
        match build_value(child, member.type_desc(), context) {
            Ok(value) => {
                if let Err(message) = (member.set)(instance.as_mut(), value) {
                    context.record(&BindError::Access {
                        member: tag.to_string(),
                        type_name: desc.name().to_string(),
                        message,
                    });
                }
            }
            Err(err) => context.record(&err),
        }
    }

    Ok(instance)
}

/// Construct a collection and add each child node in document order.
///
/// A missing element descriptor yields an empty, correctly-typed
/// container with the error recorded, not a failed load.
fn build_collection(
    node: Node<'_, '_>,
    desc: &TypeDesc,
    shape: &CollectionShape,
    param: Option<&Arc<TypeDesc>>,
    context: &mut LoadContext,
) -> Result<Value> {
    let mut container = (shape.construct)();

    let Some(element) = param.or(shape.element.as_ref()) else {
        context.record(&BindError::MissingElementType {
            tag: get_tag_name(node).to_string(),
        });
        return Ok(container);
    };

    for child in element_children(node) {
        match build_value(child, element, context) {
            Ok(item) => {
                if let Err(message) = (shape.push)(container.as_mut(), item) {
                    context.record(&BindError::Access {
                        member: get_tag_name(child).to_string(),
                        type_name: desc.name().to_string(),
                        message,
                    });
                }
            }
            Err(err) => context.record(&err),
        }
    }

    Ok(container)
}

/// Construct a map, treating each child's tag name as the serialized
/// key and the child's content as the value.
///
/// An entry whose key fails conversion is skipped; missing key/value
/// descriptors yield an empty, correctly-typed container.
fn build_map(
    node: Node<'_, '_>,
    desc: &TypeDesc,
    shape: &MapShape,
    key_param: Option<&Arc<TypeDesc>>,
    value_param: Option<&Arc<TypeDesc>>,
    context: &mut LoadContext,
) -> Result<Value> {
    let mut container = (shape.construct)();

    let (Some(key_desc), Some(value_desc)) = (
        key_param.or(shape.key.as_ref()),
        value_param.or(shape.value.as_ref()),
    ) else {
        context.record(&BindError::MissingKeyValueTypes {
            tag: get_tag_name(node).to_string(),
        });
        return Ok(container);
    };

    // Keys come from tag names, so the key type must parse from string.
    let Shape::Scalar(key_shape) = key_desc.shape() else {
        context.record(&BindError::MissingKeyValueTypes {
            tag: get_tag_name(node).to_string(),
        });
        return Ok(container);
    };

    for child in element_children(node) {
        let child_tag = get_tag_name(child);
        let key = match (key_shape.parse)(child_tag) {
            Ok(key) => key,
            Err(message) => {
                context.record(&BindError::KeyConversion {
                    key: child_tag.to_string(),
                    type_name: key_desc.name().to_string(),
                    message,
                });
                continue;
            }
        };
        match build_value(child, value_desc, context) {
            Ok(value) => {
                if let Err(message) = (shape.insert)(container.as_mut(), key, value) {
                    context.record(&BindError::Access {
                        member: child_tag.to_string(),
                        type_name: desc.name().to_string(),
                        message,
                    });
                }
            }
            Err(err) => context.record(&err),
        }
    }

    Ok(container)
}

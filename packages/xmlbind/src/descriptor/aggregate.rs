//! Aggregate descriptors: default construction plus per-member
//! assignment tables.
//!
//! Member lookup is built once when the descriptor is declared, keyed by
//! tag name. Assignment resolution is a two-step lookup (setter table,
//! then field table) returning a tagged [`MemberResolution`] so the
//! setter-over-field precedence is inspectable rather than buried in
//! fallback control flow.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{short_type_name, ConstructFn, GetFn, SetFn, Shape, TypeDesc, Value};

/// A field or single-argument setter on an aggregate, keyed by the tag
/// name it answers to.
pub struct Member {
    pub(crate) ty: Arc<TypeDesc>,
    pub(crate) set: SetFn,
    /// Present for fields only; setters hide their backing storage, so
    /// the diagnostic dump cannot read them back.
    pub(crate) get: Option<GetFn>,
}

impl Member {
    /// Descriptor of the member's value type.
    #[must_use]
    pub fn type_desc(&self) -> &Arc<TypeDesc> {
        &self.ty
    }
}

/// Outcome of resolving a child tag against an aggregate's members.
pub enum MemberResolution<'a> {
    /// A setter answers to this name; it takes precedence.
    UseSetter(&'a Member),
    /// No setter, but a public field matches.
    UseField(&'a Member),
    /// Neither a field nor a setter matches the tag.
    NotFound,
}

/// Construction and member tables for an aggregate type.
pub struct AggregateShape {
    pub(crate) construct: Option<ConstructFn>,
    pub(crate) fields: HashMap<String, Member>,
    pub(crate) setters: HashMap<String, Member>,
    /// Field declaration order, for deterministic dumps.
    pub(crate) field_order: Vec<String>,
}

impl AggregateShape {
    /// Resolve a child tag to a member: setter lookup first, then field
    /// lookup.
    #[must_use]
    pub fn resolve(&self, tag: &str) -> MemberResolution<'_> {
        if let Some(member) = self.setters.get(tag) {
            return MemberResolution::UseSetter(member);
        }
        if let Some(member) = self.fields.get(tag) {
            return MemberResolution::UseField(member);
        }
        MemberResolution::NotFound
    }
}

fn setter_of<T: Any, F: Any>(set: fn(&mut T, F)) -> SetFn {
    Box::new(move |instance: &mut dyn Any, value: Value| {
        let instance = instance
            .downcast_mut::<T>()
            .ok_or_else(|| "instance type mismatch".to_string())?;
        let value = value
            .downcast::<F>()
            .map_err(|_| format!("value is not a {}", short_type_name::<F>()))?;
        set(instance, *value);
        Ok(())
    })
}

fn getter_of<T: Any, F: Any>(get: fn(&T) -> &F) -> GetFn {
    fn funnel<G>(g: G) -> G
    where
        G: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any>,
    {
        g
    }
    Box::new(funnel(move |instance| {
        instance
            .downcast_ref::<T>()
            .map(|instance| get(instance) as &dyn Any)
    }))
}

/// Fluent builder for aggregate descriptors.
pub struct AggregateBuilder<T> {
    name: String,
    construct: Option<ConstructFn>,
    fields: HashMap<String, Member>,
    setters: HashMap<String, Member>,
    field_order: Vec<String>,
    _marker: PhantomData<fn() -> T>,
}

impl TypeDesc {
    /// Start an aggregate descriptor for a default-constructible type.
    #[must_use]
    pub fn aggregate<T: Default + Any>() -> AggregateBuilder<T> {
        AggregateBuilder {
            name: short_type_name::<T>(),
            construct: Some(Box::new(|| Box::new(T::default()) as Value)),
            fields: HashMap::new(),
            setters: HashMap::new(),
            field_order: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<T: Any> AggregateBuilder<T> {
    /// Start an aggregate descriptor for a type without a default
    /// constructor.
    ///
    /// Such a descriptor can still declare members (so it participates
    /// in dumps and resolution tests), but any attempt to build an
    /// instance from a document fails with a construction error for
    /// that subtree.
    #[must_use]
    pub fn no_default() -> Self {
        AggregateBuilder {
            name: short_type_name::<T>(),
            construct: None,
            fields: HashMap::new(),
            setters: HashMap::new(),
            field_order: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare a public field answering to `name`.
    #[must_use]
    pub fn field<F: Any>(
        mut self,
        name: &str,
        ty: Arc<TypeDesc>,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        self.field_order.push(name.to_string());
        self.fields.insert(
            name.to_string(),
            Member {
                ty,
                set: setter_of(set),
                get: Some(getter_of(get)),
            },
        );
        self
    }

    /// Declare a single-argument setter answering to `name`.
    ///
    /// When both a field and a setter are declared for the same name,
    /// the setter wins at assignment time.
    #[must_use]
    pub fn setter<F: Any>(mut self, name: &str, ty: Arc<TypeDesc>, set: fn(&mut T, F)) -> Self {
        self.setters.insert(
            name.to_string(),
            Member {
                ty,
                set: setter_of(set),
                get: None,
            },
        );
        self
    }

    /// Finish the descriptor.
    #[must_use]
    pub fn build(self) -> Arc<TypeDesc> {
        Arc::new(TypeDesc::from_shape(
            self.name,
            Shape::Aggregate(AggregateShape {
                construct: self.construct,
                fields: self.fields,
                setters: self.setters,
                field_order: self.field_order,
            }),
        ))
    }
}

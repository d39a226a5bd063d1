//! Collection and map descriptors.
//!
//! Element, key and value types are declared explicitly when the
//! descriptor is built (or supplied as generic parameters on the
//! binding for top-level registrations); nothing is recovered from
//! signatures at load time.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use super::{
    short_type_name, ConstructFn, EntriesFn, InsertFn, ItemsFn, SetFn, Shape, TypeDesc, Value,
};

/// Container types the binder can put key/value pairs into.
///
/// Std has no common insertion trait across its map types, so this one
/// covers the two the binder supports out of the box. Implement it to
/// bind other map-like containers.
pub trait MapPut<K, V> {
    fn put(&mut self, key: K, value: V);
}

impl<K: Eq + Hash, V> MapPut<K, V> for HashMap<K, V> {
    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K: Ord, V> MapPut<K, V> for BTreeMap<K, V> {
    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

/// Default-construct, push and iterate a collection container.
pub struct CollectionShape {
    pub(crate) construct: ConstructFn,
    pub(crate) push: SetFn,
    pub(crate) element: Option<Arc<TypeDesc>>,
    pub(crate) items: ItemsFn,
}

/// Default-construct, insert and iterate a map container.
pub struct MapShape {
    pub(crate) construct: ConstructFn,
    pub(crate) insert: InsertFn,
    pub(crate) key: Option<Arc<TypeDesc>>,
    pub(crate) value: Option<Arc<TypeDesc>>,
    pub(crate) entries: EntriesFn,
}

fn construct_default<C: Default + Any>() -> Value {
    Box::new(C::default())
}

fn collection_push<C, T>(container: &mut dyn Any, item: Value) -> Result<(), String>
where
    C: Extend<T> + Any,
    T: Any,
{
    let container = container
        .downcast_mut::<C>()
        .ok_or_else(|| "container instance type mismatch".to_string())?;
    let item = item
        .downcast::<T>()
        .map_err(|_| format!("item is not a {}", short_type_name::<T>()))?;
    container.extend(std::iter::once(*item));
    Ok(())
}

fn collection_items<C, T>(value: &dyn Any) -> Vec<&dyn Any>
where
    C: Any,
    T: Any,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
{
    match value.downcast_ref::<C>() {
        Some(container) => container.into_iter().map(|item| item as &dyn Any).collect(),
        None => Vec::new(),
    }
}

fn map_insert<M, K, V>(container: &mut dyn Any, key: Value, value: Value) -> Result<(), String>
where
    M: MapPut<K, V> + Any,
    K: Any,
    V: Any,
{
    let container = container
        .downcast_mut::<M>()
        .ok_or_else(|| "container instance type mismatch".to_string())?;
    let key = key
        .downcast::<K>()
        .map_err(|_| format!("key is not a {}", short_type_name::<K>()))?;
    let value = value
        .downcast::<V>()
        .map_err(|_| format!("value is not a {}", short_type_name::<V>()))?;
    container.put(*key, *value);
    Ok(())
}

fn map_entries<M, K, V>(value: &dyn Any) -> Vec<(String, &dyn Any)>
where
    M: Any,
    K: Display + Any,
    V: Any,
    for<'a> &'a M: IntoIterator<Item = (&'a K, &'a V)>,
{
    match value.downcast_ref::<M>() {
        Some(map) => map
            .into_iter()
            .map(|(k, v)| (k.to_string(), v as &dyn Any))
            .collect(),
        None => Vec::new(),
    }
}

impl TypeDesc {
    /// Build a collection descriptor for container `C` holding items of
    /// type `T`.
    ///
    /// Pass `Some(element)` when the descriptor is used for a nested
    /// field; pass `None` for a bare top-level registration whose
    /// element type arrives as a generic parameter on the binding.
    /// Items are added in document order; ordering is preserved exactly
    /// when `C` honors insertion order (`Vec` does, `HashSet` does not).
    #[must_use]
    pub fn collection<C, T>(element: Option<Arc<TypeDesc>>) -> Arc<TypeDesc>
    where
        C: Default + Extend<T> + Any,
        for<'a> &'a C: IntoIterator<Item = &'a T>,
        T: Any,
    {
        Arc::new(TypeDesc::from_shape(
            short_type_name::<C>(),
            Shape::Collection(CollectionShape {
                construct: Box::new(construct_default::<C>),
                push: Box::new(collection_push::<C, T>),
                element,
                items: Box::new(collection_items::<C, T>),
            }),
        ))
    }

    /// Build a map descriptor for container `M` keyed by `K` with
    /// values of type `V`.
    ///
    /// Keys are taken from child element tag names and converted via
    /// `key`'s scalar parse capability, so `K` must display back for
    /// diagnostics. As with collections, `None` defers the key/value
    /// descriptors to the binding's generic parameters.
    #[must_use]
    pub fn map<M, K, V>(key: Option<Arc<TypeDesc>>, value: Option<Arc<TypeDesc>>) -> Arc<TypeDesc>
    where
        M: Default + MapPut<K, V> + Any,
        for<'a> &'a M: IntoIterator<Item = (&'a K, &'a V)>,
        K: Display + Any,
        V: Any,
    {
        Arc::new(TypeDesc::from_shape(
            short_type_name::<M>(),
            Shape::Map(MapShape {
                construct: Box::new(construct_default::<M>),
                insert: Box::new(map_insert::<M, K, V>),
                key,
                value,
                entries: Box::new(map_entries::<M, K, V>),
            }),
        ))
    }
}

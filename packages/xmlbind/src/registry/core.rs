//! Type registry mapping tag names to bindings.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::descriptor::{TypeDesc, Value};
use crate::error::{BindError, Result};

/// Callback invoked once per successfully built top-level instance.
pub type Consumer = Box<dyn Fn(Value) + Send + Sync>;

/// Registry entry: target type, optional consumer, optional generic
/// parameter descriptors (one for a collection's element type, two for
/// a map's key and value types).
pub struct Binding {
    ty: Arc<TypeDesc>,
    consumer: Option<Consumer>,
    params: Vec<Arc<TypeDesc>>,
}

impl Binding {
    /// Descriptor of the bound type.
    #[must_use]
    pub fn type_desc(&self) -> &Arc<TypeDesc> {
        &self.ty
    }

    /// Generic parameter descriptors recorded at registration.
    #[must_use]
    pub fn params(&self) -> &[Arc<TypeDesc>] {
        &self.params
    }

    pub(crate) fn consumer(&self) -> Option<&Consumer> {
        self.consumer.as_ref()
    }
}

/// Registry mapping tag names to bindings.
///
/// Populated once during setup; lookups during a load never mutate it,
/// so a finished registry can be shared across concurrent load calls.
pub struct TypeRegistry {
    bindings: HashMap<String, Binding>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Register a binding for a tag name.
    ///
    /// Re-registering a tag silently replaces the previous binding.
    ///
    /// # Errors
    /// Returns `BlankTag` if the tag name is empty or whitespace.
    pub fn register(&mut self, tag: impl Into<String>, ty: Arc<TypeDesc>) -> Result<()> {
        self.register_with(tag, ty, None, Vec::new())
    }

    /// Register a binding with an optional consumer and generic
    /// parameter descriptors.
    ///
    /// # Errors
    /// Returns `BlankTag` if the tag name is empty or whitespace.
    pub fn register_with(
        &mut self,
        tag: impl Into<String>,
        ty: Arc<TypeDesc>,
        consumer: Option<Consumer>,
        params: Vec<Arc<TypeDesc>>,
    ) -> Result<()> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(BindError::BlankTag);
        }
        self.bindings.insert(
            tag,
            Binding {
                ty,
                consumer,
                params,
            },
        );
        Ok(())
    }

    /// Look up the binding for a tag name.
    ///
    /// `None` is a normal outcome, not an error: the dispatch driver
    /// uses it to decide between "root is the typed document" and
    /// "root's children name the documents".
    #[must_use]
    pub fn lookup(&self, tag: &str) -> Option<&Binding> {
        self.bindings.get(tag)
    }

    /// Check if a binding is registered for a tag.
    #[must_use]
    pub fn has_binding(&self, tag: &str) -> bool {
        self.bindings.contains_key(tag)
    }

    /// Return set of all registered tag names.
    #[must_use]
    pub fn registered_tags(&self) -> HashSet<&str> {
        self.bindings.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TypeRegistry::new();
        registry.register("port", TypeDesc::scalar::<u16>()).unwrap();

        assert!(registry.lookup("port").is_some());
        assert!(registry.lookup("missing").is_none());
        assert!(registry.has_binding("port"));
    }

    #[test]
    fn test_blank_tag_rejected() {
        let mut registry = TypeRegistry::new();
        assert!(matches!(
            registry.register("", TypeDesc::scalar::<u16>()),
            Err(BindError::BlankTag)
        ));
        assert!(matches!(
            registry.register("   ", TypeDesc::scalar::<u16>()),
            Err(BindError::BlankTag)
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = TypeRegistry::new();
        registry.register("v", TypeDesc::scalar::<u16>()).unwrap();
        registry.register("v", TypeDesc::scalar::<bool>()).unwrap();

        let binding = registry.lookup("v").unwrap();
        assert_eq!(binding.type_desc().name(), "bool");
    }

    #[test]
    fn test_registered_tags() {
        let mut registry = TypeRegistry::new();
        registry.register("a", TypeDesc::scalar::<i32>()).unwrap();
        registry.register("b", TypeDesc::scalar::<i32>()).unwrap();

        let tags = registry.registered_tags();
        assert!(tags.contains("a"));
        assert!(tags.contains("b"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_binding_params_recorded() {
        let mut registry = TypeRegistry::new();
        registry
            .register_with(
                "numbers",
                TypeDesc::collection::<Vec<i64>, i64>(None),
                None,
                vec![TypeDesc::scalar::<i64>()],
            )
            .unwrap();

        let binding = registry.lookup("numbers").unwrap();
        assert_eq!(binding.params().len(), 1);
        assert_eq!(binding.params()[0].name(), "i64");
    }
}

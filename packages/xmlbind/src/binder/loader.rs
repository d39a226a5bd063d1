//! The binder: load entry points and root dispatch.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use roxmltree::{Document, Node};
use tracing::Level;

use super::build;
use super::context::LoadContext;
use crate::descriptor::TypeDesc;
use crate::dump;
use crate::error::BindError;
use crate::registry::{Binding, Consumer, TypeRegistry};
use crate::xml::{element_children, get_tag_name};

/// Reads a document into instances of registered types.
///
/// The document has structure
/// `<root><tag><field>value</field>...</tag>...</root>`, where each
/// `tag` matches a name registered in the [`TypeRegistry`] - or the
/// root itself carries a registered tag and is the single document
/// instance. Instances are built strictly in document order; each one
/// is handed to its binding's consumer before the next sibling is
/// processed.
///
/// No load entry point returns an error to the caller: failures are
/// logged and folded into a single error flag, and a load always runs
/// to completion over whatever the document still offers.
pub struct Binder {
    registry: TypeRegistry,
    echo: bool,
    error: bool,
}

impl Binder {
    /// Create a binder over a populated registry.
    ///
    /// Echoing of built instances to the log is on by default.
    #[must_use]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            echo: true,
            error: false,
        }
    }

    /// Enable or disable the diagnostic echo of built instances.
    ///
    /// The echo borrows each instance and is written before the
    /// consumer takes ownership of it, so anything the consumer logs
    /// for an instance appears after that instance's echo lines.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Register a binding, chainable.
    ///
    /// A blank tag name is accumulated as an error rather than raised.
    pub fn add(&mut self, tag: impl Into<String>, ty: Arc<TypeDesc>) -> &mut Self {
        self.add_binding(tag, ty, None, Vec::new())
    }

    /// Register a binding with an optional consumer and generic
    /// parameter descriptors, chainable.
    pub fn add_binding(
        &mut self,
        tag: impl Into<String>,
        ty: Arc<TypeDesc>,
        consumer: Option<Consumer>,
        params: Vec<Arc<TypeDesc>>,
    ) -> &mut Self {
        if let Err(err) = self.registry.register_with(tag, ty, consumer, params) {
            self.fail(&err);
        }
        self
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// `true` if any load or registration since the last reset failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Set or clear the accumulated error flag.
    pub fn set_error(&mut self, error: bool) {
        self.error = error;
    }

    /// Load a document from a file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(xml) => self.load_str(&xml),
            Err(err) => {
                self.error = true;
                tracing::error!(
                    path = %path.display(),
                    error = %BindError::Io(err),
                    "cannot read file"
                );
            }
        }
    }

    /// Load a document from a byte stream, reading it to the end
    /// before parsing.
    pub fn load_reader(&mut self, mut reader: impl Read) {
        let mut xml = String::new();
        match reader.read_to_string(&mut xml) {
            Ok(_) => self.load_str(&xml),
            Err(err) => self.fail(&BindError::Io(err)),
        }
    }

    /// Load a document from a string.
    pub fn load_str(&mut self, xml: &str) {
        match Document::parse(xml) {
            Ok(doc) => self.dispatch_root(doc.root_element()),
            Err(err) => self.fail(&BindError::Document(err)),
        }
    }

    /// Root dispatch: the root tag itself may be registered, otherwise
    /// each immediate child whose tag resolves yields one instance.
    /// Children without a binding are skipped; that is how documents
    /// holding several unrelated typed sections are supported.
    fn dispatch_root(&mut self, root: Node<'_, '_>) {
        let mut context = LoadContext::new();

        let root_tag = get_tag_name(root);
        if self.registry.has_binding(root_tag) {
            if let Some(binding) = self.registry.lookup(root_tag) {
                Self::build_instance(root, binding, self.echo, &mut context);
            }
        } else {
            let mut matched = 0usize;
            for child in element_children(root) {
                let tag = get_tag_name(child);
                if let Some(binding) = self.registry.lookup(tag) {
                    Self::build_instance(child, binding, self.echo, &mut context);
                    matched += 1;
                } else {
                    tracing::debug!(tag = %tag, "no binding for child element, skipping");
                }
            }
            if matched == 0 {
                context.record(&BindError::BindingNotFound {
                    tag: root_tag.to_string(),
                });
            }
        }

        if context.errored() {
            self.error = true;
        }
    }

    /// Build one instance for a matched binding, echo it, then hand it
    /// to the consumer. A failed build is recorded and the caller moves
    /// on to the next sibling.
    fn build_instance(
        node: Node<'_, '_>,
        binding: &Binding,
        echo: bool,
        context: &mut LoadContext,
    ) {
        match build::build_binding(node, binding, context) {
            Ok(value) => {
                if echo {
                    dump::dump_binding(Level::INFO, get_tag_name(node), value.as_ref(), binding);
                }
                if let Some(consumer) = binding.consumer() {
                    consumer(value);
                }
            }
            Err(err) => context.record(&err),
        }
    }

    fn fail(&mut self, err: &BindError) {
        self.error = true;
        tracing::error!(error = %err, "load failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Value;
    use std::sync::Mutex;

    #[derive(Default, Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn point_desc() -> Arc<TypeDesc> {
        TypeDesc::aggregate::<Point>()
            .field("x", TypeDesc::scalar::<i32>(), |p| &p.x, |p, v| p.x = v)
            .field("y", TypeDesc::scalar::<i32>(), |p| &p.y, |p, v| p.y = v)
            .build()
    }

    fn collecting_consumer<T: Clone + Send + 'static>(
        seen: &Arc<Mutex<Vec<T>>>,
    ) -> Consumer {
        let seen = Arc::clone(seen);
        Box::new(move |value: Value| {
            if let Ok(value) = value.downcast::<T>() {
                if let Ok(mut seen) = seen.lock() {
                    seen.push((*value).clone());
                }
            }
        })
    }

    #[test]
    fn test_root_is_the_registered_type() {
        let seen: Arc<Mutex<Vec<Point>>> = Arc::new(Mutex::new(Vec::new()));
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add_binding("point", point_desc(), Some(collecting_consumer(&seen)), vec![]);

        binder.load_str("<point><x>3</x><y>4</y></point>");

        assert!(!binder.is_error());
        assert_eq!(*seen.lock().unwrap(), vec![Point { x: 3, y: 4 }]);
    }

    #[test]
    fn test_children_name_the_documents() {
        let seen: Arc<Mutex<Vec<Point>>> = Arc::new(Mutex::new(Vec::new()));
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add_binding("point", point_desc(), Some(collecting_consumer(&seen)), vec![]);

        binder.load_str(
            "<options>\
               <point><x>1</x><y>2</y></point>\
               <unrelated>ignored</unrelated>\
               <point><x>3</x><y>4</y></point>\
             </options>",
        );

        assert!(!binder.is_error());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }],
            "instances arrive in document order, unknown children skipped"
        );
    }

    #[test]
    fn test_nothing_matches_sets_error() {
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add("point", point_desc());

        binder.load_str("<options><other>1</other></options>");

        assert!(binder.is_error());
    }

    #[test]
    fn test_malformed_document_sets_error() {
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add("point", point_desc());

        binder.load_str("<point><x>3</point>");

        assert!(binder.is_error());
    }

    #[test]
    fn test_blank_tag_registration_accumulates() {
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add("  ", point_desc());

        assert!(binder.is_error());
        binder.set_error(false);
        assert!(!binder.is_error());
    }

    #[test]
    fn test_bad_field_does_not_stop_siblings() {
        let seen: Arc<Mutex<Vec<Point>>> = Arc::new(Mutex::new(Vec::new()));
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add_binding("point", point_desc(), Some(collecting_consumer(&seen)), vec![]);

        binder.load_str(
            "<options>\
               <point><x>abc</x><y>2</y></point>\
               <point><x>3</x><y>4</y></point>\
             </options>",
        );

        assert!(binder.is_error());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Point { x: 0, y: 2 }, Point { x: 3, y: 4 }],
            "malformed field leaves its default; later siblings still load"
        );
    }

    #[test]
    fn test_replaced_binding_builds_new_type() {
        #[derive(Default, Debug, Clone, PartialEq)]
        struct Named {
            name: String,
        }
        let named = TypeDesc::aggregate::<Named>()
            .field("name", TypeDesc::scalar::<String>(), |n| &n.name, |n, v| n.name = v)
            .build();

        let seen: Arc<Mutex<Vec<Named>>> = Arc::new(Mutex::new(Vec::new()));
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add("foo", point_desc());
        binder.add_binding("foo", named, Some(collecting_consumer(&seen)), vec![]);

        binder.load_str("<foo><name>bar</name></foo>");

        assert!(!binder.is_error());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Named { name: "bar".to_string() }]
        );
    }

    #[test]
    fn test_load_reader() {
        let seen: Arc<Mutex<Vec<Point>>> = Arc::new(Mutex::new(Vec::new()));
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add_binding("point", point_desc(), Some(collecting_consumer(&seen)), vec![]);

        binder.load_reader("<point><x>7</x><y>8</y></point>".as_bytes());

        assert!(!binder.is_error());
        assert_eq!(*seen.lock().unwrap(), vec![Point { x: 7, y: 8 }]);
    }

    #[test]
    fn test_top_level_collection_with_params() {
        let seen: Arc<Mutex<Vec<Vec<i64>>>> = Arc::new(Mutex::new(Vec::new()));
        let mut binder = Binder::new(TypeRegistry::new()).with_echo(false);
        binder.add_binding(
            "numbers",
            TypeDesc::collection::<Vec<i64>, i64>(None),
            Some(collecting_consumer(&seen)),
            vec![TypeDesc::scalar::<i64>()],
        );

        binder.load_str("<numbers><n>1</n><n>2</n></numbers>");

        assert!(!binder.is_error());
        assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2]]);
    }
}

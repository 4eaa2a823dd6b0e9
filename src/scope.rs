// A scope holds the bindings in force at one nesting level. Scopes start
// out sharing the tables of the level above and only take a private copy
// when a declaration is made in them.

use ahash::HashMap;
use std::rc::Rc;

use crate::name::{ResolvedName, XMLNS_NAMESPACE, XML_NAMESPACE};

type Table = HashMap<Rc<str>, Rc<str>>;
type NameCache = HashMap<Box<str>, Rc<ResolvedName>>;

#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    prefix_to_uri: Rc<Table>,
    // last declaration for a uri wins
    uri_to_prefix: Rc<Table>,
    default_uri: Option<Rc<str>>,
    element_names: NameCache,
    attribute_names: NameCache,
    declared_here: Vec<Rc<str>>,
    // true once the tables are private to this scope
    dirty: bool,
}

impl Scope {
    /// A root scope with only the `xml` prefix bound.
    pub(crate) fn root() -> Self {
        let mut scope = Scope::default();
        scope.declare("xml", XML_NAMESPACE);
        scope
    }

    /// Empty this scope so it can serve as a fresh root, keeping the
    /// allocations of its caches.
    pub(crate) fn clear(&mut self) {
        self.prefix_to_uri = Rc::default();
        self.uri_to_prefix = Rc::default();
        self.default_uri = None;
        self.element_names.clear();
        self.attribute_names.clear();
        self.declared_here.clear();
        self.dirty = false;
    }

    pub(crate) fn declare(&mut self, prefix: &str, uri: &str) -> bool {
        if prefix == "xmlns" || (prefix == "xml" && uri != XML_NAMESPACE) {
            return false;
        }
        if !self.dirty {
            self.copy_tables();
        }
        // a cached name may depend on the binding we're about to change
        self.element_names.clear();
        self.attribute_names.clear();

        let prefix: Rc<str> = prefix.into();
        if prefix.is_empty() {
            self.default_uri = if uri.is_empty() {
                None
            } else {
                Some(uri.into())
            };
        } else {
            let uri: Rc<str> = uri.into();
            // both tables are private at this point, so this never clones
            Rc::make_mut(&mut self.prefix_to_uri).insert(prefix.clone(), uri.clone());
            Rc::make_mut(&mut self.uri_to_prefix).insert(uri, prefix.clone());
        }
        self.declared_here.push(prefix);
        true
    }

    fn copy_tables(&mut self) {
        self.prefix_to_uri = Rc::new(self.prefix_to_uri.as_ref().clone());
        self.uri_to_prefix = Rc::new(self.uri_to_prefix.as_ref().clone());
        self.element_names.clear();
        self.attribute_names.clear();
        self.dirty = true;
    }

    pub(crate) fn resolve(
        &mut self,
        qname: &str,
        is_attribute: bool,
        namespace_decl_uris: bool,
    ) -> Option<Rc<ResolvedName>> {
        if let Some(name) = self.cache(is_attribute).get(qname) {
            return Some(Rc::clone(name));
        }
        let name = Rc::new(self.split(qname, is_attribute, namespace_decl_uris)?);
        self.cache(is_attribute).insert(qname.into(), Rc::clone(&name));
        Some(name)
    }

    fn cache(&mut self, is_attribute: bool) -> &mut NameCache {
        if is_attribute {
            &mut self.attribute_names
        } else {
            &mut self.element_names
        }
    }

    fn split(
        &self,
        qname: &str,
        is_attribute: bool,
        namespace_decl_uris: bool,
    ) -> Option<ResolvedName> {
        match qname.split_once(':') {
            None => {
                // an unprefixed attribute is never in the default namespace
                let uri: Rc<str> = if is_attribute {
                    if namespace_decl_uris && qname == "xmlns" {
                        XMLNS_NAMESPACE.into()
                    } else {
                        "".into()
                    }
                } else {
                    self.default_uri.clone().unwrap_or_else(|| "".into())
                };
                Some(ResolvedName::new(uri, qname, qname))
            }
            Some((prefix, local)) => {
                let uri = if prefix.is_empty() {
                    self.default_uri.clone()
                } else if prefix == "xmlns" {
                    (is_attribute && namespace_decl_uris).then(|| XMLNS_NAMESPACE.into())
                } else {
                    self.prefix_to_uri.get(prefix).cloned()
                };
                match uri {
                    Some(uri) => Some(ResolvedName::new(uri, local, qname)),
                    None => {
                        log::debug!("unresolved prefix in {}", qname);
                        None
                    }
                }
            }
        }
    }

    /// Derive `child` from this scope for the next depth, reusing the
    /// child's allocations.
    ///
    /// Clean tables are shared outright. Once this scope has declarations of
    /// its own the child gets an eager copy, so that edits made here after a
    /// slide cannot reach a child that was already forked.
    pub(crate) fn fork_into(&self, child: &mut Scope) {
        if self.dirty {
            child.prefix_to_uri = Rc::new(self.prefix_to_uri.as_ref().clone());
            child.uri_to_prefix = Rc::new(self.uri_to_prefix.as_ref().clone());
        } else {
            child.prefix_to_uri = Rc::clone(&self.prefix_to_uri);
            child.uri_to_prefix = Rc::clone(&self.uri_to_prefix);
        }
        child.default_uri = self.default_uri.clone();
        child.element_names.clear();
        child.attribute_names.clear();
        child.declared_here.clear();
        child.dirty = false;
    }

    pub(crate) fn fork(&self) -> Scope {
        let mut child = Scope::default();
        self.fork_into(&mut child);
        child
    }

    pub(crate) fn uri(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            self.default_uri.as_deref()
        } else {
            self.prefix_to_uri.get(prefix).map(|uri| uri.as_ref())
        }
    }

    pub(crate) fn prefix(&self, uri: &str) -> Option<&str> {
        self.uri_to_prefix.get(uri).map(|prefix| prefix.as_ref())
    }

    pub(crate) fn prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.prefix_to_uri.keys().map(|prefix| prefix.as_ref())
    }

    pub(crate) fn prefixes_for_uri<'a>(
        &'a self,
        uri: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.prefix_to_uri
            .iter()
            .filter(move |(_, u)| u.as_ref() == uri)
            .map(|(prefix, _)| prefix.as_ref())
    }

    pub(crate) fn declared_prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.declared_here.iter().map(|prefix| prefix.as_ref())
    }

    #[cfg(test)]
    fn shares_tables_with(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.prefix_to_uri, &other.prefix_to_uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_binds_xml() {
        let scope = Scope::root();
        assert_eq!(scope.uri("xml"), Some(XML_NAMESPACE));
        assert_eq!(scope.prefix(XML_NAMESPACE), Some("xml"));
        assert_eq!(scope.declared_prefixes().collect::<Vec<_>>(), vec!["xml"]);
    }

    #[test]
    fn test_declare_rejects_reserved() {
        let mut scope = Scope::root();
        assert!(!scope.declare("xmlns", "http://example.com"));
        assert!(!scope.declare("xml", "http://example.com"));
        assert!(scope.declare("xml", XML_NAMESPACE));
        assert_eq!(scope.uri("xml"), Some(XML_NAMESPACE));
    }

    #[test]
    fn test_empty_uri_clears_default() {
        let mut scope = Scope::root();
        scope.declare("", "http://example.com");
        assert_eq!(scope.uri(""), Some("http://example.com"));
        scope.declare("", "");
        assert_eq!(scope.uri(""), None);
    }

    #[test]
    fn test_clean_fork_shares_tables() {
        let mut parent = Scope::default();
        let child = parent.fork();
        assert!(child.shares_tables_with(&parent));

        parent.declare("a", "http://example.com");
        let child = parent.fork();
        assert!(!child.shares_tables_with(&parent));
        assert_eq!(child.uri("a"), Some("http://example.com"));
    }

    #[test]
    fn test_declare_unshares_tables() {
        let parent = Scope::root();
        let mut child = parent.fork();
        let mut grandchild = child.fork();
        assert!(grandchild.shares_tables_with(&child));

        grandchild.declare("a", "http://example.com");
        assert!(!grandchild.shares_tables_with(&child));
        assert_eq!(child.uri("a"), None);
        child.declare("b", "http://example.com/b");
        assert_eq!(grandchild.uri("b"), None);
    }

    #[test]
    fn test_forked_child_unaffected_by_later_parent_edits() {
        let mut parent = Scope::root();
        parent.declare("a", "http://example.com/1");
        let child = parent.fork();
        parent.declare("a", "http://example.com/2");
        assert_eq!(child.uri("a"), Some("http://example.com/1"));
    }

    #[test]
    fn test_resolve_caches_per_kind() {
        let mut scope = Scope::root();
        scope.declare("", "http://example.com");
        let element = scope.resolve("x", false, false).unwrap();
        let attribute = scope.resolve("x", true, false).unwrap();
        assert_eq!(element.uri(), "http://example.com");
        assert_eq!(attribute.uri(), "");
        assert!(Rc::ptr_eq(&element, &scope.resolve("x", false, false).unwrap()));
    }

    #[test]
    fn test_declare_invalidates_cache() {
        let mut scope = Scope::root();
        scope.declare("a", "http://example.com/1");
        assert_eq!(
            scope.resolve("a:x", false, false).unwrap().uri(),
            "http://example.com/1"
        );
        scope.declare("a", "http://example.com/2");
        assert_eq!(
            scope.resolve("a:x", false, false).unwrap().uri(),
            "http://example.com/2"
        );
    }

    #[test]
    fn test_unresolved_not_cached() {
        let mut scope = Scope::root();
        assert!(scope.resolve("a:x", false, false).is_none());
        assert!(scope.element_names.is_empty());
    }

    #[test]
    fn test_empty_prefix_uses_default() {
        let mut scope = Scope::root();
        assert!(scope.resolve(":x", false, false).is_none());
        scope.declare("", "http://example.com");
        let name = scope.resolve(":x", true, false).unwrap();
        assert_eq!(name.as_tuple(), ("http://example.com", "x", ":x"));
    }

    #[test]
    fn test_xmlns_names() {
        let mut scope = Scope::root();
        assert_eq!(scope.resolve("xmlns", true, false).unwrap().uri(), "");
        assert!(scope.resolve("xmlns:a", true, false).is_none());

        let mut scope = Scope::root();
        assert_eq!(
            scope.resolve("xmlns", true, true).unwrap().uri(),
            XMLNS_NAMESPACE
        );
        assert_eq!(
            scope.resolve("xmlns:a", true, true).unwrap().uri(),
            XMLNS_NAMESPACE
        );
        assert!(scope.resolve("xmlns:a", false, true).is_none());
    }
}

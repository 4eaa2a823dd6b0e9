use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// The namespace URI bound to the `xml` prefix in every scope.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The namespace URI that `xmlns` attributes live in.
///
/// Names only resolve into this namespace when
/// [`Options::namespace_decl_uris`](crate::Options::namespace_decl_uris) is
/// enabled.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// A qualified name resolved against the bindings in force.
///
/// Holds the namespace URI, the local name and the raw qualified name as it
/// was written. A name that is in no namespace has an empty URI.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ResolvedName {
    uri: Rc<str>,
    local: Box<str>,
    raw: Box<str>,
}

impl ResolvedName {
    pub(crate) fn new(uri: Rc<str>, local: &str, raw: &str) -> Self {
        Self {
            uri,
            local: local.into(),
            raw: raw.into(),
        }
    }

    /// The namespace URI. Empty if the name is not in a namespace.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    /// The qualified name exactly as it was passed in for resolution.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The prefix part of the raw name, or the empty string if it had none.
    pub fn prefix(&self) -> &str {
        self.raw.split_once(':').map_or("", |(prefix, _)| prefix)
    }

    /// The `(uri, local, raw)` triple as string slices.
    pub fn as_tuple(&self) -> (&str, &str, &str) {
        (self.uri(), self.local(), self.raw())
    }
}

// Clark notation, the usual way to show an expanded name
impl Display for ResolvedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.uri.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.uri, self.local)
        }
    }
}

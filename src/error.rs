use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    /// `xmlns` was declared as a prefix, or `xml` was bound to something
    /// other than the XML namespace.
    IllegalDeclaration { prefix: String, uri: String },
    /// A qualified name uses a prefix that is not bound in any enclosing
    /// scope.
    UnknownPrefix(String),
    /// A context was popped while the stack was already at the root.
    EmptyStack,
    Parser(xmlparser::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IllegalDeclaration { prefix, uri } => {
                write!(f, "illegal namespace declaration: {} -> {}", prefix, uri)
            }
            Error::UnknownPrefix(qname) => write!(f, "unknown prefix in name: {}", qname),
            Error::EmptyStack => write!(f, "namespace context popped below the root"),
            Error::Parser(e) => write!(f, "parser error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parser(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Parser(e)
    }
}

//! Scoped resolution of XML qualified names.
//!
//! Streaming XML parsers and serializers need to know, at every element and
//! attribute, which namespace each prefix is bound to. [`ScopeStack`] keeps
//! track of this as a document is walked depth-first and turns qualified
//! names like `prefix:local` into a [`ResolvedName`] holding the namespace
//! URI and local name.
//!
//! ```rust
//! use nscope::ScopeStack;
//!
//! let mut stack = ScopeStack::new();
//! stack.push_context();
//! assert!(stack.declare_prefix("a", "http://example.com"));
//! let name = stack.process_name("a:b", false).unwrap();
//! assert_eq!(name.uri(), "http://example.com");
//! assert_eq!(name.local(), "b");
//! stack.pop_context();
//! assert!(stack.process_name("a:b", false).is_none());
//! ```
//!
//! [`Resolver`] drives a `ScopeStack` over a whole document using the
//! `xmlparser` tokenizer.
#![forbid(unsafe_code)]

mod error;
mod name;
mod options;
mod resolver;
mod scope;
mod stack;

pub use error::Error;
pub use name::{ResolvedName, XMLNS_NAMESPACE, XML_NAMESPACE};
pub use options::{Options, SlideDown};
pub use resolver::{Event, Resolver};
pub use stack::ScopeStack;

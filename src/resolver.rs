use std::rc::Rc;

use xmlparser::{ElementEnd, Token, Tokenizer};

use crate::error::Error;
use crate::name::ResolvedName;
use crate::options::Options;
use crate::stack::ScopeStack;

/// An element boundary or a piece of text, with names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start {
        name: Rc<ResolvedName>,
        /// Attributes in document order. Namespace declarations are only
        /// included when [`Options::namespace_decl_uris`] is set.
        attributes: Vec<(Rc<ResolvedName>, String)>,
        /// `(prefix, uri)` pairs declared on this element. The default
        /// namespace has the empty prefix.
        declarations: Vec<(String, String)>,
    },
    End {
        name: Rc<ResolvedName>,
    },
    /// Text or CDATA content exactly as written; references are not
    /// expanded.
    Text(String),
}

// element start tag seen, but not yet closed with `>` or `/>`
struct PendingElement<'a> {
    qname: String,
    attributes: Vec<(String, &'a str)>,
    declarations: Vec<(String, String)>,
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

/// Resolves the element and attribute names of XML documents.
///
/// The same resolver can be used for any number of documents; its
/// [`ScopeStack`] is reset at the start of each one.
#[derive(Debug, Default)]
pub struct Resolver {
    stack: ScopeStack,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            stack: ScopeStack::with_options(options),
        }
    }

    pub fn stack(&self) -> &ScopeStack {
        &self.stack
    }

    /// Tokenize `xml` and resolve every element and attribute name in it.
    ///
    /// Only namespace well-formedness is checked beyond what the tokenizer
    /// checks; in particular end tags are not matched against start tags.
    pub fn parse(&mut self, xml: &str) -> Result<Vec<Event>, Error> {
        self.stack.reset();
        let mut events = Vec::new();
        let mut open = Vec::new();
        let mut pending = None;

        for token in Tokenizer::from(xml) {
            match token? {
                Token::ElementStart { prefix, local, .. } => {
                    self.stack.push_context();
                    pending = Some(PendingElement {
                        qname: qualified(prefix.as_str(), local.as_str()),
                        attributes: Vec::new(),
                        declarations: Vec::new(),
                    });
                }
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    let (prefix, local, value) = (prefix.as_str(), local.as_str(), value.as_str());
                    let declaration = if prefix == "xmlns" {
                        Some(local)
                    } else if prefix.is_empty() && local == "xmlns" {
                        Some("")
                    } else {
                        None
                    };
                    if let Some(declared) = declaration {
                        self.declare(declared, value)?;
                        if let Some(pending) = pending.as_mut() {
                            pending
                                .declarations
                                .push((declared.to_string(), value.to_string()));
                        }
                        if !self.stack.options().namespace_decl_uris {
                            continue;
                        }
                    }
                    if let Some(pending) = pending.as_mut() {
                        pending.attributes.push((qualified(prefix, local), value));
                    }
                }
                Token::ElementEnd { end, .. } => match end {
                    ElementEnd::Open => {
                        if let Some(element) = pending.take() {
                            let name = self.start(element, &mut events)?;
                            open.push(name);
                        }
                    }
                    ElementEnd::Empty => {
                        if let Some(element) = pending.take() {
                            let name = self.start(element, &mut events)?;
                            events.push(Event::End { name });
                            self.stack.pop_context();
                        }
                    }
                    ElementEnd::Close(..) => {
                        if let Some(name) = open.pop() {
                            events.push(Event::End { name });
                            self.stack.pop_context();
                        }
                    }
                },
                Token::Text { text } | Token::Cdata { text, .. } => {
                    events.push(Event::Text(text.as_str().to_string()));
                }
                _ => {}
            }
        }
        Ok(events)
    }

    fn declare(&mut self, prefix: &str, uri: &str) -> Result<(), Error> {
        if self.stack.declare_prefix(prefix, uri) {
            Ok(())
        } else {
            Err(Error::IllegalDeclaration {
                prefix: prefix.to_string(),
                uri: uri.to_string(),
            })
        }
    }

    fn resolve(&mut self, qname: &str, is_attribute: bool) -> Result<Rc<ResolvedName>, Error> {
        self.stack
            .process_name(qname, is_attribute)
            .ok_or_else(|| Error::UnknownPrefix(qname.to_string()))
    }

    fn start(
        &mut self,
        element: PendingElement,
        events: &mut Vec<Event>,
    ) -> Result<Rc<ResolvedName>, Error> {
        let name = self.resolve(&element.qname, false)?;
        let attributes = element
            .attributes
            .into_iter()
            .map(|(qname, value)| self.resolve(&qname, true).map(|name| (name, value.to_string())))
            .collect::<Result<Vec<_>, Error>>()?;
        events.push(Event::Start {
            name: Rc::clone(&name),
            attributes,
            declarations: element.declarations,
        });
        Ok(name)
    }
}

use std::rc::Rc;

use crate::error::Error;
use crate::name::{ResolvedName, XML_NAMESPACE};
use crate::options::{Options, SlideDown};
use crate::scope::Scope;

#[derive(Debug)]
enum Slot {
    // allocated earlier but not attached to anything since the last reset
    Vacant(Scope),
    Active(Scope),
    // this depth uses the scope stored at a lower depth
    Alias(usize),
}

/// The namespace bindings in force at each depth of a document.
///
/// A parser or serializer walks the document depth-first: it calls
/// [`push_context`](ScopeStack::push_context) on entering an element,
/// [`declare_prefix`](ScopeStack::declare_prefix) for each namespace
/// declaration on it, [`process_name`](ScopeStack::process_name) for the
/// element name and each attribute name, and
/// [`pop_context`](ScopeStack::pop_context) when leaving it.
///
/// Scopes are recycled: popping keeps the scope around for the next push at
/// that depth, and [`reset`](ScopeStack::reset) makes the whole stack ready
/// for another document without freeing anything.
///
/// A `ScopeStack` is meant to be owned by a single parser at a time; it is
/// neither `Send` nor `Sync`.
#[derive(Debug)]
pub struct ScopeStack {
    slots: Vec<Slot>,
    depth: usize,
    options: Options,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack at depth 0 with only the `xml` prefix bound.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            slots: vec![Slot::Active(Scope::root())],
            depth: 0,
            options,
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Make the stack ready for a new document.
    ///
    /// Goes back to depth 0 with only the `xml` prefix bound. The scopes
    /// allocated for deeper levels are emptied but kept for reuse.
    pub fn reset(&mut self) {
        log::trace!("reset namespace stack from depth {}", self.depth);
        self.depth = 0;
        for (depth, slot) in self.slots.iter_mut().enumerate() {
            let mut scope = match std::mem::replace(slot, Slot::Alias(0)) {
                Slot::Active(scope) | Slot::Vacant(scope) => scope,
                Slot::Alias(_) => Scope::default(),
            };
            scope.clear();
            *slot = if depth == 0 {
                scope.declare("xml", XML_NAMESPACE);
                Slot::Active(scope)
            } else {
                Slot::Vacant(scope)
            };
        }
    }

    /// Descend one level, as when an element is entered.
    ///
    /// The new level starts out with all bindings of the level above.
    pub fn push_context(&mut self) {
        self.depth += 1;
        log::trace!("push namespace context to depth {}", self.depth);
        self.attach(self.depth);
    }

    /// Go back up one level, discarding the declarations made at the
    /// current one.
    ///
    /// # Panics
    ///
    /// Panics if the stack is already at depth 0. That means the calls to
    /// push and pop are not paired up; use
    /// [`try_pop_context`](ScopeStack::try_pop_context) to get an error
    /// instead.
    pub fn pop_context(&mut self) {
        if self.depth == 0 {
            panic!("pop_context called on an empty namespace stack");
        }
        self.depth -= 1;
        log::trace!("pop namespace context to depth {}", self.depth);
    }

    pub fn try_pop_context(&mut self) -> Result<(), Error> {
        if self.depth == 0 {
            return Err(Error::EmptyStack);
        }
        self.pop_context();
        Ok(())
    }

    /// Move up one level without any pairing with an earlier push.
    ///
    /// For streaming parsers that track nesting themselves. The scope at the
    /// old depth is kept as-is, so a later
    /// [`slide_context_down`](ScopeStack::slide_context_down) returns to it
    /// with its declarations intact.
    ///
    /// # Panics
    ///
    /// Panics if the stack is already at depth 0.
    pub fn slide_context_up(&mut self) {
        assert!(self.depth > 0, "slide_context_up at depth 0");
        self.depth -= 1;
        log::trace!("slide namespace context up to depth {}", self.depth);
    }

    /// Move down one level without creating a new scope.
    ///
    /// If a scope was left at that depth by an earlier push or slide it is
    /// reused with whatever it declared. Otherwise what happens depends on
    /// [`Options::slide_down`]: with [`SlideDown::Alias`] the new depth
    /// shares the scope one level up, so declarations made there are also
    /// seen one level up; with [`SlideDown::Fork`] it gets a fork of it, as
    /// with [`push_context`](ScopeStack::push_context).
    pub fn slide_context_down(&mut self) {
        self.depth += 1;
        let depth = self.depth;
        log::trace!("slide namespace context down to depth {}", depth);
        if matches!(self.slots.get(depth), Some(Slot::Active(_)) | Some(Slot::Alias(_))) {
            return;
        }
        match self.options.slide_down {
            SlideDown::Alias => {
                let target = self.index(depth - 1);
                if depth == self.slots.len() {
                    self.slots.push(Slot::Alias(target));
                } else {
                    self.slots[depth] = Slot::Alias(target);
                }
            }
            SlideDown::Fork => self.attach(depth),
        }
    }

    /// Bind `prefix` to `uri` at the current depth.
    ///
    /// The empty prefix sets the default namespace; binding it to the empty
    /// URI removes the default namespace again.
    ///
    /// Returns `false`, leaving the bindings untouched, if the declaration
    /// is illegal: `xmlns` can never be declared and `xml` can only be bound
    /// to [`XML_NAMESPACE`].
    pub fn declare_prefix(&mut self, prefix: &str, uri: &str) -> bool {
        let declared = self.current_mut().declare(prefix, uri);
        if !declared {
            log::debug!("rejected namespace declaration {} -> {}", prefix, uri);
        }
        declared
    }

    /// Resolve a qualified name against the bindings at the current depth.
    ///
    /// Unprefixed element names are in the default namespace if there is
    /// one; unprefixed attribute names never are. Returns `None` if the name
    /// uses a prefix that is not bound.
    ///
    /// Results are cached per depth until the next declaration there, so
    /// resolving the same name again hands out the same [`ResolvedName`].
    pub fn process_name(&mut self, qname: &str, is_attribute: bool) -> Option<Rc<ResolvedName>> {
        let namespace_decl_uris = self.options.namespace_decl_uris;
        self.current_mut()
            .resolve(qname, is_attribute, namespace_decl_uris)
    }

    /// The URI bound to `prefix`. The empty prefix gives the default
    /// namespace.
    pub fn get_uri(&self, prefix: &str) -> Option<&str> {
        self.current().uri(prefix)
    }

    /// A prefix bound to `uri`.
    ///
    /// If several prefixes were declared for the same URI, this is the one
    /// declared last. That declaration may since have been shadowed.
    pub fn get_prefix(&self, uri: &str) -> Option<&str> {
        self.current().prefix(uri)
    }

    /// All prefixes currently bound, in no particular order. The default
    /// namespace is not included.
    pub fn get_prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.current().prefixes()
    }

    /// All prefixes currently bound to `uri`, in no particular order. The
    /// default namespace is not included.
    pub fn get_prefixes_for_uri<'a>(
        &'a self,
        uri: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.current().prefixes_for_uri(uri)
    }

    /// The prefixes declared at the current depth, in declaration order.
    /// A declaration of the default namespace shows up as the empty prefix.
    pub fn get_declared_prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.current().declared_prefixes()
    }

    // fork the scope one level up into the slot at depth, growing the
    // stack if needed
    fn attach(&mut self, depth: usize) {
        if depth == self.slots.len() {
            self.slots.push(Slot::Vacant(Scope::default()));
        }
        let parent_index = self.index(depth - 1);
        let (below, above) = self.slots.split_at_mut(depth);
        let parent = match &below[parent_index] {
            Slot::Active(scope) => scope,
            _ => unreachable!("parent slot is not active"),
        };
        let slot = &mut above[0];
        *slot = match std::mem::replace(slot, Slot::Alias(0)) {
            Slot::Active(mut scope) | Slot::Vacant(mut scope) => {
                parent.fork_into(&mut scope);
                Slot::Active(scope)
            }
            Slot::Alias(_) => Slot::Active(parent.fork()),
        };
    }

    // the slot that actually holds the scope for depth
    fn index(&self, mut depth: usize) -> usize {
        while let Slot::Alias(target) = self.slots[depth] {
            depth = target;
        }
        depth
    }

    fn current(&self) -> &Scope {
        match &self.slots[self.index(self.depth)] {
            Slot::Active(scope) => scope,
            _ => unreachable!("current slot is not active"),
        }
    }

    fn current_mut(&mut self) -> &mut Scope {
        let index = self.index(self.depth);
        match &mut self.slots[index] {
            Slot::Active(scope) => scope,
            _ => unreachable!("current slot is not active"),
        }
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What `slide_context_down` does when it reaches a depth that has no
/// scope allocated yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SlideDown {
    /// Reuse the scope one level up as-is. Declarations made after the
    /// slide land in that shared scope and stay visible once the caller
    /// slides back up.
    #[default]
    Alias,
    /// Fork the scope one level up, the same way `push_context` does.
    Fork,
}

/// Behavior switches for a [`ScopeStack`](crate::ScopeStack).
///
/// These survive [`ScopeStack::reset`](crate::ScopeStack::reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    pub slide_down: SlideDown,
    /// Resolve `xmlns` and `xmlns:*` attribute names into
    /// [`XMLNS_NAMESPACE`](crate::XMLNS_NAMESPACE) instead of treating
    /// them as unnamespaced or unresolvable.
    pub namespace_decl_uris: bool,
}

impl Options {
    pub fn with_slide_down(mut self, slide_down: SlideDown) -> Self {
        self.slide_down = slide_down;
        self
    }

    pub fn with_namespace_decl_uris(mut self, namespace_decl_uris: bool) -> Self {
        self.namespace_decl_uris = namespace_decl_uris;
        self
    }
}

//! Link targets resolved at render time.

use std::fmt;
use std::rc::Rc;

use super::NodeRef;
use crate::error::{Error, Result};

/// A link or image target.
///
/// Deferred references run their callback only when resolved, which lets a
/// link point at a heading whose anchor is assigned later by
/// [`generate_ids`](crate::generate_ids). Resolve them only after anchors
/// have been generated for every document that may be targeted.
#[derive(Clone)]
pub enum Reference {
    /// A fixed target string
    Static(String),
    /// A callback producing the target; `None` means unresolvable
    Deferred(Rc<dyn Fn() -> Option<String>>),
}

impl Reference {
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + 'static,
    {
        Reference::Deferred(Rc::new(f))
    }

    /// Point at a heading's anchor.
    ///
    /// Only a weak handle is kept, so the reference fails to resolve once the
    /// heading is dropped, or while it has no anchor.
    pub fn to_heading(heading: &NodeRef) -> Self {
        let heading = heading.downgrade();
        Reference::deferred(move || heading.upgrade()?.heading_link())
    }

    pub fn resolve(&self) -> Result<String> {
        match self {
            Reference::Static(target) => Ok(target.clone()),
            Reference::Deferred(f) => f().ok_or_else(|| {
                Error::UnresolvedReference("target has no published anchor".to_string())
            }),
        }
    }
}

impl From<&str> for Reference {
    fn from(target: &str) -> Self {
        Reference::Static(target.to_string())
    }
}

impl From<String> for Reference {
    fn from(target: String) -> Self {
        Reference::Static(target)
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Static(target) => f.debug_tuple("Static").field(target).finish(),
            Reference::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

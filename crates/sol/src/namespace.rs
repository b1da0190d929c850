use std::{cell::RefCell, rc::Rc};

use ahash::AHashMap;

use crate::value::Value;

/// Shared handle to one scope frame.
///
/// Frames are reference counted so closures can hold their defining scope
/// alive; `RefCell` gives the single-threaded interior mutability assignment
/// needs. This is the only mutable object in the value model.
pub(crate) type ScopeRef = Rc<RefCell<Namespace>>;

/// One frame of the lexical environment: a name-to-value mapping plus a
/// parent pointer. Lookup walks outward; assignment always writes the
/// innermost frame.
#[derive(Debug, Default)]
pub(crate) struct Namespace {
    bindings: AHashMap<String, Value>,
    parent: Option<ScopeRef>,
}

impl Namespace {
    /// Creates a root frame with no parent (the driver's persistent scope).
    pub fn global() -> ScopeRef {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates a child frame for a closure call, chained to the closure's
    /// captured scope.
    pub fn child_of(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            bindings: AHashMap::new(),
            parent: Some(parent.clone()),
        }))
    }

    /// Resolves a name by walking the frame chain outward.
    pub fn lookup(scope: &ScopeRef, name: &str) -> Option<Value> {
        let mut current = scope.clone();
        loop {
            let next = {
                let frame = current.borrow();
                if let Some(value) = frame.bindings.get(name) {
                    return Some(value.clone());
                }
                frame.parent.clone()
            };
            current = next?;
        }
    }

    /// Binds a name in the innermost frame, shadowing any outer binding.
    pub fn assign(scope: &ScopeRef, name: impl Into<String>, value: Value) {
        scope.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Names bound directly in this frame, in no particular order.
    pub fn local_names(scope: &ScopeRef) -> Vec<String> {
        scope.borrow().bindings.keys().cloned().collect()
    }
}

//! Lexical scopes for the interpreter.
//!
//! Scopes form a parent chain: builtins, then the module, then one scope per
//! function call. A function value keeps the scope it was defined in, so a
//! helper nested in the kernel body resolves its sibling helpers through
//! that chain. Assignment always binds in the innermost scope.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use kern_ir::Name;

use crate::Value;

/// Single-threaded shared scope.
///
/// All scope allocations go through [`LocalScope::new`].
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// What kind of block owns a scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Builtins,
    Module,
    Function,
    /// A `class` body. Functions defined here do not see its bindings.
    Class,
    /// A list comprehension.
    Comprehension,
}

/// One scope's bindings and its parent.
struct Scope {
    kind: ScopeKind,
    bindings: FxHashMap<Name, Value>,
    /// Binding order, for class bodies.
    order: Vec<Name>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.borrow().lookup(name)
    }
}

/// Handle to a scope chain.
#[derive(Clone)]
pub struct Environment {
    scope: LocalScope<Scope>,
}

impl Environment {
    /// A root scope with no parent.
    pub fn root(kind: ScopeKind) -> Self {
        Environment {
            scope: LocalScope::new(Scope {
                kind,
                bindings: FxHashMap::default(),
                order: Vec::new(),
                parent: None,
            }),
        }
    }

    /// A new innermost scope whose parent is `self`.
    pub fn child(&self, kind: ScopeKind) -> Self {
        Environment {
            scope: LocalScope::new(Scope {
                kind,
                bindings: FxHashMap::default(),
                order: Vec::new(),
                parent: Some(self.scope.clone()),
            }),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.scope.borrow().kind
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: Name, value: Value) {
        let mut scope = self.scope.borrow_mut();
        if scope.bindings.insert(name, value).is_none() {
            scope.order.push(name);
        }
    }

    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scope.borrow().lookup(name)
    }

    /// The scope a function defined here closes over: class bodies are
    /// skipped.
    pub fn enclosing_function_scope(&self) -> Environment {
        let mut env = self.clone();
        while env.kind() == ScopeKind::Class {
            let parent = env.scope.borrow().parent.clone();
            match parent {
                Some(scope) => env = Environment { scope },
                None => break,
            }
        }
        env
    }

    /// This scope's own bindings, in the order they were first bound.
    pub fn own_bindings(&self) -> Vec<(Name, Value)> {
        let scope = self.scope.borrow();
        scope
            .order
            .iter()
            .filter_map(|name| Some((*name, scope.bindings.get(name)?.clone())))
            .collect()
    }

    pub fn same_scope(&self, other: &Environment) -> bool {
        self.scope.ptr_eq(&other.scope)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        f.debug_struct("Environment")
            .field("kind", &scope.kind)
            .field("bindings", &scope.order.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use kern_ir::StringInterner;

    use super::{Environment, ScopeKind};
    use crate::Value;

    #[test]
    fn test_child_shadows_parent() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let root = Environment::root(ScopeKind::Module);
        root.define(x, Value::Int(1));
        let child = root.child(ScopeKind::Function);
        assert_eq!(child.lookup(x), Some(Value::Int(1)));

        child.define(x, Value::Int(2));
        assert_eq!(child.lookup(x), Some(Value::Int(2)));
        assert_eq!(root.lookup(x), Some(Value::Int(1)));
    }

    #[test]
    fn test_missing_name() {
        let interner = StringInterner::new();
        let env = Environment::root(ScopeKind::Builtins).child(ScopeKind::Module);
        assert_eq!(env.lookup(interner.intern("nope")), None);
    }

    #[test]
    fn test_class_scope_is_skipped_for_closures() {
        let module = Environment::root(ScopeKind::Module);
        let class = module.child(ScopeKind::Class);
        assert!(class.enclosing_function_scope().same_scope(&module));
        let function = module.child(ScopeKind::Function);
        assert!(function.enclosing_function_scope().same_scope(&function));
    }

    #[test]
    fn test_own_bindings_keep_first_binding_order() {
        let interner = StringInterner::new();
        let (a, b) = (interner.intern("a"), interner.intern("b"));
        let env = Environment::root(ScopeKind::Class);
        env.define(b, Value::Int(1));
        env.define(a, Value::Int(2));
        env.define(b, Value::Int(3));
        assert_eq!(
            env.own_bindings(),
            vec![(b, Value::Int(3)), (a, Value::Int(2))]
        );
    }
}

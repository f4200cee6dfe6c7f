use std::collections::HashMap;

/// Index of a [`Scope`] inside a [`SymbolTable`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

struct Scope<T> {
  bindings: HashMap<String, T>,
  parent: Option<ScopeId>,
}

/// A lexical scope chain represented as an arena of frames addressed by
/// index rather than a `Rc<RefCell<_>>` graph — lookup walks parent
/// indices instead of pointers, so there is no reference-counting or
/// interior mutability anywhere in the chain itself. Generic over the
/// payload so the same structure serves the type checker (`T = Type`)
/// and the IR generator (`T = IRVar`).
pub struct SymbolTable<T> {
  scopes: Vec<Scope<T>>,
  current: ScopeId,
}

impl<T: Clone> SymbolTable<T> {
  pub fn new() -> Self {
    Self {
      scopes: vec![Scope {
        bindings: HashMap::new(),
        parent: None,
      }],
      current: ScopeId(0),
    }
  }

  /// Pushes a new child scope onto the current one and makes it current.
  pub fn enter_scope(&mut self) {
    let parent = self.current;
    self.scopes.push(Scope {
      bindings: HashMap::new(),
      parent: Some(parent),
    });
    self.current = ScopeId(self.scopes.len() - 1);
  }

  /// Leaves the current scope and returns to its parent. Panics if
  /// called on the top-level scope — callers push/pop in matched pairs.
  pub fn exit_scope(&mut self) {
    let parent = self.scopes[self.current.0]
      .parent
      .expect("exit_scope called on the top-level scope");
    self.current = parent;
  }

  /// Binds `name` in the innermost (current) scope, shadowing any outer
  /// binding of the same name.
  pub fn define(&mut self, name: impl Into<String>, value: T) {
    self.scopes[self.current.0].bindings.insert(name.into(), value);
  }

  /// Looks up `name`, walking outward through parent scopes.
  pub fn lookup(&self, name: &str) -> Option<T> {
    let mut scope_id = Some(self.current);
    while let Some(id) = scope_id {
      let scope = &self.scopes[id.0];
      if let Some(value) = scope.bindings.get(name) {
        return Some(value.clone());
      }
      scope_id = scope.parent;
    }
    None
  }

  /// Rebinds an existing entry in whichever scope it was found, used by
  /// assignment typing to update an identifier's recorded type in
  /// place. Returns `false` if `name` is unbound anywhere in the chain.
  pub fn assign(&mut self, name: &str, value: T) -> bool {
    let mut scope_id = Some(self.current);
    while let Some(id) = scope_id {
      if self.scopes[id.0].bindings.contains_key(name) {
        self.scopes[id.0].bindings.insert(name.to_string(), value);
        return true;
      }
      scope_id = self.scopes[id.0].parent;
    }
    false
  }
}

impl<T: Clone> Default for SymbolTable<T> {
  fn default() -> Self {
    Self::new()
  }
}

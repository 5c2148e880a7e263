//! Scoped symbol table.
//!
//! A stack of scopes, each mapping identifiers to their type metadata and
//! bound value. The global scope is pushed when the stack is created; the
//! evaluator pushes one scope per function definition (to check its
//! parameter list) and one per function call activation. While a call
//! runs, the scopes opened after the function's definition are detached, so
//! the body resolves names lexically rather than through its callers.
//!
//! Lookups either stay in the current scope (assignment binds locally) or
//! search from the innermost scope outwards (reads see enclosing bindings):
//! ```text
//! x <- 1
//! f <- function(a) { a + x }   # `x` resolves to the global binding
//! ```

use core::fmt;

use hashbrown::HashMap;
use tracing::debug;

use crate::{types::TypeInfo, values::Value};

/// A named binding.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTableEntry {
    pub name: String,
    pub info: TypeInfo,
    /// `None` while the entry is a placeholder awaiting its value.
    pub value: Option<Value>,
}

impl SymbolTableEntry {
    pub fn new(name: impl Into<String>, info: TypeInfo, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            info,
            value,
        }
    }

    /// Entry for a name whose value is still being computed.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name, TypeInfo::placeholder(), None)
    }
}

/// One lexical level of bindings. Names are unique within a scope.
#[derive(Debug, Default)]
struct Scope {
    entries: HashMap<String, SymbolTableEntry>,
}

impl Scope {
    fn lookup(&self, name: &str) -> Option<&SymbolTableEntry> {
        self.entries.get(name)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Scopes set aside by [`ScopeStack::detach_above`] while a function body
/// runs against its defining environment.
#[derive(Debug)]
#[must_use = "detached scopes must be handed back to `reattach`"]
pub struct DetachedScopes(Vec<Scope>);

/// A stack of scopes for identifier lookup.
///
/// Searched from innermost to outermost; inner bindings shadow outer ones.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Create a stack holding only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Number of scopes currently on the stack.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a fresh, empty scope.
    pub fn begin_scope(&mut self) {
        self.scopes.push(Scope::default());
        debug!(depth = self.scopes.len(), "entering scope");
    }

    /// Pop the topmost scope from the stack.
    ///
    /// Returns an error if the stack is empty.
    pub fn end_scope(&mut self) -> Result<(), PopError> {
        self.scopes.pop().ok_or(PopError::EmptyStack)?;
        debug!(depth = self.scopes.len(), "exiting scope");
        Ok(())
    }

    /// Add an entry to the current scope.
    ///
    /// Returns false, leaving the scope untouched, if the name is already
    /// bound there or the stack is empty.
    pub fn add_entry(&mut self, entry: SymbolTableEntry) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.entries.contains_key(&entry.name) {
            return false;
        }
        debug!(name = %entry.name, class = %entry.info.class, "adding symbol");
        scope.entries.insert(entry.name.clone(), entry);
        true
    }

    /// Look up a name in the current scope only.
    pub fn find_entry(&self, name: &str) -> Option<&SymbolTableEntry> {
        self.scopes.last()?.lookup(name)
    }

    /// Look up a name, searching scopes from innermost to outermost.
    pub fn find_entry_in_any_scope(&self, name: &str) -> Option<&SymbolTableEntry> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(name))
    }

    /// Overwrite an existing entry in the current scope.
    pub fn change_entry(&mut self, entry: SymbolTableEntry) -> Result<(), BindError> {
        let scope = self.scopes.last_mut().ok_or(BindError::NoScope)?;
        match scope.entries.get_mut(&entry.name) {
            Some(existing) => {
                *existing = entry;
                Ok(())
            }
            None => Err(BindError::NameNotDeclared(entry.name)),
        }
    }

    /// Remove a name from the current scope, returning its entry.
    pub fn remove_entry(&mut self, name: &str) -> Option<SymbolTableEntry> {
        self.scopes.last_mut()?.entries.remove(name)
    }

    /// Number of bindings in the current scope.
    pub fn num_entries(&self) -> usize {
        self.scopes.last().map_or(0, Scope::len)
    }

    /// Hide every scope above the first `depth` ones.
    ///
    /// Lookups then see only the outer `depth` scopes until the detached
    /// ones are restored with [`ScopeStack::reattach`].
    pub fn detach_above(&mut self, depth: usize) -> DetachedScopes {
        let at = depth.min(self.scopes.len());
        let detached = self.scopes.split_off(at);
        if !detached.is_empty() {
            debug!(depth = at, hidden = detached.len(), "detaching scopes");
        }
        DetachedScopes(detached)
    }

    /// Put back scopes hidden by [`ScopeStack::detach_above`].
    pub fn reattach(&mut self, detached: DetachedScopes) {
        self.scopes.extend(detached.0);
    }

    /// Tear down every scope, innermost first.
    pub fn clean_up(&mut self) {
        while self.end_scope().is_ok() {}
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Error when trying to bind a value in a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum BindError {
    /// No scope exists to bind in.
    NoScope,
    /// The name has no entry in the current scope.
    NameNotDeclared(String),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::NoScope => write!(f, "No scope to bind in"),
            BindError::NameNotDeclared(name) => {
                write!(f, "Name '{}' not declared in current scope", name)
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Error when trying to pop a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum PopError {
    /// The stack is empty.
    EmptyStack,
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopError::EmptyStack => write!(f, "Cannot pop from empty scope stack"),
        }
    }
}

impl std::error::Error for PopError {}
